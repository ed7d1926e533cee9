pub mod db;
pub mod media;
