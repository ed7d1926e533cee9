pub mod attr;
pub mod image;
pub mod recipe;
pub mod token;
pub mod user;
