pub mod admin;
pub mod attr;
pub mod health;
pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod token;
pub mod user;
