//! Domain rules shared across Recipebox crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/`.

pub mod filter;
pub mod text;
pub mod user;
