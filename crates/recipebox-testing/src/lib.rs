//! Test utilities for recipebox.
//!
//! Provides token auth headers and in-memory sample images.
//! Import in tests only, never in production code.

pub mod auth;
pub mod image;
