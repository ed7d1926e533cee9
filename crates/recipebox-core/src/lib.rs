//! HTTP plumbing shared by Recipebox binaries.
//!
//! Configuration loading, log setup, request-id middleware and the JSON error
//! envelope every service error renders into.

pub mod config;
pub mod error;
pub mod middleware;
pub mod tracing;
