//! Auth primitives shared by the recipebox server and its tests.
//!
//! Provides `Authorization` header parsing, opaque token generation, and
//! bcrypt password hashing.

pub mod bearer;
pub mod password;
pub mod token;
