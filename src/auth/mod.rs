//! Authentication module
//!
//! Password hashing and verification. There is no session or token
//! layer; every request re-authenticates from scratch.

mod password;

pub use password::{hash_password, verify_password};
