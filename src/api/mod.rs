//! API module
//!
//! HTTP endpoints and router assembly.

pub mod routes;

pub use routes::create_router;
