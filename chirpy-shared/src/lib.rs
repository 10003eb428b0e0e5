//! # Chirpy Shared Library
//!
//! This crate contains the authentication subsystem, persistence models and
//! content rules used by the Chirpy API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, access/refresh tokens, credential extraction,
//!   request authentication and ownership checks
//! - `db`: Connection pool and migrations
//! - `models`: Database models and data structures
//! - `moderation`: Chirp length limit and word filter

pub mod auth;
pub mod db;
pub mod models;
pub mod moderation;

/// Current version of the Chirpy shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
