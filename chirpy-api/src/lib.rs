//! # Chirpy API Server Library
//!
//! HTTP surface of Chirpy: users, sessions, chirps, the payment provider
//! webhook and the admin pages. Authentication logic lives in
//! `chirpy_shared::auth`; this crate wires it into Axum.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: File-server hit counter
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
