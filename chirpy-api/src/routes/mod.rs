/// API route handlers
///
/// Organized by resource:
///
/// - `health`: readiness probe
/// - `users`: registration and credential updates
/// - `auth`: login, refresh and revoke
/// - `chirps`: chirp CRUD
/// - `webhooks`: payment provider callbacks
/// - `admin`: hit counter page and dev reset

pub mod admin;
pub mod auth;
pub mod chirps;
pub mod health;
pub mod users;
pub mod webhooks;
