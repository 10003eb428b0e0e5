/// Database models for Chirpy
///
/// Each model owns its SQL. Models return `sqlx::Error` and leave mapping to
/// HTTP statuses to the API crate.
///
/// # Models
///
/// - `user`: Accounts and password hashes
/// - `chirp`: Short text posts
/// - `refresh_token`: Server-tracked refresh tokens (also implements
///   [`crate::auth::refresh_token::RefreshTokenStore`] for `PgPool`)

pub mod chirp;
pub mod refresh_token;
pub mod user;
