/// Authentication and authorization utilities
///
/// The pipeline every protected handler runs is:
///
/// ```text
/// credentials::extract_bearer -> jwt::validate_access_token
///     -> middleware::authenticate -> authorization::require_ownership
/// ```
///
/// Refresh tokens live on a separate, slower path (login issuance, explicit
/// refresh, explicit revoke) in [`refresh_token`].
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Short-lived HS256 access tokens
/// - [`refresh_token`]: Opaque long-lived refresh tokens and their store seam
/// - [`credentials`]: `Authorization` header parsing
/// - [`middleware`]: Request authentication for Axum
/// - [`authorization`]: Resource ownership checks
///
/// # Example
///
/// ```no_run
/// use chirpy_shared::auth::password::{hash_password, verify_password};
/// use chirpy_shared::auth::jwt::{issue_access_token, validate_access_token};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let user_id = Uuid::new_v4();
/// let token = issue_access_token(user_id, "secret-key", Duration::hours(1))?;
/// assert_eq!(validate_access_token(&token, "secret-key")?, user_id);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod refresh_token;
