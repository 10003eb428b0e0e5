/// Configuration management for the API server
///
/// Loaded once at startup from environment variables (and a `.env` file when
/// present), then shared read-only through [`crate::app::AppState`].
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `JWT_SECRET`: HMAC signing secret for access tokens, at least 32 chars (required)
/// - `POLKA_KEY`: static key the payment provider sends to the webhook (required)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `PLATFORM`: `dev` enables `POST /admin/reset` (default: prod)
/// - `ACCESS_TOKEN_TTL_SECONDS`: access token lifetime (default: 3600)
/// - `REFRESH_TOKEN_TTL_DAYS`: refresh token lifetime (default: 60)
/// - `FILESERVER_ROOT`: directory served under `/app` (default: .)
///
/// # Example
///
/// ```no_run
/// use chirpy_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use chirpy_shared::auth::{jwt::DEFAULT_ACCESS_TOKEN_TTL_SECONDS, refresh_token::DEFAULT_REFRESH_TOKEN_TTL_DAYS};
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf, str::FromStr};

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Deployment platform
    pub platform: Platform,

    /// Directory served under `/app`
    pub fileserver_root: PathBuf,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    pub max_connections: u32,
}

/// Secrets and token lifetimes
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for access token signing
    ///
    /// Generate with: `openssl rand -base64 64`
    pub jwt_secret: String,

    /// Static key expected in `Authorization: ApiKey <key>` on the webhook
    pub polka_key: String,

    pub access_token_ttl_seconds: i64,

    pub refresh_token_ttl_days: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("polka_key", &"<redacted>")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .finish()
    }
}

/// Deployment platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Dev,
    #[default]
    Prod,
}

impl Platform {
    /// Whether destructive admin endpoints are enabled
    pub fn is_dev(&self) -> bool {
        matches!(self, Platform::Dev)
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    /// Only the exact string `dev` selects [`Platform::Dev`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "dev" { Platform::Dev } else { Platform::Prod })
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required variable is missing
    /// - A numeric variable does not parse
    /// - `JWT_SECRET` is shorter than 32 characters
    /// - A token lifetime is not positive
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_host = or_default("API_HOST", "0.0.0.0");
        let api_port = or_default("API_PORT", "8080")
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;
        let platform = or_default("PLATFORM", "prod")
            .parse::<Platform>()
            .unwrap_or_default();
        let fileserver_root = PathBuf::from(or_default("FILESERVER_ROOT", "."));

        let database_url = required("DATABASE_URL")?;
        let max_connections = or_default("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LENGTH);
        }

        let polka_key = required("POLKA_KEY")?;

        let access_token_ttl_seconds = or_default(
            "ACCESS_TOKEN_TTL_SECONDS",
            &DEFAULT_ACCESS_TOKEN_TTL_SECONDS.to_string(),
        )
        .parse::<i64>()
        .context("ACCESS_TOKEN_TTL_SECONDS must be an integer")?;
        let refresh_token_ttl_days = or_default(
            "REFRESH_TOKEN_TTL_DAYS",
            &DEFAULT_REFRESH_TOKEN_TTL_DAYS.to_string(),
        )
        .parse::<i64>()
        .context("REFRESH_TOKEN_TTL_DAYS must be an integer")?;

        if access_token_ttl_seconds <= 0 || refresh_token_ttl_days <= 0 {
            anyhow::bail!("Token lifetimes must be positive");
        }
        check_lifetime(
            "ACCESS_TOKEN_TTL_SECONDS",
            chrono::Duration::try_seconds(access_token_ttl_seconds),
        )?;
        check_lifetime(
            "REFRESH_TOKEN_TTL_DAYS",
            chrono::Duration::try_days(refresh_token_ttl_days),
        )?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                platform,
                fileserver_root,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth: AuthConfig {
                jwt_secret,
                polka_key,
                access_token_ttl_seconds,
                refresh_token_ttl_days,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Access token lifetime
    ///
    /// Saturates instead of panicking; issuance then reports the overflow.
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.auth.access_token_ttl_seconds)
            .unwrap_or_else(chrono::Duration::max_value)
    }

    /// Refresh token lifetime
    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_days(self.auth.refresh_token_ttl_days)
            .unwrap_or_else(chrono::Duration::max_value)
    }

    /// Pool settings for [`chirpy_shared::db::pool::create_pool`]
    pub fn pool_config(&self) -> chirpy_shared::db::pool::DatabaseConfig {
        chirpy_shared::db::pool::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            ..Default::default()
        }
    }
}

/// A lifetime must fit a `Duration` and an expiry computed from now
fn check_lifetime(key: &str, ttl: Option<chrono::Duration>) -> anyhow::Result<()> {
    ttl.and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
        .map(|_| ())
        .ok_or_else(|| anyhow::anyhow!("{} is too large", key))
}
