/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use chirpy_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::metrics::count_hits, routes};
use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use chirpy_shared::auth::middleware::{jwt_auth_middleware, AuthError};
use sqlx::PgPool;
use std::sync::{atomic::AtomicU64, Arc};
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request by Axum's `State` extractor; every field is a cheap
/// handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Immutable configuration
    pub config: Arc<Config>,

    /// File-server hit counter
    pub hits: Arc<AtomicU64>,
}

impl AppState {
    /// Creates new application state with a zeroed hit counter
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            hits: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Access token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.auth.jwt_secret
    }

    /// Static key expected from the payment provider
    pub fn polka_key(&self) -> &str {
        &self.config.auth.polka_key
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── /app/*                        # static files, counted
/// ├── /api/
/// │   ├── GET    /healthz
/// │   ├── POST   /users
/// │   ├── PUT    /users             # access token
/// │   ├── POST   /login
/// │   ├── POST   /refresh           # refresh token
/// │   ├── POST   /revoke            # refresh token
/// │   ├── GET    /chirps
/// │   ├── POST   /chirps            # access token
/// │   ├── GET    /chirps/:chirp_id
/// │   ├── DELETE /chirps/:chirp_id  # access token + ownership
/// │   └── POST   /polka/webhooks    # static key
/// └── /admin/
///     ├── GET    /metrics
///     └── POST   /reset             # dev only
/// ```
pub fn build_router(state: AppState) -> Router {
    // Access-token routes: the middleware rejects before the handler runs
    let protected_routes = Router::new()
        .route("/users", put(routes::users::update_user))
        .route("/chirps", post(routes::chirps::create_chirp))
        .route("/chirps/:chirp_id", delete(routes::chirps::delete_chirp))
        .layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    let public_routes = Router::new()
        .route("/healthz", get(routes::health::readiness))
        .route("/users", post(routes::users::create_user))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/revoke", post(routes::auth::revoke))
        .route("/chirps", get(routes::chirps::list_chirps))
        .route("/chirps/:chirp_id", get(routes::chirps::get_chirp))
        .route("/polka/webhooks", post(routes::webhooks::polka_webhook));

    let admin_routes = Router::new()
        .route("/metrics", get(routes::admin::metrics))
        .route("/reset", post(routes::admin::reset));

    let file_server = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.api.fileserver_root))
        .layer(from_fn_with_state(state.clone(), count_hits));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .nest("/admin", admin_routes)
        .merge(file_server)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Access token middleware bound to the configured secret
async fn jwt_auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    jwt_auth_middleware(state.jwt_secret().to_string(), req, next).await
}
