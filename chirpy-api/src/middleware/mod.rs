/// Middleware for the API server
///
/// - `metrics`: counts requests to the static file server

pub mod metrics;
