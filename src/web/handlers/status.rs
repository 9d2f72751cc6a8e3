//! Liveness handlers.

use axum::http::StatusCode;

/// GET / - Fixed greeting.
pub async fn root() -> &'static str {
    "Hello World!"
}

/// GET /health - Empty 200 for liveness checks.
pub async fn health() -> StatusCode {
    StatusCode::OK
}
