//! Request guards for static file serving.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::storage::name::is_hidden;

/// Whether a raw URL path segment names a hidden entry.
///
/// Segments are checked before percent-decoding, so an encoded leading dot
/// (`%2e`) counts as hidden too.
fn is_hidden_segment(segment: &str) -> bool {
    is_hidden(segment)
        || segment
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("%2e"))
}

/// Answer 404 for any path with a hidden segment.
///
/// Keeps dotfiles and in-flight upload staging files out of static serving.
pub async fn hide_dotfiles(req: Request, next: Next) -> Response {
    if req.uri().path().split('/').any(is_hidden_segment) {
        tracing::debug!(path = %req.uri().path(), "Refused hidden path");
        return StatusCode::NOT_FOUND.into_response();
    }

    next.run(req).await
}
