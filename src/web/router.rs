//! Router configuration for the gateway.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{delete_file, health, list_files, root, upload_files, AppState};
use super::middleware::hide_dotfiles;

/// URL prefix under which stored files are served.
pub const FILES_PREFIX: &str = "/files";

/// Create the main router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Raw bytes of stored files; no index pages, no directory listing, no dotfiles.
    let static_files: Router<Arc<AppState>> = Router::new()
        .nest_service(
            FILES_PREFIX,
            ServeDir::new(app_state.store.root()).append_index_html_on_directories(false),
        )
        .route_layer(middleware::from_fn(hide_dotfiles));

    let upload_limit = DefaultBodyLimit::max(app_state.max_upload_size);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/upload", post(upload_files).layer(upload_limit))
        .route("/list", get(list_files))
        .route("/delete", delete(delete_file))
        .merge(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router() -> (tempfile::TempDir, Router) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();
        let router = create_router(Arc::new(AppState::new(store)));
        (temp_dir, router)
    }

    #[tokio::test]
    async fn test_root_greeting() {
        let (_temp_dir, router) = test_router();

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Hello World!");
    }

    #[tokio::test]
    async fn test_health_is_empty_ok() {
        let (_temp_dir, router) = test_router();

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_files_directory_is_not_listed() {
        let (temp_dir, router) = test_router();
        std::fs::write(temp_dir.path().join("a.txt"), b"a").unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let response = router
            .clone()
            .oneshot(Request::get("/files/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router
            .oneshot(Request::get("/files/sub/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
