//! File handlers for the gateway.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{multipart::MultipartError, multipart::MultipartRejection, Multipart, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use serde::Deserialize;

use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::GatewayError;

/// Response header carrying each stored name produced by an upload.
pub const STORED_FILE_HEADER: &str = "x-stored-file";

/// Query parameters for file deletion.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    /// Stored name of the file to remove.
    pub file: Option<String>,
}

fn multipart_error(err: MultipartError) -> ApiError {
    tracing::error!(error = %err, "Failed to read multipart data");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("upload too large")
    } else {
        ApiError::internal("multipart error occurred")
    }
}

/// Header value for a stored name.
///
/// Plain ASCII names are sent as-is; anything else is percent-encoded.
fn stored_name_header(name: &str) -> Option<HeaderValue> {
    if name.is_ascii() {
        if let Ok(value) = HeaderValue::from_str(name) {
            return Some(value);
        }
    }
    HeaderValue::from_str(&urlencoding::encode(name)).ok()
}

fn storage_error(err: GatewayError) -> ApiError {
    tracing::error!(error = %err, "Failed to save uploaded file");
    ApiError::internal("unknown error occurred")
}

/// POST /upload - Save every file part of a multipart form.
///
/// Each part is staged and renamed on completion, so a failing part never
/// leaves a partial file. Parts saved before a failure stay saved.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!(error = %e, "Rejected upload request");
        ApiError::bad_request("malformed multipart request")
    })?;

    let mut saved = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        // Parts without a filename are plain form fields.
        let Some(original_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
        else {
            continue;
        };

        let mut upload = state
            .store
            .begin_upload(&original_name)
            .await
            .map_err(storage_error)?;

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            upload.write_chunk(&chunk).await.map_err(storage_error)?;
        }

        let stored_name = upload.commit().await.map_err(storage_error)?;
        tracing::info!(original = %original_name, stored = %stored_name, "Saved uploaded file");
        saved.push(stored_name);
    }

    if saved.is_empty() {
        return Err(ApiError::bad_request("no files were uploaded"));
    }

    let mut response = "saved file(s)".into_response();
    for name in &saved {
        match stored_name_header(name) {
            Some(value) => {
                response
                    .headers_mut()
                    .append(HeaderName::from_static(STORED_FILE_HEADER), value);
            }
            None => tracing::warn!(stored = %name, "Stored name not representable as header"),
        }
    }

    Ok(response)
}

/// GET /list - Stream visible stored names, one per line.
pub async fn list_files(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let names = state.store.list().await.map_err(|e| {
        tracing::error!(
            root = %state.store.root().display(),
            error = %e,
            "Unable to scan directory"
        );
        ApiError::internal("Unable to scan directory")
    })?;

    let lines = names.filter_map(|entry| async move {
        match entry {
            Ok(name) => Some(Ok::<_, Infallible>(Bytes::from(format!("{name}\n")))),
            Err(e) => {
                tracing::error!(error = %e, "Directory scan interrupted");
                None
            }
        }
    });

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(lines),
    )
        .into_response())
}

/// DELETE /delete?file=<name> - Remove one stored file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeleteQuery>,
) -> Result<&'static str, ApiError> {
    let file = query
        .file
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiError::bad_request("no file query parameter found"))?;

    match state.store.delete(&file).await {
        Ok(()) => {
            tracing::info!(file = %file, "Removed file");
            Ok("File removed")
        }
        Err(GatewayError::InvalidName(_)) => {
            tracing::warn!(file = %file, "Rejected delete of invalid file name");
            Err(ApiError::bad_request("invalid file name"))
        }
        Err(e) => {
            tracing::error!(file = %file, error = %e, "Unable to remove file");
            Err(ApiError::internal("Unable to remove file"))
        }
    }
}
