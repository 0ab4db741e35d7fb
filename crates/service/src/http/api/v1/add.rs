use std::io::Cursor;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use common::prelude::{BlobId, BlobStoreError};

use super::error::store_error_response;
use super::upload::collect_uploads;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFileResponse {
    pub id: BlobId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFilesResponse {
    pub ids: Vec<BlobId>,
}

/// `POST /add/file`: store the single multipart part named `file`
pub async fn file_handler(
    State(state): State<ServiceState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AddError> {
    let mut uploads = collect_uploads(&mut multipart, "file").await?;
    if uploads.len() > 1 {
        return Err(AddError::InvalidRequest(
            "exactly one file part is expected".into(),
        ));
    }
    let upload = uploads
        .pop()
        .ok_or_else(|| AddError::InvalidRequest("file is required".into()))?;

    tracing::info!("Uploading file {:?} ({} bytes)", upload.name, upload.content.len());
    let id = state
        .blobs()
        .add_one(upload.name, Cursor::new(upload.content))
        .await?;

    Ok((http::StatusCode::OK, Json(AddFileResponse { id })).into_response())
}

/// `POST /add/files`: store every multipart part named `files` as one batch
pub async fn files_handler(
    State(state): State<ServiceState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AddError> {
    let uploads = collect_uploads(&mut multipart, "files").await?;
    if uploads.is_empty() {
        return Err(AddError::InvalidRequest(
            "At least one file is required".into(),
        ));
    }

    tracing::info!("Uploading {} file(s)", uploads.len());
    let items = uploads
        .into_iter()
        .map(|upload| (upload.name, Cursor::new(upload.content)));
    let ids = state.blobs().add_many(items).await?;

    Ok((http::StatusCode::OK, Json(AddFilesResponse { ids })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum AddError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Multipart error: {0}")]
    MultipartError(#[from] MultipartError),
    #[error("Blob store error: {0}")]
    Store(#[from] BlobStoreError),
}

impl IntoResponse for AddError {
    fn into_response(self) -> Response {
        match self {
            AddError::InvalidRequest(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            // too-large bodies surface here as 413
            AddError::MultipartError(e) => (e.status(), format!("Bad request: {}", e.body_text()))
                .into_response(),
            AddError::Store(e) => store_error_response(e),
        }
    }
}
