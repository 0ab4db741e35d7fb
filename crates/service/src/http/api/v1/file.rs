use std::io::Cursor;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use common::prelude::{BlobId, BlobStoreError};

use super::error::store_error_response;
use super::upload::collect_uploads;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameQuery {
    pub id: BlobId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceQuery {
    pub id: BlobId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    pub id: BlobId,
    pub name: String,
}

/// `PUT /file/rename?id=&name=`
pub async fn rename_handler(
    State(state): State<ServiceState>,
    Query(query): Query<RenameQuery>,
) -> Result<impl IntoResponse, FileError> {
    tracing::info!("Renaming blob {} to {:?}", query.id, query.name);
    state.blobs().rename(query.id, query.name.clone()).await?;

    Ok((
        http::StatusCode::OK,
        Json(FileResponse {
            id: query.id,
            name: query.name,
        }),
    )
        .into_response())
}

/// `POST /file/replace?id=`: overwrite content and name with the uploaded
///  `file` part, keeping the id
pub async fn replace_handler(
    State(state): State<ServiceState>,
    Query(query): Query<ReplaceQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, FileError> {
    let mut uploads = collect_uploads(&mut multipart, "file").await?;
    if uploads.len() > 1 {
        return Err(FileError::InvalidRequest(
            "exactly one file part is expected".into(),
        ));
    }
    let upload = uploads
        .pop()
        .ok_or_else(|| FileError::InvalidRequest("file is required".into()))?;

    tracing::info!(
        "Replacing blob {} with {:?} ({} bytes)",
        query.id,
        upload.name,
        upload.content.len()
    );
    state
        .blobs()
        .replace(query.id, upload.name.clone(), Cursor::new(upload.content))
        .await?;

    Ok((
        http::StatusCode::OK,
        Json(FileResponse {
            id: query.id,
            name: upload.name,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Multipart error: {0}")]
    MultipartError(#[from] MultipartError),
    #[error("Blob store error: {0}")]
    Store(#[from] BlobStoreError),
}

impl IntoResponse for FileError {
    fn into_response(self) -> Response {
        match self {
            FileError::InvalidRequest(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            // too-large bodies surface here as 413
            FileError::MultipartError(e) => (e.status(), format!("Bad request: {}", e.body_text()))
                .into_response(),
            FileError::Store(e) => store_error_response(e),
        }
    }
}
