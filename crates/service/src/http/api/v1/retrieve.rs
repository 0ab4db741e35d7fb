use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use common::prelude::{BlobId, BlobStoreError};

use super::error::store_error_response;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdQuery {
    pub id: BlobId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixQuery {
    pub prefix: String,
}

/// `GET /retrieve/id?id=`: download the blob content as an attachment
pub async fn by_id_handler(
    State(state): State<ServiceState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, RetrieveError> {
    let blob = state.blobs().get(query.id).await?;

    let mime_type = mime_guess::from_path(&blob.name)
        .first_or_octet_stream()
        .to_string();
    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_file_name(&blob.name)
    );

    Ok((
        http::StatusCode::OK,
        [(CONTENT_TYPE, mime_type), (CONTENT_DISPOSITION, disposition)],
        blob.content,
    )
        .into_response())
}

/// `GET /retrieve/prefix?prefix=`: names starting with the prefix
pub async fn by_prefix_handler(
    State(state): State<ServiceState>,
    Query(query): Query<PrefixQuery>,
) -> Result<impl IntoResponse, RetrieveError> {
    let names = state.blobs().names_by_prefix(&query.prefix).await?;
    Ok((http::StatusCode::OK, Json(names)).into_response())
}

/// `GET /retrieve/all`: every stored name
pub async fn all_handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, RetrieveError> {
    let names = state.blobs().names().await?;
    Ok((http::StatusCode::OK, Json(names)).into_response())
}

/// Names are free-form; quotes, backslashes and control characters would
///  break the quoted `filename` parameter
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum RetrieveError {
    #[error("Blob store error: {0}")]
    Store(#[from] BlobStoreError),
}

impl IntoResponse for RetrieveError {
    fn into_response(self) -> Response {
        match self {
            RetrieveError::Store(e) => store_error_response(e),
        }
    }
}
