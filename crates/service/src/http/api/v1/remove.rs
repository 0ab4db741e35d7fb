use axum::extract::{Query, RawQuery, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use common::prelude::{BlobId, BlobStoreError};

use super::error::store_error_response;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveFileQuery {
    pub id: BlobId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveFilesResponse {
    pub ids: Vec<BlobId>,
}

/// `DELETE /remove/file?id=`. Removing an unknown id succeeds.
pub async fn file_handler(
    State(state): State<ServiceState>,
    Query(query): Query<RemoveFileQuery>,
) -> Result<impl IntoResponse, RemoveError> {
    tracing::info!("Removing blob {}", query.id);
    state.blobs().delete(query.id).await?;

    Ok((http::StatusCode::OK, Json(query)).into_response())
}

/// `DELETE /remove/files?ids=1&ids=2`. Comma separated values
///  (`ids=1,2`) are accepted as well.
pub async fn files_handler(
    State(state): State<ServiceState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, RemoveError> {
    let ids = parse_ids(query.as_deref().unwrap_or_default())?;

    tracing::info!("Removing {} blob(s)", ids.len());
    state.blobs().delete_many(&ids).await?;

    Ok((http::StatusCode::OK, Json(RemoveFilesResponse { ids })).into_response())
}

fn parse_ids(query: &str) -> Result<Vec<BlobId>, RemoveError> {
    let mut ids = Vec::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key != "ids" {
            continue;
        }
        for raw in value.split(',').filter(|raw| !raw.trim().is_empty()) {
            let id = raw
                .parse::<BlobId>()
                .map_err(|_| RemoveError::InvalidRequest(format!("invalid id: {:?}", raw)))?;
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(RemoveError::InvalidRequest("ids is required".into()));
    }
    Ok(ids)
}

#[derive(Debug, thiserror::Error)]
pub enum RemoveError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Blob store error: {0}")]
    Store(#[from] BlobStoreError),
}

impl IntoResponse for RemoveError {
    fn into_response(self) -> Response {
        match self {
            RemoveError::InvalidRequest(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            RemoveError::Store(e) => store_error_response(e),
        }
    }
}
