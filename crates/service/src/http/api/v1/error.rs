use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use common::prelude::{BatchError, BlobId, BlobStoreError};

/// Body returned when a batch upload fails
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailureResponse {
    pub message: String,
    pub total: usize,
    /// Ids of the items that were saved before the batch was reported failed
    pub persisted: Vec<BlobId>,
    pub failed: Vec<FailedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedItem {
    pub index: usize,
    pub name: String,
    pub error: String,
}

impl From<&BatchError> for BatchFailureResponse {
    fn from(err: &BatchError) -> Self {
        Self {
            message: err.to_string(),
            total: err.total,
            persisted: err.persisted.clone(),
            failed: err
                .failures
                .iter()
                .map(|f| FailedItem {
                    index: f.index,
                    name: f.name.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
        }
    }
}

/// Map a blob store failure onto a response. Not-found and write failures
///  stay distinct for the client.
pub(super) fn store_error_response(err: BlobStoreError) -> Response {
    match err {
        BlobStoreError::NotFound(id) => (
            http::StatusCode::NOT_FOUND,
            format!("Blob not found: {}", id),
        )
            .into_response(),
        BlobStoreError::Storage { name, source } => (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to save {:?}: {}", name, source),
        )
            .into_response(),
        BlobStoreError::Batch(batch) => (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(BatchFailureResponse::from(&batch)),
        )
            .into_response(),
        BlobStoreError::Provider(_) => (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            "Unexpected error".to_string(),
        )
            .into_response(),
    }
}
