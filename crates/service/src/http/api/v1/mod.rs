use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::ServiceState;

pub mod add;
mod error;
pub mod file;
pub mod remove;
pub mod retrieve;
mod upload;

pub use error::{BatchFailureResponse, FailedItem};

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/add/file", post(add::file_handler))
        .route("/add/files", post(add::files_handler))
        .route("/retrieve/id", get(retrieve::by_id_handler))
        .route("/retrieve/prefix", get(retrieve::by_prefix_handler))
        .route("/retrieve/all", get(retrieve::all_handler))
        .route("/file/rename", put(file::rename_handler))
        .route("/file/replace", post(file::replace_handler))
        .route("/remove/file", delete(remove::file_handler))
        .route("/remove/files", delete(remove::files_handler))
        .with_state(state)
}
