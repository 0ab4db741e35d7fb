use axum::extract::multipart::{Multipart, MultipartError};
use bytes::Bytes;

/// One uploaded file part, fully buffered
#[derive(Debug)]
pub(super) struct Upload {
    pub name: String,
    pub content: Bytes,
}

/// Buffer every file part named `field`. Other parts are skipped.
pub(super) async fn collect_uploads(
    multipart: &mut Multipart,
    field: &str,
) -> Result<Vec<Upload>, MultipartError> {
    let mut uploads = Vec::new();

    while let Some(part) = multipart.next_field().await.inspect_err(|e| {
        tracing::error!("Multipart parsing error: {}", e);
    })? {
        let field_name = part.name().unwrap_or("").to_string();
        if field_name != field {
            tracing::warn!("Ignoring unknown field: {}", field_name);
            continue;
        }

        let name = part.file_name().map(str::to_string).unwrap_or_default();
        let content = part.bytes().await.inspect_err(|e| {
            tracing::error!("Error reading file data for {:?}: {}", name, e);
        })?;
        tracing::debug!("Read upload {:?} ({} bytes)", name, content.len());

        uploads.push(Upload { name, content });
    }

    Ok(uploads)
}
