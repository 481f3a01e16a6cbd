use std::sync::Arc;

use axum::extract::Multipart;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::{Extension, Json};
use blog_http::{ApiError, ApiResult, catalog};
use bytes::Bytes;
use http::StatusCode;
use tracing::{debug, field::Empty, info};

use crate::domain::error::DomainError;
use crate::domain::service::{ImageStore, ensure_image};

/// Body of a successful upload.
pub const UPLOADED: &str = "File has been uploaded";

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

fn multipart_error(e: &MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::from_def(&catalog::PAYLOAD_TOO_LARGE, e.body_text())
    } else {
        ApiError::bad_request(e.body_text())
    }
}

/// Store an uploaded post image.
///
/// Expects multipart fields `name` (target file name) and `file`. When `name`
/// is absent the client-supplied file name is used.
#[tracing::instrument(name = "posts.upload_image", skip_all, fields(request_id = Empty))]
pub async fn upload_image(
    Extension(store): Extension<Arc<ImageStore>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<&'static str>> {
    let mut multipart = multipart.map_err(|r| ApiError::bad_request(r.body_text()))?;

    let mut name: Option<String> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        let field_name = field.name().unwrap_or_default().to_owned();
        match field_name.as_str() {
            "name" => {
                name = Some(field.text().await.map_err(|e| multipart_error(&e))?);
            }
            "file" => {
                let content_type = field.content_type().map(str::to_owned);
                ensure_image(content_type.as_deref())?;
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            other => debug!(field = other, "ignoring multipart field"),
        }
    }

    let file = file.ok_or(DomainError::MissingFile)?;
    let name = name
        .filter(|n| !n.trim().is_empty())
        .or(file.file_name)
        .ok_or(DomainError::MissingName)?;

    store
        .save(&name, file.content_type.as_deref(), &file.bytes)
        .await?;

    info!(name = %name, "Post image uploaded");
    Ok(Json(UPLOADED))
}
