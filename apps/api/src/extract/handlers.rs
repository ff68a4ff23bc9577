use axum::extract::Multipart;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::extract::{extract_text, UploadedFile};

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub file_name: String,
    pub mime_type: String,
    pub text: String,
}

/// Pulls the `file` field out of a multipart body.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        return Ok(UploadedFile {
            file_name,
            mime_type,
            bytes,
        });
    }
    Err(AppError::Validation(format!(
        "Missing '{FILE_FIELD}' field in upload"
    )))
}

/// POST /api/v1/uploads/extract
pub async fn handle_extract(multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let file = read_upload(multipart).await?;
    let text = extract_text(&file).await?;
    Ok(Json(ExtractResponse {
        file_name: file.file_name,
        mime_type: file.mime_type,
        text,
    }))
}
