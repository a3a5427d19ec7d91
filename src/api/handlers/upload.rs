//! Document upload handler.

use crate::{
    types::{AppError, ErrorResponse, Result, UploadResponse},
    AppState,
};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};

/// Upload a document.
///
/// The file is stored under a sanitized name, then loaded, chunked and
/// embedded once to check that it can be queried. The resulting index is not
/// kept; queries rebuild it from the stored file.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = crate::types::UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored and indexed", body = UploadResponse),
        (status = 400, description = "Missing file or disallowed file type", body = ErrorResponse),
        (status = 413, description = "File exceeds the configured size limit", body = ErrorResponse),
        (status = 500, description = "File stored but could not be processed", body = ErrorResponse)
    ),
    tag = "documents"
)]
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart =
        multipart.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| AppError::InvalidInput("No file part".into()))?;

    let stored = state.uploads.save(&filename, &data).await?;
    let chunks = state.pipeline.ingest(&stored.path).await?;

    tracing::info!(
        filename = %stored.filename,
        size = stored.size,
        chunks,
        "Upload processed"
    );

    Ok(Json(UploadResponse {
        success: true,
        filename: stored.filename,
    }))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(err.body_text())
    }
}
