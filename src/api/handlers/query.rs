//! Question answering handler.

use crate::{
    types::{AppError, ErrorResponse, QueryRequest, QueryResponse, Result},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

/// Answer a question about a previously uploaded document.
///
/// The stored file is reloaded, chunked and embedded on every call; the
/// `top_k` chunks closest to the question are handed to `model`.
#[utoipa::path(
    post,
    path = "/query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Answer generated", body = QueryResponse),
        (status = 400, description = "Missing or malformed parameters", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Document or model failure", body = ErrorResponse)
    ),
    tag = "documents"
)]
pub async fn query(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected query body");
        missing_parameters()
    })?;

    let query = required(request.query)?;
    let filename = required(request.filename)?;
    let model = required(request.model)?;

    let path = state.uploads.locate(&filename).await?;
    let response = state.pipeline.answer(&path, &query, &model).await?;

    Ok(Json(QueryResponse { response }))
}

fn required(value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing_parameters()),
    }
}

fn missing_parameters() -> AppError {
    AppError::InvalidInput("Missing required parameters".into())
}
