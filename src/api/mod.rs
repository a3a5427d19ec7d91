//! HTTP API Handlers and Routes
//!
//! This module provides the HTTP layer for docqa, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # Endpoints
//!
//! - `GET /` - Upload form and chat page
//! - `POST /upload` - Store a document (multipart field `file`) and index it once
//! - `POST /query` - Answer `{query, filename, model}` from a stored document
//! - `GET /health` - Health check endpoint
//! - `GET /static/script.js` - Front-end script used by the index page
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! Errors are returned as `{"error": "<message>"}` with a 400, 404, 413 or 500
//! status.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::types::{ErrorResponse, QueryRequest, QueryResponse, UploadForm, UploadResponse};
use axum::Json;
use utoipa::OpenApi;

/// OpenAPI description of the JSON endpoints.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "docqa",
        description = "Question answering over uploaded documents"
    ),
    paths(
        handlers::health::health,
        handlers::upload::upload,
        handlers::query::query,
    ),
    components(schemas(QueryRequest, QueryResponse, UploadResponse, ErrorResponse, UploadForm)),
    tags(
        (name = "documents", description = "Document upload and question answering"),
        (name = "system", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
