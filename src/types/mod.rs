use crate::rag::chunker::ChunkError;
use crate::rag::loader::LoadError;
use crate::utils::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// Body of `POST /query`.
///
/// Every field is optional at the serde level so that a missing field can be
/// reported as a 400 by the handler instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct QueryRequest {
    pub query: Option<String>,
    pub filename: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Multipart body of `POST /upload` (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

// ============= RAG Types =============

/// Where a segment of text came from inside its file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentMetadata {
    /// Path of the file the text was extracted from.
    pub source: PathBuf,
    /// 1-based page number (PDF).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// 0-based data row (CSV).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Worksheet name (spreadsheets).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl SegmentMetadata {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }
}

/// A unit of extracted text produced by the document loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSegment {
    pub text: String,
    pub metadata: SegmentMetadata,
}

impl DocumentSegment {
    pub fn new(text: impl Into<String>, metadata: SegmentMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A bounded window of a segment's text, ready for embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: SegmentMetadata,
    /// Position of this chunk within its segment.
    pub chunk_index: usize,
    /// Offset of the first character of this chunk in its segment, in chars.
    pub start_char: usize,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Chunking(#[from] ChunkError),

    #[error("Vector index error: {0}")]
    Index(#[from] docqa_vector::Error),

    #[error("Embedding model unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Generation model unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AppError::PayloadTooLarge("x".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                AppError::EmbeddingUnavailable("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::GenerationUnavailable("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Load(LoadError::UnsupportedFormat("exe".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Config(ConfigError::ValidationError("top_k".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_processing_failure_keeps_cause_in_message() {
        let err = AppError::GenerationUnavailable("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_query_request_missing_fields_deserialize() {
        let req: QueryRequest = serde_json::from_str(r#"{"query": "hi"}"#).unwrap();
        assert_eq!(req.query.as_deref(), Some("hi"));
        assert!(req.filename.is_none());
        assert!(req.model.is_none());
    }
}
