use crate::api::{handlers, openapi_json};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// Upload bodies larger than `uploads.max_file_size` are cut off while the
/// multipart stream is read and answered with 413.
pub fn create_router(state: AppState) -> Router {
    let max_upload = state.config.uploads.max_file_size;

    Router::new()
        .route("/", get(handlers::index::index))
        .route("/static/script.js", get(handlers::index::script))
        .route("/health", get(handlers::health::health))
        .route(
            "/upload",
            post(handlers::upload::upload).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/query", post(handlers::query::query))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
