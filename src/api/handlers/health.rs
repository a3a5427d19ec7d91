/// Liveness probe. Does not touch Ollama or the upload directory.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is running", body = String)
    ),
    tag = "system"
)]
pub async fn health() -> &'static str {
    "OK"
}
