use crate::{types::Result, AppState};
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use minijinja::context;

/// Front-end script served at `/static/script.js`.
pub const SCRIPT_JS: &str = include_str!("../../../static/script.js");

/// Render the upload and chat page.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let template = state.templates.get_template("index.html")?;
    let html = template.render(context! {
        models => &state.config.models,
        extensions => &state.config.uploads.allowed_extensions,
    })?;
    Ok(Html(html))
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}
