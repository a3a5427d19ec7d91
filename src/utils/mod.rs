/// Layered configuration (defaults, docqa.toml, environment).
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
