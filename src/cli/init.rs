//! Init command implementation
//!
//! Writes a default `docqa.toml`, a `.env.example` and the uploads directory.

use super::output::Output;
use crate::utils::config::DocQaConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// docqa.toml already exists and `--force` was not given
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite an existing docqa.toml
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing docqa");

    let base_path = &config.path;
    let config_path = base_path.join("docqa.toml");
    if config_path.exists() && !config.force {
        output.warning("docqa.toml already exists!");
        output.hint("Use --force to overwrite it");
        return InitResult::AlreadyExists;
    }

    let docqa_config = generate_config(&config);

    output.subheader("Creating directories");
    let uploads = &docqa_config.uploads.dir;
    let uploads_path = base_path.join(uploads);
    if uploads_path.exists() {
        output.skipped(&uploads.display().to_string(), "already exists");
    } else if let Err(e) = fs::create_dir_all(&uploads_path) {
        output.error(&format!("Failed to create {}: {}", uploads.display(), e));
        return InitResult::Error(e.to_string());
    } else {
        output.created_dir(&uploads.display().to_string());
    }

    output.subheader("Creating configuration files");
    let toml_content = match render_config(&docqa_config) {
        Ok(content) => content,
        Err(e) => {
            output.error(&format!("Failed to render docqa.toml: {}", e));
            return InitResult::Error(e.to_string());
        }
    };
    if let Err(e) = fs::write(&config_path, toml_content) {
        output.error(&format!("Failed to create docqa.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "docqa.toml");

    let env_example_path = base_path.join(".env.example");
    if let Err(e) = write_if_missing(&env_example_path, ENV_EXAMPLE) {
        output.warning(&format!("Failed to create .env.example: {}", e));
    } else {
        output.created("env", ".env.example");
    }

    output.complete("docqa initialized successfully!");

    output.header("Next Steps");
    output.newline();
    output.info("1. Start Ollama and pull the models listed in docqa.toml:");
    output.command("ollama serve");
    for model in &docqa_config.models {
        output.command(&format!("ollama pull {}", model));
    }
    output.newline();
    output.info("2. Start the server:");
    output.command("docqa-server");
    output.newline();

    output.hint(&format!(
        "Server will be available at http://{}",
        docqa_config.bind_addr()
    ));
    output.hint("OpenAPI document available at /api-docs/openapi.json");

    InitResult::Success
}

fn write_if_missing(path: &Path, content: &str) -> std::io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_config(config: &InitConfig) -> DocQaConfig {
    let mut docqa = DocQaConfig::default();
    docqa.server.host = config.host.clone();
    docqa.server.port = config.port;
    docqa
}

fn render_config(config: &DocQaConfig) -> Result<String, crate::utils::config::ConfigError> {
    Ok(format!(
        "# docqa configuration\n\
         # Any value can be overridden with DOCQA__SECTION__KEY environment variables.\n\n{}",
        config.to_toml()?
    ))
}

const ENV_EXAMPLE: &str = r#"# Log filter (overrides server.log_level)
RUST_LOG=docqa=info,tower_http=info

# Ollama server used for embeddings and answers
DOCQA__OLLAMA__BASE_URL=http://localhost:11434
"#;
