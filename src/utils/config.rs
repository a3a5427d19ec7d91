//! Layered configuration for docqa
//!
//! Values are resolved in order, later sources winning:
//!
//! 1. Built-in defaults ([`DocQaConfig::default`])
//! 2. The TOML file passed on the command line (`docqa.toml`), if present
//! 3. Environment variables of the form `DOCQA__SECTION__KEY`
//!    (e.g. `DOCQA__SERVER__PORT=8080`)

use docqa_vector::DistanceMetric;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from docqa.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocQaConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub uploads: UploadsConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub rag: RagConfig,

    /// Models offered on the index page and accepted by `/query`
    #[serde(default = "default_models")]
    pub models: Vec<String>,
}

impl Default for DocQaConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            uploads: UploadsConfig::default(),
            ollama: OllamaConfig::default(),
            rag: RagConfig::default(),
            models: default_models(),
        }
    }
}

fn default_models() -> Vec<String> {
    ["gemma:2b", "gemma:7b", "llama3:8b", "mistral:7b"]
        .into_iter()
        .map(String::from)
        .collect()
}

// ============= Server Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

// ============= Upload Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadsConfig {
    /// Directory uploaded files are written to
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,

    /// Maximum request body size for uploads, in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,

    /// Lowercase file extensions accepted on upload
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_file_size: default_max_file_size(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_file_size() -> usize {
    16 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    ["pdf", "docx", "xlsx", "xls", "csv", "txt"]
        .into_iter()
        .map(String::from)
        .collect()
}

// ============= Ollama Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Model used to embed document chunks and queries
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            embedding_model: default_embedding_model(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    crate::rag::embeddings::DEFAULT_EMBEDDING_MODEL.to_string()
}

// ============= RAG Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagConfig {
    /// Chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of chunks passed to the model as context
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default)]
    pub distance: DistanceMetric,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            distance: DistanceMetric::default(),
        }
    }
}

fn default_chunk_size() -> usize {
    crate::rag::chunker::DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    crate::rag::chunker::DEFAULT_CHUNK_OVERLAP
}

fn default_top_k() -> usize {
    4
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl DocQaConfig {
    /// Load configuration from defaults, the TOML file at `path` (optional)
    /// and `DOCQA__*` environment variables, then validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&DocQaConfig::default())?)
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("DOCQA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: DocQaConfig = settings.try_deserialize()?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rag.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "rag.chunk_size must be greater than zero".to_string(),
            ));
        }

        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(ConfigError::ValidationError(format!(
                "rag.chunk_overlap ({}) must be smaller than rag.chunk_size ({})",
                self.rag.chunk_overlap, self.rag.chunk_size
            )));
        }

        if self.rag.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "rag.top_k must be greater than zero".to_string(),
            ));
        }

        if self.uploads.max_file_size == 0 {
            return Err(ConfigError::ValidationError(
                "uploads.max_file_size must be greater than zero".to_string(),
            ));
        }

        if self.uploads.allowed_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "uploads.allowed_extensions must not be empty".to_string(),
            ));
        }

        for ext in &self.uploads.allowed_extensions {
            if ext.is_empty() || ext.starts_with('.') || *ext != ext.to_lowercase() {
                return Err(ConfigError::ValidationError(format!(
                    "uploads.allowed_extensions entry '{}' must be a lowercase extension without a dot",
                    ext
                )));
            }
        }

        if self.models.is_empty() || self.models.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "models must list at least one non-empty model name".to_string(),
            ));
        }

        if self.ollama.embedding_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ollama.embedding_model must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_toml(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = DocQaConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.uploads.dir, PathBuf::from("uploads"));
        assert_eq!(config.uploads.max_file_size, 16_777_216);
        assert_eq!(config.ollama.embedding_model, "gemma:2b");
        assert_eq!(config.rag.chunk_size, 1000);
        assert_eq!(config.rag.chunk_overlap, 100);
        assert_eq!(config.rag.top_k, 4);
        assert_eq!(config.rag.distance, DistanceMetric::Cosine);
        assert_eq!(config.models.len(), 4);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DocQaConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, DocQaConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_toml(
            r#"
models = ["phi3:mini"]

[server]
port = 8080

[rag]
top_k = 2
distance = "dot"
"#,
        );

        let config = DocQaConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.rag.top_k, 2);
        assert_eq!(config.rag.chunk_size, 1000);
        assert_eq!(config.rag.distance, DistanceMetric::DotProduct);
        assert_eq!(config.models, vec!["phi3:mini".to_string()]);
    }

    #[test]
    fn test_invalid_file_is_rejected_on_load() {
        let file = write_toml("[rag]\nchunk_size = 100\nchunk_overlap = 100\n");
        let err = DocQaConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = DocQaConfig::default();
        config.rag.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = DocQaConfig::default();
        config.uploads.max_file_size = 0;
        assert!(config.validate().is_err());

        let mut config = DocQaConfig::default();
        config.models.clear();
        assert!(config.validate().is_err());

        let mut config = DocQaConfig::default();
        config.uploads.allowed_extensions = vec!["PDF".to_string()];
        assert!(config.validate().is_err());

        let mut config = DocQaConfig::default();
        config.uploads.allowed_extensions = vec![".txt".to_string()];
        assert!(config.validate().is_err());

        let mut config = DocQaConfig::default();
        config.uploads.allowed_extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_output_reloads() {
        let config = DocQaConfig::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[server]"));
        assert!(rendered.contains("distance = \"cosine\""));

        let file = write_toml(&rendered);
        assert_eq!(DocQaConfig::load(file.path()).unwrap(), config);
    }
}
