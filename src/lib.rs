//! # docqa - Document Question Answering Server
//!
//! A small web service that answers natural-language questions about an
//! uploaded document using retrieval-augmented generation against a local
//! Ollama server.
//!
//! ## Overview
//!
//! docqa can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `docqa-server` binary
//! 2. **As a library** - Build the router or the RAG pipeline into your own project
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use docqa::{api::routes::create_router, AppState, DocQaConfig};
//! use docqa::llm::LLMClientFactory;
//! use docqa::rag::embeddings::OllamaEmbedder;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DocQaConfig::load("docqa.toml")?;
//!     let embedder = Arc::new(OllamaEmbedder::new(
//!         &config.ollama.base_url,
//!         config.ollama.embedding_model.clone(),
//!     ));
//!     let factory = Arc::new(LLMClientFactory::new(config.ollama.base_url.clone()));
//!
//!     let state = AppState::new(config, embedder, factory)?;
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, create_router(state)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - HTTP handlers and routes
//! - [`llm`] - Language model clients
//! - [`rag`] - Loading, chunking, embedding, retrieval and answer generation
//! - [`storage`] - Uploaded file storage
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration and logging

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM clients and abstractions.
pub mod llm;
/// Retrieval Augmented Generation (RAG) components.
pub mod rag;
/// Uploaded file storage.
pub mod storage;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::{LLMClient, LLMClientFactory, LLMClientFactoryTrait};
pub use rag::embeddings::EmbeddingProvider;
pub use rag::pipeline::RagPipeline;
pub use storage::UploadStore;
pub use types::{AppError, Result};
pub use utils::config::DocQaConfig;

use minijinja::Environment;
use std::sync::Arc;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration resolved at startup
    pub config: Arc<DocQaConfig>,
    /// Where uploads are written and looked up
    pub uploads: Arc<UploadStore>,
    /// Load, chunk, embed, retrieve and generate
    pub pipeline: Arc<RagPipeline>,
    /// Page templates
    pub templates: Arc<Environment<'static>>,
}

impl AppState {
    /// Assemble the state from a validated configuration and the model
    /// capabilities to use.
    pub fn new(
        config: DocQaConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm_factory: Arc<dyn LLMClientFactoryTrait>,
    ) -> Result<Self> {
        let pipeline = RagPipeline::new(&config.rag, embedder, llm_factory)?;
        let uploads = UploadStore::new(&config.uploads);

        let mut templates = Environment::new();
        templates.add_template("index.html", INDEX_TEMPLATE)?;

        Ok(Self {
            config: Arc::new(config),
            uploads: Arc::new(uploads),
            pipeline: Arc::new(pipeline),
            templates: Arc::new(templates),
        })
    }
}
