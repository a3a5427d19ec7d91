//! LLM client abstractions.
//!
//! The HTTP layer never talks to a model server directly. It asks an
//! [`LLMClientFactoryTrait`] for a client bound to the model named in the
//! request, which lets tests swap in deterministic stubs.

use crate::types::Result;
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt, returning the raw model text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Creates clients for a model chosen at request time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMClientFactoryTrait: Send + Sync {
    /// Create a client bound to `model`.
    async fn create_for_model(&self, model: &str) -> Result<Box<dyn LLMClient>>;
}

/// Factory producing Ollama clients that share one server URL.
///
/// # Example
///
/// ```rust,ignore
/// use docqa::llm::{LLMClientFactory, LLMClientFactoryTrait};
///
/// let factory = LLMClientFactory::new("http://localhost:11434");
/// let client = factory.create_for_model("gemma:2b").await?;
/// let answer = client.generate("Why is the sky blue?").await?;
/// ```
#[derive(Debug, Clone)]
pub struct LLMClientFactory {
    base_url: String,
}

impl LLMClientFactory {
    /// Create a new factory for the Ollama server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// The server URL clients are created for.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LLMClientFactoryTrait for LLMClientFactory {
    async fn create_for_model(&self, model: &str) -> Result<Box<dyn LLMClient>> {
        Ok(Box::new(super::ollama::OllamaClient::new(
            &self.base_url,
            model.to_string(),
        )))
    }
}
