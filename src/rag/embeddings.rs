//! Text embedding providers.

use crate::llm::ollama::connect;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};
use ollama_rs::Ollama;

pub const DEFAULT_EMBEDDING_MODEL: &str = "gemma:2b";

/// Maps text to fixed-length vectors. The same provider must be used for the
/// chunks of a document and for the query searched against them.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Name of the embedding model.
    fn model_name(&self) -> &str;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| AppError::EmbeddingUnavailable("No embedding returned for query".into()))
    }
}

/// Embeddings computed by a local Ollama server.
pub struct OllamaEmbedder {
    client: Ollama,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(base_url: &str, model: impl Into<String>) -> Self {
        Self {
            client: connect(base_url),
            model: model.into(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = GenerateEmbeddingsRequest::new(
            self.model.clone(),
            EmbeddingsInput::Multiple(texts.to_vec()),
        );

        let response = self.client.generate_embeddings(request).await.map_err(|e| {
            AppError::EmbeddingUnavailable(format!(
                "Ollama embedding error for model '{}': {}",
                self.model, e
            ))
        })?;

        if response.embeddings.len() != texts.len() {
            return Err(AppError::EmbeddingUnavailable(format!(
                "Expected {} embeddings from '{}', got {}",
                texts.len(),
                self.model,
                response.embeddings.len()
            )));
        }

        tracing::debug!(model = %self.model, count = texts.len(), "Embedded texts");
        Ok(response.embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_embed_query_returns_single_vector() {
        let vector = BagOfWordsEmbedder.embed_query("the sky is blue").await.unwrap();
        assert_eq!(vector.len(), DIMENSIONS);
    }

    #[tokio::test]
    async fn test_embed_query_propagates_failure() {
        let err = DownEmbedder.embed_query("anything").await.unwrap_err();
        assert!(matches!(err, AppError::EmbeddingUnavailable(_)));
    }

    #[tokio::test]
    async fn test_ollama_embedder_empty_batch_skips_server() {
        let embedder = OllamaEmbedder::new("http://127.0.0.1:9", DEFAULT_EMBEDDING_MODEL);
        assert_eq!(embedder.model_name(), "gemma:2b");
        assert!(embedder.embed(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ollama_embedder_unreachable_server() {
        let embedder = OllamaEmbedder::new("http://127.0.0.1:9", DEFAULT_EMBEDDING_MODEL);
        let err = embedder.embed(&["hello".to_string()]).await.unwrap_err();
        assert!(matches!(err, AppError::EmbeddingUnavailable(_)));
    }
}
