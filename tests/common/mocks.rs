//! Mock implementations for testing.
//!
//! Deterministic stand-ins for the embedding model and the language models so
//! the HTTP surface can be exercised without an Ollama server.

#![allow(dead_code)]

use async_trait::async_trait;
use docqa::llm::{LLMClient, LLMClientFactoryTrait};
use docqa::rag::embeddings::EmbeddingProvider;
use docqa::types::{AppError, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

const STUB_DIMENSIONS: usize = 128;

/// Bag-of-words embedder: each lowercase word increments one hashed bucket.
///
/// Texts sharing vocabulary score higher under cosine similarity, which is
/// enough to make retrieval order predictable in tests.
pub struct StubEmbedder;

impl StubEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; STUB_DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() as usize) % STUB_DIMENSIONS] += 1.0;
        }
        vector[0] += 0.01;
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn model_name(&self) -> &str {
        "stub-embedder"
    }
}

/// Embedder that always reports the model as unreachable.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(AppError::EmbeddingUnavailable(
            "Mock embedding failure".to_string(),
        ))
    }

    fn model_name(&self) -> &str {
        "failing-embedder"
    }
}

/// Mock LLM client for testing with configurable responses.
///
/// Every prompt it receives is recorded so tests can check what context
/// reached the model.
#[derive(Clone)]
pub struct MockLLMClient {
    model: String,
    response: String,
    should_fail: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            model: "mock-model".to_string(),
            response: response.to_string(),
            should_fail: false,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.should_fail {
            return Err(AppError::GenerationUnavailable(
                "Mock LLM failure".to_string(),
            ));
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Factory handing out clones of one [`MockLLMClient`], bound to the
/// requested model name.
#[derive(Clone)]
pub struct MockLLMFactory {
    client: MockLLMClient,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockLLMFactory {
    pub fn new(client: MockLLMClient) -> Self {
        Self {
            client,
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Model names requested so far.
    pub fn requested_models(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn client(&self) -> &MockLLMClient {
        &self.client
    }
}

#[async_trait]
impl LLMClientFactoryTrait for MockLLMFactory {
    async fn create_for_model(&self, model: &str) -> Result<Box<dyn LLMClient>> {
        self.requested.lock().unwrap().push(model.to_string());
        let mut client = self.client.clone();
        client.model = model.to_string();
        Ok(Box::new(client))
    }
}
