//! Grounded answer generation.
//!
//! All retrieved chunks are "stuffed" into a single prompt ahead of the
//! question and sent to the requested model in one call.

use crate::llm::LLMClientFactoryTrait;
use crate::types::{AppError, Chunk, Result};
use std::sync::Arc;

const PROMPT_PREAMBLE: &str = "Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Build the prompt sent to the model: instructions, then the context chunks
/// separated by blank lines, then the question.
pub fn build_prompt(query: &str, chunks: &[&Chunk]) -> String {
    let context = chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}\n\n{}\n\nQuestion: {}\nHelpful Answer:",
        PROMPT_PREAMBLE, context, query
    )
}

pub struct AnswerGenerator {
    factory: Arc<dyn LLMClientFactoryTrait>,
}

impl AnswerGenerator {
    pub fn new(factory: Arc<dyn LLMClientFactoryTrait>) -> Self {
        Self { factory }
    }

    /// Ask `model` to answer `query` from `chunks`. The model's text is
    /// returned unchanged.
    pub async fn answer(&self, query: &str, chunks: &[&Chunk], model: &str) -> Result<String> {
        let client = self.factory.create_for_model(model).await.map_err(|e| match e {
            AppError::GenerationUnavailable(_) => e,
            other => AppError::GenerationUnavailable(other.to_string()),
        })?;

        let prompt = build_prompt(query, chunks);
        tracing::debug!(
            model = client.model_name(),
            context_chunks = chunks.len(),
            prompt_chars = prompt.chars().count(),
            "Generating answer"
        );

        client.generate(&prompt).await
    }
}
