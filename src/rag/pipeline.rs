//! Per-request retrieval pipeline.
//!
//! Nothing is cached between calls: every query re-reads the stored file,
//! re-chunks it, re-embeds the chunks and builds a fresh index.

use crate::llm::LLMClientFactoryTrait;
use crate::rag::answer::AnswerGenerator;
use crate::rag::chunker::TextChunker;
use crate::rag::embeddings::EmbeddingProvider;
use crate::rag::loader;
use crate::types::{AppError, Chunk, Result};
use crate::utils::config::RagConfig;
use docqa_vector::{DistanceMetric, FlatIndex};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    generator: AnswerGenerator,
    chunker: TextChunker,
    top_k: usize,
    metric: DistanceMetric,
}

impl RagPipeline {
    pub fn new(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm_factory: Arc<dyn LLMClientFactoryTrait>,
    ) -> Result<Self> {
        Ok(Self {
            embedder,
            generator: AnswerGenerator::new(llm_factory),
            chunker: TextChunker::new(config.chunk_size, config.chunk_overlap)?,
            top_k: config.top_k,
            metric: config.distance,
        })
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn embedding_model(&self) -> &str {
        self.embedder.model_name()
    }

    /// Extract and chunk the file at `path`. A file yielding no text is an
    /// error since there would be nothing to retrieve from.
    #[instrument(skip(self, path), fields(filename = %display_name(path)))]
    pub async fn load_and_chunk(&self, path: &Path) -> Result<Vec<Chunk>> {
        let started = Instant::now();
        let owned: PathBuf = path.to_path_buf();
        let segments = tokio::task::spawn_blocking(move || loader::load(&owned))
            .await
            .map_err(|e| AppError::Internal(format!("Document loader task failed: {}", e)))??;

        let chunks = self.chunker.split(&segments);
        tracing::info!(
            segments = segments.len(),
            chunks = chunks.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Loaded and chunked document"
        );

        if chunks.is_empty() {
            return Err(AppError::Internal(format!(
                "No text could be extracted from '{}'",
                display_name(path)
            )));
        }

        Ok(chunks)
    }

    /// Embed every chunk and build a flat index over them.
    #[instrument(skip(self, chunks), fields(chunks = chunks.len()))]
    pub async fn build_index(&self, chunks: Vec<Chunk>) -> Result<FlatIndex<Chunk>> {
        let started = Instant::now();
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;

        if vectors.len() != chunks.len() {
            return Err(AppError::EmbeddingUnavailable(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                vectors.len()
            )));
        }

        let index = FlatIndex::build(chunks.into_iter().zip(vectors), self.metric)?;
        tracing::info!(
            model = self.embedder.model_name(),
            dimensions = index.dimensions().unwrap_or(0),
            duration_ms = started.elapsed().as_millis() as u64,
            "Built vector index"
        );
        Ok(index)
    }

    /// Process a freshly uploaded file the same way a query would. The index
    /// is dropped afterwards; only failures are surfaced. Returns the number
    /// of chunks indexed.
    #[instrument(skip(self, path), fields(filename = %display_name(path)))]
    pub async fn ingest(&self, path: &Path) -> Result<usize> {
        let chunks = self.load_and_chunk(path).await?;
        let index = self.build_index(chunks).await?;
        Ok(index.len())
    }

    /// Answer `query` against the document at `path` with `model`.
    #[instrument(skip(self, path, query), fields(filename = %display_name(path)))]
    pub async fn answer(&self, path: &Path, query: &str, model: &str) -> Result<String> {
        let chunks = self.load_and_chunk(path).await?;
        let index = self.build_index(chunks).await?;

        let query_vector = self.embedder.embed_query(query).await?;
        let hits = index.top_k(&query_vector, self.top_k)?;
        tracing::debug!(
            retrieved = hits.len(),
            best_score = hits.first().map(|h| h.score),
            "Retrieved context"
        );

        let context: Vec<&Chunk> = hits.iter().map(|hit| hit.item).collect();

        let started = Instant::now();
        let answer = self.generator.answer(query, &context, model).await?;
        tracing::info!(
            duration_ms = started.elapsed().as_millis() as u64,
            answer_chars = answer.chars().count(),
            "Generated answer"
        );
        Ok(answer)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::MockLLMClientFactoryTrait;
    use crate::llm::LLMClient;
    use crate::rag::embeddings::testing::{BagOfWordsEmbedder, DownEmbedder};
    use async_trait::async_trait;
    use mockall::predicate;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records the prompt it was given and answers with a fixed string.
    struct RecordingClient {
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl LLMClient for RecordingClient {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts
                .lock()
                .map_err(|e| AppError::Internal(e.to_string()))?
                .push(prompt.to_string());
            Ok("The sky is blue.".to_string())
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn recording_factory(prompts: Arc<Mutex<Vec<String>>>) -> MockLLMClientFactoryTrait {
        let mut factory = MockLLMClientFactoryTrait::new();
        factory
            .expect_create_for_model()
            .with(predicate::function(|m: &str| m == "gemma:2b"))
            .returning(move |_| {
                Ok(Box::new(RecordingClient {
                    prompts: prompts.clone(),
                }))
            });
        factory
    }

    fn small_config() -> RagConfig {
        RagConfig {
            chunk_size: 40,
            chunk_overlap: 5,
            top_k: 2,
            ..RagConfig::default()
        }
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_answer_stuffs_closest_chunks() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "facts.txt",
            "The sky is blue on a clear day.\n\
             Bananas are yellow when ripe and sweet.\n\
             Rust programs compile to native machine code.",
        );

        let prompts = Arc::new(Mutex::new(Vec::new()));
        let pipeline = RagPipeline::new(
            &small_config(),
            Arc::new(BagOfWordsEmbedder),
            Arc::new(recording_factory(prompts.clone())),
        )
        .unwrap();

        let answer = pipeline
            .answer(&path, "What color is the sky?", "gemma:2b")
            .await
            .unwrap();
        assert_eq!(answer, "The sky is blue.");

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("sky is blue"));
        assert!(prompts[0].contains("Question: What color is the sky?"));
    }

    #[tokio::test]
    async fn test_ingest_counts_chunks_without_calling_model() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.txt", &"word ".repeat(30));

        let mut factory = MockLLMClientFactoryTrait::new();
        factory.expect_create_for_model().never();

        let pipeline = RagPipeline::new(
            &small_config(),
            Arc::new(BagOfWordsEmbedder),
            Arc::new(factory),
        )
        .unwrap();

        // 150 chars in windows of 40 starting at 0, 35, 70, 105, 140
        assert_eq!(pipeline.ingest(&path).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_blank_document_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "blank.txt", "   \n\t  ");

        let pipeline = RagPipeline::new(
            &small_config(),
            Arc::new(BagOfWordsEmbedder),
            Arc::new(MockLLMClientFactoryTrait::new()),
        )
        .unwrap();

        let err = pipeline.ingest(&path).await.unwrap_err();
        assert!(err.to_string().contains("No text could be extracted"));
    }

    #[tokio::test]
    async fn test_embedding_outage_surfaces() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.txt", "The sky is blue.");

        let pipeline = RagPipeline::new(
            &small_config(),
            Arc::new(DownEmbedder),
            Arc::new(MockLLMClientFactoryTrait::new()),
        )
        .unwrap();

        let err = pipeline.answer(&path, "Sky?", "gemma:2b").await.unwrap_err();
        assert!(matches!(err, AppError::EmbeddingUnavailable(_)));
    }

    #[test]
    fn test_invalid_chunking_config_rejected() {
        let config = RagConfig {
            chunk_size: 10,
            chunk_overlap: 10,
            ..RagConfig::default()
        };
        let result = RagPipeline::new(
            &config,
            Arc::new(BagOfWordsEmbedder),
            Arc::new(MockLLMClientFactoryTrait::new()),
        );
        assert!(matches!(result, Err(AppError::Chunking(_))));
    }
}
