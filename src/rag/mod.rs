//! Retrieval Augmented Generation (RAG) Pipeline
//!
//! This module turns an uploaded document into answers grounded in its text.
//!
//! # Module Structure
//!
//! - [`rag::loader`](crate::rag::loader) - Format-specific text extraction (PDF, Word, spreadsheets, CSV, text)
//! - [`rag::chunker`](crate::rag::chunker) - Overlapping fixed-size character windows
//! - [`rag::embeddings`](crate::rag::embeddings) - Embedding providers (Ollama)
//! - [`rag::answer`](crate::rag::answer) - "Stuff" prompt construction and generation
//! - [`rag::pipeline`](crate::rag::pipeline) - Per-request orchestration
//!
//! # RAG Pipeline
//!
//! Every query runs the full flow against the stored file:
//!
//! 1. **Loading** - The file is parsed into text segments
//! 2. **Chunking** - Segments are split into overlapping windows
//! 3. **Indexing** - Chunks are embedded into an in-memory flat index
//! 4. **Retrieval** - The query is embedded and the top-k chunks retrieved
//! 5. **Generation** - The requested model answers from those chunks
//!
//! # Example
//!
//! ```ignore
//! use docqa::rag::pipeline::RagPipeline;
//!
//! let pipeline = RagPipeline::new(&config.rag, embedder, llm_factory)?;
//! let answer = pipeline
//!     .answer(Path::new("uploads/report.pdf"), "What was the revenue?", "llama3:8b")
//!     .await?;
//! ```

pub mod answer;
pub mod chunker;
pub mod embeddings;
pub mod loader;
pub mod pipeline;
