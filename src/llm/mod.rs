//! LLM Clients and Abstractions
//!
//! Answers are generated by a model chosen per request. The rest of the
//! application only sees the [`LLMClient`] trait and obtains clients through
//! an [`LLMClientFactoryTrait`] implementation.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that model clients implement
//! - [`LLMClientFactoryTrait`] - Creates a client for a model name
//! - [`LLMClientFactory`] - Factory backed by a local Ollama server
//!
//! # Example
//!
//! ```ignore
//! use docqa::llm::{LLMClientFactory, LLMClientFactoryTrait};
//!
//! let factory = LLMClientFactory::new("http://localhost:11434");
//! let client = factory.create_for_model("llama3:8b").await?;
//!
//! let response = client.generate("What is 2+2?").await?;
//! println!("{}", response);
//! ```

/// Core LLM client and factory traits.
pub mod client;
/// Ollama-backed client and URL handling.
pub mod ollama;

pub use client::{LLMClient, LLMClientFactory, LLMClientFactoryTrait};
pub use ollama::OllamaClient;
