use crate::llm::client::LLMClient;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ollama_rs::{
    generation::chat::{request::ChatMessageRequest, ChatMessage},
    Ollama,
};

const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// Split an Ollama base URL into the `scheme://host` part and a port.
///
/// `http://localhost:11434` → (`http://localhost`, 11434). A missing scheme
/// defaults to `http`, a missing port to 11434.
pub fn parse_base_url(base_url: &str) -> (String, u16) {
    let (scheme, rest) = match base_url.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("http", base_url),
    };

    // Drop any path component
    let authority = rest.split('/').next().unwrap_or(rest);

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, port.parse().unwrap_or(DEFAULT_OLLAMA_PORT)),
        None => (authority, DEFAULT_OLLAMA_PORT),
    };

    let host = if host.is_empty() { "localhost" } else { host };
    (format!("{}://{}", scheme, host), port)
}

/// Build an `ollama-rs` handle for the given base URL.
pub fn connect(base_url: &str) -> Ollama {
    let (host, port) = parse_base_url(base_url);
    Ollama::builder().host(host.as_str()).port(port).build()
}

pub struct OllamaClient {
    client: Ollama,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: String) -> Self {
        Self {
            client: connect(base_url),
            model,
        }
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages = vec![ChatMessage::user(prompt.to_string())];

        let request = ChatMessageRequest::new(self.model.clone(), messages);

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| {
                AppError::GenerationUnavailable(format!(
                    "Ollama error for model '{}': {}",
                    self.model, e
                ))
            })?;

        Ok(response.message.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:11434", "http://localhost", 11434)]
    #[case("http://localhost", "http://localhost", 11434)]
    #[case("http://192.168.1.100:8080", "http://192.168.1.100", 8080)]
    #[case("https://ollama.internal:443/", "https://ollama.internal", 443)]
    #[case("localhost:11500", "http://localhost", 11500)]
    #[case("http://localhost:notaport", "http://localhost", 11434)]
    fn test_parse_base_url(#[case] input: &str, #[case] host: &str, #[case] port: u16) {
        assert_eq!(parse_base_url(input), (host.to_string(), port));
    }

    #[rstest]
    #[case("http://localhost:11434", "http://localhost:11434/")]
    #[case("gpu-box:11500", "http://gpu-box:11500/")]
    #[case("https://ollama.internal:8443/api", "https://ollama.internal:8443/")]
    fn test_connect_keeps_scheme_host_and_port(#[case] base_url: &str, #[case] expected: &str) {
        assert_eq!(connect(base_url).url_str(), expected);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_generation_unavailable() {
        // Port 9 (discard) is never an Ollama server
        let client = OllamaClient::new("http://127.0.0.1:9", "gemma:2b".to_string());
        match client.generate("hello").await {
            Err(AppError::GenerationUnavailable(msg)) => assert!(msg.contains("gemma:2b")),
            other => panic!("expected GenerationUnavailable, got {:?}", other),
        }
    }
}
