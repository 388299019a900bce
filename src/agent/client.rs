//! Model backend client.
//!
//! The orchestrator talks to the text-generation backend through the
//! [`ModelClient`] trait: one conversation in, exactly one assistant turn
//! out. The production implementation speaks the OpenAI-compatible chat
//! completions endpoint exposed by an Ollama server.

use crate::agent::types::*;
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

/// Boundary to the text-generation backend.
///
/// A single call sends the full conversation (system prompt included) plus
/// the declared tool schemas and yields one assistant turn. Connectivity or
/// protocol failures are fatal to the run; the orchestrator performs no
/// in-loop retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Request one assistant turn for the given conversation.
    async fn complete(
        &self,
        messages: Vec<Message>,
        tools: &[ToolDefinition],
        options: &GenerationOptions,
    ) -> Result<Message>;
}

/// Chat completions client for an Ollama server.
#[derive(Clone)]
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Model configuration
    config: ModelConfig,
}

impl OllamaClient {
    /// Create a new client from model configuration.
    pub fn new(config: ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(OllamaClient { client, config })
    }

    /// Get the configured model identifier.
    pub fn model_id(&self) -> &str {
        &self.config.model_id
    }

    async fn send_request(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        debug!("Sending request to Ollama: model={}", request.model);

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let body = response.json::<ChatCompletionResponse>().await?;

        if let Some(ref usage) = body.usage {
            info!(
                "Ollama response: model={}, tokens={}",
                body.model, usage.total_tokens
            );
        }

        Ok(body)
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        tools: &[ToolDefinition],
        options: &GenerationOptions,
    ) -> Result<Message> {
        // Tool definitions are only attached when the configured model
        // declares tool support.
        let use_tools = self.config.supports_tools && !tools.is_empty();

        let request = ChatCompletionRequest {
            model: self.config.model_id.clone(),
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stream: Some(false),
            tools: if use_tools { Some(tools.to_vec()) } else { None },
            tool_choice: if use_tools { Some("auto".to_string()) } else { None },
        };

        let response = self.send_request(request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Provider("model returned no choices".to_string()))?;

        debug!(
            "Model turn: finish_reason={}, has_tool_calls={}",
            choice.finish_reason.as_deref().unwrap_or("unknown"),
            choice.message.has_tool_calls()
        );

        Ok(choice.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> ModelConfig {
        ModelConfig {
            base_url,
            model_id: "llama3.1:8b".to_string(),
            supports_tools: true,
            timeout_secs: 5,
        }
    }

    #[test]
    fn client_creation() {
        let client = OllamaClient::new(test_config("http://localhost:11434".into()));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn parses_assistant_turn() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama3.1:8b",
                "choices": [{
                    "message": {"role": "assistant", "content": "{\"tips\":[]}"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(test_config(server.uri())).unwrap();
        let turn = client
            .complete(vec![Message::user("hi")], &[], &GenerationOptions::balanced())
            .await
            .unwrap();

        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "{\"tips\":[]}");
    }

    #[tokio::test]
    async fn parses_tool_call_turn() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama3.1:8b",
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call-1",
                            "type": "function",
                            "function": {
                                "name": "trip_context",
                                "arguments": "{\"tripType\":\"city\",\"days\":3}"
                            }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(test_config(server.uri())).unwrap();
        let turn = client
            .complete(vec![Message::user("hi")], &[], &GenerationOptions::balanced())
            .await
            .unwrap();

        assert!(turn.has_tool_calls());
        let calls = turn.tool_calls.unwrap();
        assert_eq!(calls[0].function.name, "trip_context");
    }

    #[tokio::test]
    async fn http_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(test_config(server.uri())).unwrap();
        let err = client
            .complete(vec![Message::user("hi")], &[], &GenerationOptions::balanced())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Provider(_)));
    }

    #[tokio::test]
    async fn empty_choices_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama3.1:8b",
                "choices": []
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(test_config(server.uri())).unwrap();
        let err = client
            .complete(vec![Message::user("hi")], &[], &GenerationOptions::balanced())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Provider(_)));
    }
}
