//! Anthropic (Claude) API client implementation.
//!
//! This module implements one-shot chat completions for Anthropic's Messages API.
//! See: https://docs.anthropic.com/en/api/messages

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{
    ChatMessage, CompletionRequest, LlmConfig, LlmProvider, Provider, ProviderError,
    ProviderResult,
};

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default when the config does not set max_tokens; the API requires one.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Request body for Anthropic Messages API.
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

/// Message format for Anthropic API.
/// Note: Anthropic only supports "user" and "assistant" roles.
/// System prompts are passed as a separate field.
#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

/// Non-streaming response body.
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

/// Error response from Anthropic API.
#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

/// Anthropic API client.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    config: Arc<LlmConfig>,
}

impl AnthropicClient {
    /// Create a new Anthropic client with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured(format!(
                "{} is not set",
                Provider::Anthropic.env_var_name()
            )));
        }

        let url = format!("{}/messages", self.config.api_base);
        let body = build_request(&self.config, request);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            // Try to parse as Anthropic error format
            if let Ok(error) = serde_json::from_str::<AnthropicError>(&body) {
                return Err(ProviderError::from_status(
                    status.as_u16(),
                    format!("{} - {}", error.error.error_type, error.error.message),
                ));
            }

            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        let parsed: AnthropicResponse = response.json().await?;
        Ok(reply_text(parsed))
    }
}

/// Convert a provider-neutral request to Anthropic format.
fn build_request(config: &LlmConfig, request: CompletionRequest) -> AnthropicRequest {
    let system = if request.system.is_empty() {
        None
    } else {
        Some(request.system)
    };

    let messages = request
        .messages
        .into_iter()
        .map(|ChatMessage { role, content }| AnthropicMessage {
            role: role.as_str(),
            content,
        })
        .collect();

    AnthropicRequest {
        model: config.model.clone(),
        messages,
        max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: config.temperature,
        system,
    }
}

/// Concatenate all text blocks; tool and thinking blocks are skipped.
fn reply_text(response: AnthropicResponse) -> String {
    response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .map(|block| block.text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    fn test_config(api_base: &str) -> LlmConfig {
        let mut config = LlmConfig::for_provider(Provider::Anthropic);
        config.api_base = api_base.to_string();
        config.api_key = "test-key".to_string();
        config
    }

    fn hello_request() -> CompletionRequest {
        CompletionRequest {
            system: "Be helpful.".to_string(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: "Hello".to_string(),
            }],
        }
    }

    #[test]
    fn test_request_serialization() {
        let mut config = test_config("http://unused");
        config.temperature = None;
        config.max_tokens = None;

        let json = serde_json::to_string(&build_request(&config, hello_request())).unwrap();
        assert!(json.contains("\"model\":\"claude-sonnet-4-5\""));
        assert!(json.contains("\"max_tokens\":1024"));
        assert!(json.contains("\"system\":\"Be helpful.\""));
        assert!(json.contains("\"role\":\"user\""));
        // temperature should be omitted when None
        assert!(!json.contains("\"temperature\""));
    }

    #[test]
    fn test_request_serialization_without_system() {
        let config = test_config("http://unused");
        let mut request = hello_request();
        request.system.clear();

        let json = serde_json::to_string(&build_request(&config, request)).unwrap();
        assert!(!json.contains("\"system\""));
    }

    #[test]
    fn test_reply_text_skips_non_text_blocks() {
        let json = r#"{"content":[
            {"type":"thinking","thinking":"hmm"},
            {"type":"text","text":"Book a "},
            {"type":"text","text":"discovery call."}
        ]}"#;
        let parsed: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply_text(parsed), "Book a discovery call.");
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{"type":"error","error":{"type":"invalid_api_key","message":"Invalid API key provided"}}"#;
        let error: AnthropicError = serde_json::from_str(json).unwrap();
        assert_eq!(error.error.error_type, "invalid_api_key");
        assert_eq!(error.error.message, "Invalid API key provided");
    }

    #[tokio::test]
    async fn test_complete_returns_reply() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"msg_1","type":"message","role":"assistant","content":[{"type":"text","text":"Hi there!"}]}"#)
            .create_async()
            .await;

        let client = AnthropicClient::new(test_config(&server.url()));
        let reply = client.complete(hello_request()).await.unwrap();

        assert_eq!(reply, "Hi there!");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_maps_rate_limit() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/messages")
            .with_status(429)
            .with_body(r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#)
            .create_async()
            .await;

        let client = AnthropicClient::new(test_config(&server.url()));
        let err = client.complete(hello_request()).await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::RateLimited("rate_limit_error - slow down".to_string())
        );
    }

    #[test]
    fn test_provider_type() {
        let client = AnthropicClient::new(LlmConfig::for_provider(Provider::Anthropic));
        assert_eq!(client.provider(), Provider::Anthropic);
        assert_eq!(client.display_name(), "Anthropic");
        assert!(!client.is_configured());
    }
}
