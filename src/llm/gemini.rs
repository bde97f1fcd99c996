//! Google Gemini API client implementation.
//!
//! This module implements one-shot chat completions against the
//! `models/{model}:generateContent` endpoint.
//! See: https://ai.google.dev/api/generate-content

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{
    ChatMessage, CompletionRequest, LlmConfig, LlmProvider, Provider, ProviderError,
    ProviderResult,
};
use crate::message::Role;

/// Request body for generateContent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// A turn in Gemini's format. Gemini calls the assistant role "model".
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

/// Error response from the Gemini API.
#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    status: String,
    message: String,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: text.into() }],
        }
    }
}

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: Arc<LlmConfig>,
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
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
                Provider::Gemini.env_var_name()
            )));
        }

        let body = build_request(&self.config, request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            // Try to parse as Gemini error format
            if let Ok(error) = serde_json::from_str::<GeminiError>(&body) {
                return Err(ProviderError::from_status(
                    status.as_u16(),
                    format!("{} - {}", error.error.status, error.error.message),
                ));
            }

            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(reply_text(parsed))
    }
}

/// Convert a provider-neutral request to Gemini format.
fn build_request(config: &LlmConfig, request: CompletionRequest) -> GenerateContentRequest {
    let system_instruction = if request.system.is_empty() {
        None
    } else {
        Some(Content::text(None, request.system))
    };

    let contents = request
        .messages
        .into_iter()
        .map(|ChatMessage { role, content }| Content::text(Some(gemini_role(role)), content))
        .collect();

    let generation_config = if config.temperature.is_none() && config.max_tokens.is_none() {
        None
    } else {
        Some(GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
        })
    };

    GenerateContentRequest {
        system_instruction,
        contents,
        generation_config,
    }
}

/// Concatenate the text parts of the first candidate.
fn reply_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn test_config(api_base: &str) -> LlmConfig {
        let mut config = LlmConfig::default();
        config.api_base = api_base.to_string();
        config.api_key = "test-key".to_string();
        config.model = "gemini-test".to_string();
        config
    }

    fn hello_request() -> CompletionRequest {
        CompletionRequest {
            system: "Be concise.".to_string(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: "Hi".to_string(),
            }],
        }
    }

    #[test]
    fn test_request_serialization() {
        let mut config = test_config("http://unused");
        config.temperature = Some(0.5);
        config.max_tokens = Some(256);

        let body = build_request(&config, hello_request());
        let json = serde_json::to_string_pretty(&body).unwrap();

        assert_snapshot!(json, @r#"
        {
          "systemInstruction": {
            "parts": [
              {
                "text": "Be concise."
              }
            ]
          },
          "contents": [
            {
              "role": "user",
              "parts": [
                {
                  "text": "Hi"
                }
              ]
            }
          ],
          "generationConfig": {
            "temperature": 0.5,
            "maxOutputTokens": 256
          }
        }
        "#);
    }

    #[test]
    fn test_assistant_turns_map_to_model_role() {
        let config = test_config("http://unused");
        let request = CompletionRequest {
            system: String::new(),
            messages: vec![
                ChatMessage {
                    role: Role::User,
                    content: "a".to_string(),
                },
                ChatMessage {
                    role: Role::Assistant,
                    content: "b".to_string(),
                },
            ],
        };

        let body = build_request(&config, request);
        assert!(body.system_instruction.is_none());
        assert_eq!(body.contents[0].role.as_deref(), Some("user"));
        assert_eq!(body.contents[1].role.as_deref(), Some("model"));
    }

    #[test]
    fn test_generation_config_omitted_when_unset() {
        let mut config = test_config("http://unused");
        config.temperature = None;
        config.max_tokens = None;

        let json = serde_json::to_string(&build_request(&config, hello_request())).unwrap();
        assert!(!json.contains("generationConfig"));
    }

    #[test]
    fn test_reply_text_joins_parts_of_first_candidate() {
        let json = r#"{"candidates":[
            {"content":{"role":"model","parts":[{"text":"Hello, "},{"text":"world"}]}},
            {"content":{"role":"model","parts":[{"text":"ignored"}]}}
        ]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply_text(parsed), "Hello, world");
    }

    #[test]
    fn test_reply_text_empty_without_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(reply_text(parsed), "");
    }

    #[tokio::test]
    async fn test_complete_returns_reply() {
        let mut server = mockito::Server::new_async().await;

        let response_body = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "We offer cyber security, pen testing..."}]
                },
                "finishReason": "STOP"
            }]
        }"#;

        let mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"contents":[{"role":"user","parts":[{"text":"Hi"}]}]}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response_body)
            .create_async()
            .await;

        let client = GeminiClient::new(test_config(&server.url()));
        let reply = client.complete(hello_request()).await.unwrap();

        assert_eq!(reply, "We offer cyber security, pen testing...");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_maps_auth_error() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#,
            )
            .create_async()
            .await;

        let client = GeminiClient::new(test_config(&server.url()));
        let err = client.complete(hello_request()).await.unwrap_err();

        assert_eq!(
            err,
            ProviderError::AuthenticationFailed("PERMISSION_DENIED - API key not valid".to_string())
        );
    }

    #[tokio::test]
    async fn test_complete_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create_async()
            .await;

        let client = GeminiClient::new(test_config(&server.url()));
        assert!(client.complete(hello_request()).await.is_err());
    }

    #[tokio::test]
    async fn test_complete_without_key_skips_network() {
        let mut config = test_config("http://127.0.0.1:9");
        config.api_key.clear();

        let client = GeminiClient::new(config);
        let err = client.complete(hello_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
