//! LLM client module for the hosted assistant providers.
//!
//! This module provides a unified interface for one-shot chat completions.
//! Currently supports:
//! - Google Gemini (generateContent)
//! - Anthropic (Messages API)

mod anthropic;
mod gemini;
mod provider;

pub use provider::{LlmProvider, ProviderError, ProviderResult};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;

use crate::config::LlmConfigFile;
use crate::message::{Message, Role};

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    Anthropic,
}

impl Provider {
    /// Get the display name for this provider.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Google Gemini",
            Provider::Anthropic => "Anthropic",
        }
    }

    /// Get the default API base URL for this provider.
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Provider::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    /// Get the default model for this provider.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-3-flash-preview",
            Provider::Anthropic => "claude-sonnet-4-5",
        }
    }

    /// Get the environment variable name for the API key.
    pub fn env_var_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Chat message in provider-neutral form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
        }
    }
}

/// One completion call: the persona plus the conversation so far.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction sent alongside, never part of the conversation.
    pub system: String,
    /// Conversation turns, oldest first, ending with the new user utterance.
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// Build a request from the prior transcript and the new utterance.
    ///
    /// Leading assistant turns are dropped: both providers require the
    /// conversation to open with a user turn, and the only such turn is the
    /// synthetic greeting.
    pub fn from_history(system: impl Into<String>, history: &[Message], utterance: &str) -> Self {
        let messages = history
            .iter()
            .skip_while(|m| m.role() == Role::Assistant)
            .map(ChatMessage::from)
            .chain(std::iter::once(ChatMessage {
                role: Role::User,
                content: utterance.to_string(),
            }))
            .collect();

        Self {
            system: system.into(),
            messages,
        }
    }
}

/// LLM client configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::for_provider(Provider::default())
    }
}

impl LlmConfig {
    /// Default configuration for a given provider, without credentials.
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            api_base: provider.default_api_base().to_string(),
            api_key: String::new(),
            model: provider.default_model().to_string(),
            temperature: Some(0.7),
            max_tokens: Some(1024),
        }
    }

    /// Check if the client is configured with an API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Build from the file config only. Empty fields fall back to provider defaults.
    pub fn from_config(file_config: &LlmConfigFile) -> Self {
        let provider = file_config.provider;
        let mut config = Self::for_provider(provider);

        if !file_config.api_base.is_empty() {
            config.api_base = file_config.api_base.trim_end_matches('/').to_string();
        }
        if let Some(ref key) = file_config.api_key {
            config.api_key = key.clone();
        }
        if !file_config.model.is_empty() {
            config.model = file_config.model.clone();
        }
        config.temperature = file_config.temperature;
        config.max_tokens = file_config.max_tokens;

        config
    }

    /// Load from environment variables, with file config as fallback.
    ///
    /// Only the binary calls this, once at startup. Everything below it
    /// receives the resolved value.
    pub fn from_env_and_config(file_config: &LlmConfigFile) -> Self {
        let mut config = Self::from_config(file_config);

        // Environment variables override file config
        if let Ok(key) = std::env::var(config.provider.env_var_name()) {
            config.api_key = key;
        }

        if let Ok(model) = std::env::var("BYTEBOT_MODEL") {
            config.model = model;
        }

        config
    }
}

/// LLM client for making API calls.
///
/// This is a unified client that wraps a provider implementing `LlmProvider`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn LlmProvider>,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        let provider: Arc<dyn LlmProvider> = match config.provider {
            Provider::Gemini => Arc::new(GeminiClient::new(config)),
            Provider::Anthropic => Arc::new(AnthropicClient::new(config)),
        };

        Self { inner: provider }
    }

    /// Create a new LLM client from an existing provider.
    ///
    /// Use this when you have a custom or pre-configured provider.
    pub fn from_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self { inner: provider }
    }

    /// Check if the client is configured.
    pub fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        self.inner.model()
    }

    /// Get the display name for this provider.
    pub fn display_name(&self) -> &str {
        self.inner.display_name()
    }

    /// Send a completion request and wait for the full reply.
    pub async fn complete(&self, request: CompletionRequest) -> ProviderResult<String> {
        self.inner.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_client_gemini_provider() {
        let config = LlmConfig::default();
        let client = LlmClient::new(config);
        assert_eq!(client.display_name(), "Google Gemini");
        assert_eq!(client.model(), "gemini-3-flash-preview");
    }

    #[test]
    fn test_llm_client_anthropic_provider() {
        let config = LlmConfig::for_provider(Provider::Anthropic);
        let client = LlmClient::new(config);
        assert_eq!(client.display_name(), "Anthropic");
        assert_eq!(client.model(), "claude-sonnet-4-5");
    }

    #[test]
    fn test_llm_client_not_configured_without_key() {
        let client = LlmClient::new(LlmConfig::default());
        assert!(!client.is_configured());
    }

    #[test]
    fn test_llm_client_configured_with_key() {
        let mut config = LlmConfig::default();
        config.api_key = "test-key".to_string();
        let client = LlmClient::new(config);
        assert!(client.is_configured());
    }

    #[test]
    fn test_from_config_falls_back_to_provider_defaults() {
        let file = LlmConfigFile {
            provider: Provider::Anthropic,
            api_base: String::new(),
            api_key: Some("k".to_string()),
            model: String::new(),
            temperature: None,
            max_tokens: Some(64),
            request_timeout_secs: 5,
        };
        let config = LlmConfig::from_config(&file);
        assert_eq!(config.api_base, "https://api.anthropic.com/v1");
        assert_eq!(config.model, "claude-sonnet-4-5");
        assert_eq!(config.api_key, "k");
        assert_eq!(config.temperature, None);
        assert_eq!(config.max_tokens, Some(64));
    }

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let file = LlmConfigFile {
            api_base: "http://localhost:8080/v1beta/".to_string(),
            ..LlmConfigFile::default()
        };
        assert_eq!(
            LlmConfig::from_config(&file).api_base,
            "http://localhost:8080/v1beta"
        );
    }

    #[test]
    fn test_completion_request_drops_leading_greeting() {
        let history = vec![
            Message::assistant("Hello! I am ByteBot."),
            Message::user("first"),
            Message::assistant("reply"),
        ];
        let request = CompletionRequest::from_history("persona", &history, "second");

        assert_eq!(request.system, "persona");
        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(request.messages[0].content, "first");
        assert_eq!(request.messages[2].content, "second");
    }

    #[test]
    fn test_completion_request_first_turn_is_only_utterance() {
        let history = vec![Message::assistant("greeting")];
        let request = CompletionRequest::from_history("persona", &history, "hi");
        assert_eq!(
            request.messages,
            vec![ChatMessage {
                role: Role::User,
                content: "hi".to_string()
            }]
        );
    }
}
