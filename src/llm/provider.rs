//! LLM Provider trait for extensible provider architecture.
//!
//! This module defines the `LlmProvider` trait that all LLM providers must implement.
//! It enables a unified interface for interacting with different LLM backends.

use async_trait::async_trait;
use thiserror::Error;

use super::{CompletionRequest, Provider};

/// Trait for LLM providers.
///
/// All LLM providers (Gemini, Anthropic, test doubles) implement this trait
/// to provide a unified interface for chat completions.
///
/// # Example
///
/// ```ignore
/// use bytebot::llm::{CompletionRequest, LlmProvider};
///
/// async fn ask(provider: &dyn LlmProvider) {
///     let request = CompletionRequest::from_history("Be brief.", &[], "Hello!");
///     match provider.complete(request).await {
///         Ok(text) => println!("{text}"),
///         Err(e) => eprintln!("{e}"),
///     }
/// }
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider type.
    fn provider(&self) -> Provider;

    /// Returns the current model name.
    fn model(&self) -> &str;

    /// Returns whether the provider has the credentials it needs.
    fn is_configured(&self) -> bool;

    /// Returns the display name for this provider instance.
    ///
    /// Defaults to the provider's standard display name.
    fn display_name(&self) -> &str {
        self.provider().display_name()
    }

    /// Send one completion request and return the reply text.
    ///
    /// An empty string is a valid result: it means the provider answered
    /// without any text.
    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String>;
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Provider is not configured (missing API key, etc.)
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit exceeded
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// API returned an error
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider-specific error
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::AuthenticationFailed(message),
            429 => Self::RateLimited(message),
            _ => Self::ApiError { status, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::NetworkError("Request timed out".to_string())
        } else if err.is_connect() {
            Self::NetworkError(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}
