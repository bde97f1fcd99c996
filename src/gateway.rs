//! Assistant gateway: turns (utterance, history) into a displayable reply.
//!
//! Every failure is absorbed here. Callers always get a string back, either
//! the provider's answer or one of the fixed fallback sentences below.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::config::Config;
use crate::llm::{CompletionRequest, LlmClient, LlmConfig, ProviderError};
use crate::message::Message;
use crate::persona::Persona;

/// Reply used when the provider call fails for any reason.
pub const APOLOGY_REPLY: &str =
    "I encountered an error while processing your request. Please try again later.";

/// Reply used when the provider answers with no text.
pub const EMPTY_REPLY: &str = "I'm having trouble connecting right now.";

/// Boundary between the chat session and the hosted provider.
///
/// Holds no conversation state; all context arrives with each call.
#[derive(Clone)]
pub struct AssistantGateway {
    client: LlmClient,
    system_instruction: Arc<str>,
    timeout: Option<Duration>,
}

impl AssistantGateway {
    /// Create a gateway speaking for the given persona.
    pub fn new(client: LlmClient, persona: &Persona) -> Self {
        Self::with_system_instruction(client, persona.system_instruction())
    }

    /// Create a gateway with an explicit system instruction.
    pub fn with_system_instruction(client: LlmClient, instruction: impl Into<String>) -> Self {
        Self {
            client,
            system_instruction: Arc::from(instruction.into()),
            timeout: None,
        }
    }

    /// Bound how long a single provider call may take.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the gateway from app config and already-resolved credentials.
    pub fn from_config(config: &Config, llm: LlmConfig) -> Self {
        Self::new(LlmClient::new(llm), &config.persona).with_timeout(config.llm.request_timeout())
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Ask the provider for a reply to `utterance` given the prior `history`.
    ///
    /// Never fails: errors become [`APOLOGY_REPLY`], empty answers become
    /// [`EMPTY_REPLY`].
    pub async fn reply(&self, utterance: &str, history: &[Message]) -> String {
        let request = CompletionRequest::from_history(&*self.system_instruction, history, utterance);

        debug!(
            provider = self.client.display_name(),
            model = self.client.model(),
            turns = request.messages.len(),
            "sending exchange to provider"
        );

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.client.complete(request))
                .await
                .unwrap_or_else(|_| {
                    Err(ProviderError::NetworkError(format!(
                        "no reply within {}s",
                        limit.as_secs_f32()
                    )))
                }),
            None => self.client.complete(request).await,
        };

        match result {
            Ok(text) if text.is_empty() => {
                warn!(
                    provider = self.client.display_name(),
                    "provider returned an empty reply"
                );
                EMPTY_REPLY.to_string()
            }
            Ok(text) => text,
            Err(err) => {
                error!(
                    provider = self.client.display_name(),
                    model = self.client.model(),
                    error = %err,
                    "assistant provider call failed"
                );
                APOLOGY_REPLY.to_string()
            }
        }
    }
}
