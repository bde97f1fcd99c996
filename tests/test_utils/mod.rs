//! Test doubles for the assistant provider.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use bytebot::gateway::AssistantGateway;
use bytebot::llm::{
    CompletionRequest, LlmClient, LlmProvider, Provider, ProviderError, ProviderResult,
};
use bytebot::session::SessionController;

/// Replies from a queue, repeating the last entry once the queue runs dry,
/// and records every request it sees.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ProviderResult<String>>>,
    last: Mutex<ProviderResult<String>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<ProviderResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(Ok(String::new())),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn always(reply: &str) -> Arc<Self> {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn failing(err: ProviderError) -> Arc<Self> {
        Self::new(vec![Err(err)])
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model(&self) -> &str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String> {
        self.requests.lock().unwrap().push(request);

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(result) => {
                *self.last.lock().unwrap() = result.clone();
                result
            }
            None => self.last.lock().unwrap().clone(),
        }
    }
}

/// Holds each reply until the test opens the gate.
pub struct GatedProvider {
    pub gate: Arc<Notify>,
    reply: String,
}

impl GatedProvider {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            gate: Arc::new(Notify::new()),
            reply: reply.to_string(),
        })
    }
}

#[async_trait]
impl LlmProvider for GatedProvider {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model(&self) -> &str {
        "gated"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn complete(&self, _request: CompletionRequest) -> ProviderResult<String> {
        self.gate.notified().await;
        Ok(self.reply.clone())
    }
}

/// Panics inside `complete`, so the gateway task dies without replying.
pub struct PanickingProvider;

#[async_trait]
impl LlmProvider for PanickingProvider {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model(&self) -> &str {
        "panicking"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn complete(&self, _request: CompletionRequest) -> ProviderResult<String> {
        panic!("provider blew up mid-request");
    }
}

/// A session whose gateway talks to `provider`.
pub fn session_with(provider: Arc<dyn LlmProvider>) -> SessionController {
    let gateway = AssistantGateway::with_system_instruction(
        LlmClient::from_provider(provider),
        "You are ByteBot.",
    );
    SessionController::new(gateway)
}
