//! Session controller: owns the transcript and enforces single-flight
//! exchanges with the assistant gateway.

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, error};

use crate::config::Config;
use crate::gateway::{AssistantGateway, APOLOGY_REPLY};
use crate::message::Message;
use crate::transcript::Transcript;

/// Phase of the current exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    /// Ready to accept a submission
    Idle,
    /// Waiting for the gateway to settle
    Sending,
}

/// Everything the presentation layer needs to draw the widget.
#[derive(Debug, Clone, Copy)]
pub struct WidgetView<'a> {
    pub transcript: &'a Transcript,
    pub is_open: bool,
    pub is_awaiting_reply: bool,
    pub pending_input: &'a str,
}

/// One chat session, alive for as long as the widget is mounted.
///
/// At most one exchange is in flight. Submitting while a reply is pending is
/// ignored, so the transcript always reads greeting, then user/assistant
/// pairs in submission order.
pub struct SessionController {
    transcript: Transcript,
    pending_input: String,
    is_open: bool,
    gateway: AssistantGateway,
    in_flight: Option<oneshot::Receiver<String>>,
}

impl SessionController {
    /// Create a session seeded with the default greeting.
    pub fn new(gateway: AssistantGateway) -> Self {
        Self::with_transcript(gateway, Transcript::default())
    }

    /// Create a session seeded with a custom greeting.
    pub fn with_greeting(gateway: AssistantGateway, greeting: impl Into<String>) -> Self {
        Self::with_transcript(gateway, Transcript::with_greeting(greeting))
    }

    /// Create a session from the widget section of the app config.
    pub fn from_config(config: &Config, gateway: AssistantGateway) -> Self {
        let mut session = Self::with_greeting(gateway, config.widget.greeting.clone());
        session.is_open = config.widget.start_open;
        session
    }

    fn with_transcript(gateway: AssistantGateway, transcript: Transcript) -> Self {
        Self {
            transcript,
            pending_input: String::new(),
            is_open: false,
            gateway,
            in_flight: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn state(&self) -> ExchangeState {
        if self.is_awaiting_reply() {
            ExchangeState::Sending
        } else {
            ExchangeState::Idle
        }
    }

    /// Borrow the observable fields for rendering.
    pub fn view(&self) -> WidgetView<'_> {
        WidgetView {
            transcript: &self.transcript,
            is_open: self.is_open,
            is_awaiting_reply: self.is_awaiting_reply(),
            pending_input: &self.pending_input,
        }
    }

    /// Flip panel visibility. The conversation is untouched.
    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Replace the draft verbatim. Validation waits for submit.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Submit the current draft.
    pub fn submit_draft(&mut self) -> bool {
        let draft = self.pending_input.clone();
        self.submit(&draft)
    }

    /// Start an exchange with `raw_text`.
    ///
    /// Returns `false` without changing anything when the trimmed text is
    /// empty or a reply is still pending. Otherwise clears the draft, appends
    /// the user message and spawns the gateway call on the current tokio
    /// runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn submit(&mut self, raw_text: &str) -> bool {
        if self.is_awaiting_reply() {
            debug!("submission ignored: reply still pending");
            return false;
        }

        let text = raw_text.trim();
        if text.is_empty() {
            return false;
        }
        let text = text.to_string();

        let history = self.transcript.as_slice().to_vec();
        self.pending_input.clear();
        self.transcript.push(Message::user(text.clone()));

        let (tx, rx) = oneshot::channel();
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            let reply = gateway.reply(&text, &history).await;
            // Receiver gone means the session was dropped; nothing to deliver to.
            let _ = tx.send(reply);
        });
        self.in_flight = Some(rx);

        debug!(turns = self.transcript.len(), "exchange started");
        true
    }

    /// Settle the in-flight exchange if its reply has arrived.
    ///
    /// Non-blocking; call once per event loop tick. Returns `true` when an
    /// exchange settled during this call.
    pub fn poll_reply(&mut self) -> bool {
        let Some(rx) = self.in_flight.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok(reply) => {
                self.finish(reply);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                error!("gateway task ended without a reply");
                self.finish(APOLOGY_REPLY.to_string());
                true
            }
        }
    }

    /// Wait for the in-flight exchange to settle. Returns immediately when idle.
    pub async fn settle(&mut self) {
        let Some(rx) = self.in_flight.as_mut() else {
            return;
        };

        let reply = match rx.await {
            Ok(reply) => reply,
            Err(_) => {
                error!("gateway task ended without a reply");
                APOLOGY_REPLY.to_string()
            }
        };
        self.finish(reply);
    }

    fn finish(&mut self, reply: String) {
        self.in_flight = None;
        self.transcript.push(Message::assistant(reply));
        debug!(turns = self.transcript.len(), "exchange settled");
    }
}
