//! Append-only conversation history.

use std::ops::Index;

use crate::message::Message;

/// Greeting every new session starts with.
pub const DEFAULT_GREETING: &str =
    "Hello! I am ByteBot. How can ByteCode Labs help secure your digital future today?";

/// Ordered history of role-tagged messages for one chat session.
///
/// Entries can only be appended. The transcript is never empty: it is seeded
/// with an assistant greeting when created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }
}

impl Transcript {
    /// Create a transcript seeded with a single assistant greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
        }
    }

    /// Append a message at the end of the history.
    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Index<usize> for Transcript {
    type Output = Message;

    fn index(&self, index: usize) -> &Self::Output {
        &self.messages[index]
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn test_default_transcript_is_seeded_with_greeting() {
        let transcript = Transcript::default();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role(), Role::Assistant);
        assert_eq!(transcript[0].content(), DEFAULT_GREETING);
    }

    #[test]
    fn test_push_preserves_insertion_order() {
        let mut transcript = Transcript::with_greeting("hi");
        transcript.push(Message::user("one"));
        transcript.push(Message::assistant("two"));

        let contents: Vec<&str> = transcript.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["hi", "one", "two"]);
        assert_eq!(transcript.last().map(|m| m.role()), Some(Role::Assistant));
    }
}
