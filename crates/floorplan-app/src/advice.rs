//! Design-advice chat boundary.
//!
//! The editor talks to an external language-model service through
//! [`AdviceService`]. No network client ships with the crate; hosts plug one
//! in. [`AdviceClient`] keeps the conversation and turns every failure into a
//! placeholder reply so the chat never surfaces an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Instructions sent ahead of every conversation.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert architect and interior designer helping \
the user design their home. Give concise, professional advice on floor plan layouts, furniture \
arrangement ergonomics, color and materials, standard dimensions (doors, hallways, counter \
heights) and sustainable design. Keep answers practical for a CAD user and be precise about \
measurements.";

pub const GREETING: &str =
    "Hello! I am your AI Architect assistant. Ask me about floor plans, dimensions, or design ideas.";
pub const NOT_CONFIGURED_REPLY: &str = "Error: API Key not configured.";
pub const EMPTY_REPLY: &str = "I couldn't generate a response.";
pub const FAILURE_REPLY: &str = "Sorry, I encountered an error connecting to the AI Architect service.";

/// Advice service errors.
#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("advice service is not configured")]
    NotConfigured,
    #[error("advice service request failed: {0}")]
    Request(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Flatten a conversation and the new prompt into one transcript.
pub fn transcript(history: &[ChatMessage], prompt: &str) -> String {
    let mut text = String::new();
    for message in history {
        let speaker = match message.role {
            ChatRole::User => "User",
            ChatRole::Model => "Assistant",
        };
        text.push_str(speaker);
        text.push_str(": ");
        text.push_str(&message.text);
        text.push('\n');
    }
    text.push_str("\nUser: ");
    text.push_str(prompt);
    text
}

/// A remote advice backend.
pub trait AdviceService {
    /// Answer `prompt` given the prior conversation.
    fn ask(&self, history: &[ChatMessage], prompt: &str) -> Result<String, AdviceError>;
}

/// Service used when no backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredAdvice;

impl AdviceService for UnconfiguredAdvice {
    fn ask(&self, _history: &[ChatMessage], _prompt: &str) -> Result<String, AdviceError> {
        Err(AdviceError::NotConfigured)
    }
}

/// Chat state on top of an [`AdviceService`].
pub struct AdviceClient {
    service: Box<dyn AdviceService>,
    messages: Vec<ChatMessage>,
}

impl std::fmt::Debug for AdviceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdviceClient")
            .field("messages", &self.messages.len())
            .finish_non_exhaustive()
    }
}

impl Default for AdviceClient {
    fn default() -> Self {
        Self::new(Box::new(UnconfiguredAdvice))
    }
}

impl AdviceClient {
    pub fn new(service: Box<dyn AdviceService>) -> Self {
        Self {
            service,
            messages: vec![ChatMessage::model(GREETING)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a prompt and record both turns. Blank prompts are ignored.
    ///
    /// Returns the reply, which is a placeholder when the service fails.
    pub fn send(&mut self, prompt: &str) -> Option<&str> {
        if prompt.trim().is_empty() {
            return None;
        }
        let reply = self.ask(prompt);
        self.messages.push(ChatMessage::user(prompt));
        self.messages.push(ChatMessage::model(reply));
        self.messages.last().map(|m| m.text.as_str())
    }

    /// Ask without recording. Never fails.
    pub fn ask(&self, prompt: &str) -> String {
        match self.service.ask(&self.messages, prompt) {
            Ok(reply) if reply.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(reply) => reply,
            Err(AdviceError::NotConfigured) => {
                log::warn!("Advice service is not configured");
                NOT_CONFIGURED_REPLY.to_string()
            }
            Err(e) => {
                log::warn!("Advice service error: {}", e);
                FAILURE_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Scripted {
        reply: Result<&'static str, &'static str>,
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl AdviceService for Scripted {
        fn ask(&self, history: &[ChatMessage], prompt: &str) -> Result<String, AdviceError> {
            self.seen.borrow_mut().push(transcript(history, prompt));
            self.reply
                .map(str::to_string)
                .map_err(|e| AdviceError::Request(e.to_string()))
        }
    }

    fn scripted(reply: Result<&'static str, &'static str>) -> (AdviceClient, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let client = AdviceClient::new(Box::new(Scripted {
            reply,
            seen: seen.clone(),
        }));
        (client, seen)
    }

    #[test]
    fn test_unconfigured_returns_placeholder() {
        let mut client = AdviceClient::default();
        assert_eq!(client.send("How wide is a hallway?"), Some(NOT_CONFIGURED_REPLY));
        assert!(matches!(
            UnconfiguredAdvice.ask(&[], "hi"),
            Err(AdviceError::NotConfigured)
        ));
    }

    #[test]
    fn test_failure_becomes_apology() {
        let (mut client, _) = scripted(Err("timeout"));
        assert_eq!(client.send("hi"), Some(FAILURE_REPLY));
        assert_eq!(client.messages().len(), 3);
    }

    #[test]
    fn test_empty_reply_placeholder() {
        let (client, _) = scripted(Ok("  "));
        assert_eq!(client.ask("hi"), EMPTY_REPLY);
    }

    #[test]
    fn test_history_is_forwarded() {
        let (mut client, seen) = scripted(Ok("36 inches"));
        assert_eq!(client.send("Door width?"), Some("36 inches"));
        let _ = client.send("And hallways?");
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].starts_with("Assistant: Hello!"));
        assert!(seen[1].contains("User: Door width?\nAssistant: 36 inches\n"));
        assert!(seen[1].ends_with("\nUser: And hallways?"));
    }

    #[test]
    fn test_blank_prompt_ignored() {
        let mut client = AdviceClient::default();
        assert_eq!(client.send("   "), None);
        assert_eq!(client.messages().len(), 1);
    }
}
