//! Conversation management
//!
//! A conversation is owned exclusively by one orchestration run and is
//! append-only: turns are pushed, never mutated or removed.

use crate::agent::types::{Message, Role};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The ordered message history of a single run.
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Unique run/conversation ID
    pub id: Uuid,
    /// System prompt for this conversation
    pub system_prompt: String,
    /// Messages in the conversation
    messages: Vec<Message>,
    /// When the conversation started
    pub created_at: DateTime<Utc>,
    /// When the conversation last grew
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation with the given system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Conversation {
            id: Uuid::new_v4(),
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    /// Get messages formatted for an API request (system prompt first).
    pub fn api_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(self.messages.iter().cloned());
        messages
    }

    /// All turns appended so far, in order.
    pub fn turns(&self) -> &[Message] {
        &self.messages
    }

    /// Get message count (system prompt excluded).
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Check if the conversation is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get the last assistant message, if any.
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }
}
