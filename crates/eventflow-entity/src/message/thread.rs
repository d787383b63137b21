//! Resolved reply threads.

use serde::{Deserialize, Serialize};

use eventflow_core::types::MessageId;

use super::model::Message;

/// A message placed in a thread, with its reply depth (root = 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadedMessage {
    /// The message itself.
    #[serde(flatten)]
    pub message: Message,
    /// Distance from the thread root.
    pub depth: u32,
}

/// A thread as seen by one participant, ordered by `created_at` ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadView {
    /// The entry point the thread was resolved from.
    pub root_id: MessageId,
    /// Visible messages in chronological order.
    pub messages: Vec<ThreadedMessage>,
    /// Set when replies exist beyond the configured depth bound and were
    /// left out.
    pub truncated: bool,
}

impl ThreadView {
    /// Message identifiers in thread order.
    pub fn ids(&self) -> Vec<MessageId> {
        self.messages.iter().map(|m| m.message.id).collect()
    }

    /// Number of messages in the thread.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the thread holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
