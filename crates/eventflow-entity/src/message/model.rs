//! Message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eventflow_core::types::{EventId, MessageId, UserId};

/// A directed message between two users, optionally scoped to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// The event this conversation is about, if any.
    pub event_id: Option<EventId>,
    /// Author.
    pub sender_id: UserId,
    /// Addressee.
    pub recipient_id: UserId,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// The message this one replies to.
    pub parent_message_id: Option<MessageId>,
    /// When the recipient read it. `None` means unread.
    pub read_at: Option<DateTime<Utc>>,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A message is visible only to its sender and recipient.
    pub fn is_visible_to(&self, user_id: UserId) -> bool {
        self.sender_id == user_id || self.recipient_id == user_id
    }

    /// The other party of the conversation from `user_id`'s point of view.
    pub fn counterpart_of(&self, user_id: UserId) -> UserId {
        if self.sender_id == user_id {
            self.recipient_id
        } else {
            self.sender_id
        }
    }

    /// Check if the recipient has not read the message yet.
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}

/// Data required to send a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    /// Optional event scope.
    pub event_id: Option<EventId>,
    /// Author.
    pub sender_id: UserId,
    /// Addressee.
    pub recipient_id: UserId,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Parent message, which must already exist.
    pub parent_message_id: Option<MessageId>,
}
