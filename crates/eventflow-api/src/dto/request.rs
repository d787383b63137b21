//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use eventflow_core::types::{EventId, MessageId, UserId};
use eventflow_service::SendMessage;

/// Reject request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RejectRequest {
    /// Why the event was declined. Shown to the organiser.
    #[validate(length(min = 1, max = 2000, message = "A rejection reason is required"))]
    pub reason: String,
}

/// Change request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangeRequestBody {
    /// What the organiser wants changed.
    #[validate(length(min = 1, max = 4000, message = "Change request text is required"))]
    pub text: String,
}

/// Send message request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Event the conversation is about.
    pub event_id: Option<EventId>,
    /// Addressee.
    pub recipient_id: UserId,
    /// Subject line.
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    /// Body text.
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
    /// Message being replied to.
    pub parent_message_id: Option<MessageId>,
}

impl From<SendMessageRequest> for SendMessage {
    fn from(req: SendMessageRequest) -> Self {
        Self {
            event_id: req.event_id,
            recipient_id: req.recipient_id,
            subject: req.subject,
            body: req.body,
            parent_message_id: req.parent_message_id,
        }
    }
}
