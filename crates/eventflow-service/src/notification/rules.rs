//! Notification recipient resolution rules: who hears about which workflow
//! action, and what the notification says.

use serde_json::json;

use eventflow_core::config::{AdminFanout, WorkflowConfig};
use eventflow_core::types::{EventId, MessageId};
use eventflow_entity::event::EventRecord;
use eventflow_entity::message::Message;
use eventflow_entity::notification::{NewNotification, kind};
use eventflow_entity::workflow::{Audience, NotificationDraft};

/// Builds notification drafts for workflow actions and messages.
#[derive(Debug, Clone)]
pub struct NotificationRules {
    /// How "the admin role" is addressed.
    fanout: AdminFanout,
    /// Path prefix for event links.
    link_base: String,
}

impl NotificationRules {
    /// Creates rules from the workflow configuration.
    pub fn new(config: &WorkflowConfig) -> Self {
        Self {
            fanout: config.admin_fanout,
            link_base: config.link_base.trim_end_matches('/').to_string(),
        }
    }

    /// The audience for notifications addressed to the admin role.
    pub fn admin_audience(&self) -> Audience {
        match self.fanout {
            AdminFanout::Broadcast => Audience::ActiveAdmins,
            AdminFanout::Designated { user_id } => Audience::User(user_id),
        }
    }

    /// Link to an event page.
    pub fn event_link(&self, event_id: EventId) -> String {
        format!("{}/{event_id}", self.link_base)
    }

    /// Link to a message.
    pub fn message_link(message_id: MessageId) -> String {
        format!("/messages/{message_id}")
    }

    /// Organiser submitted an event; tell the admin role.
    pub fn submitted(&self, event: &EventRecord, organiser_name: &str) -> NotificationDraft {
        self.event_draft(
            self.admin_audience(),
            kind::EVENT_SUBMITTED,
            "Event submitted for approval",
            format!("{organiser_name} submitted \"{}\" for approval.", event.name),
            event,
            None,
        )
    }

    /// Admin approved an event; tell its organiser.
    pub fn published(&self, event: &EventRecord) -> NotificationDraft {
        self.event_draft(
            Audience::User(event.organiser_id),
            kind::EVENT_PUBLISHED,
            "Event approved",
            format!("Your event \"{}\" has been approved and published.", event.name),
            event,
            None,
        )
    }

    /// Admin rejected an event; tell its organiser why.
    pub fn rejected(&self, event: &EventRecord, reason: &str) -> NotificationDraft {
        self.event_draft(
            Audience::User(event.organiser_id),
            kind::EVENT_REJECTED,
            "Event rejected",
            format!("Your event \"{}\" was rejected: {reason}", event.name),
            event,
            Some(("reason", reason)),
        )
    }

    /// An event was cancelled. Admin cancellations go to the organiser,
    /// organiser cancellations go to the admin role.
    pub fn cancelled(&self, event: &EventRecord, by_admin: bool) -> NotificationDraft {
        let (audience, message) = if by_admin {
            (
                Audience::User(event.organiser_id),
                format!("Your event \"{}\" was cancelled by an administrator.", event.name),
            )
        } else {
            (
                self.admin_audience(),
                format!("The organiser cancelled \"{}\".", event.name),
            )
        };
        self.event_draft(
            audience,
            kind::EVENT_CANCELLED,
            "Event cancelled",
            message,
            event,
            None,
        )
    }

    /// Organiser asked for changes to an event under review.
    pub fn change_requested(&self, event: &EventRecord, text: &str) -> NotificationDraft {
        self.event_draft(
            self.admin_audience(),
            kind::CHANGE_REQUESTED,
            "Change requested",
            format!("Change requested for \"{}\": {text}", event.name),
            event,
            Some(("request", text)),
        )
    }

    /// Admin edited an event; tell its organiser.
    pub fn admin_updated(&self, event: &EventRecord, summary: &str) -> NotificationDraft {
        self.event_draft(
            Audience::User(event.organiser_id),
            kind::EVENT_UPDATED,
            "Event updated by an administrator",
            format!("\"{}\" was updated: {summary}", event.name),
            event,
            None,
        )
    }

    /// Recipient notification for a freshly sent message.
    pub fn message_received(message: &Message, sender_name: &str) -> NewNotification {
        NewNotification {
            user_id: message.recipient_id,
            notification_type: kind::MESSAGE_RECEIVED.to_string(),
            title: format!("New message from {sender_name}"),
            message: message.subject.clone(),
            link: Some(Self::message_link(message.id)),
            metadata: Some(json!({
                "message_id": message.id,
                "sender_id": message.sender_id,
                "event_id": message.event_id,
            })),
        }
    }

    fn event_draft(
        &self,
        audience: Audience,
        notification_type: &str,
        title: &str,
        message: String,
        event: &EventRecord,
        extra: Option<(&str, &str)>,
    ) -> NotificationDraft {
        let mut metadata = json!({
            "event_id": event.id,
            "event_name": event.name,
        });
        if let (Some((key, value)), Some(map)) = (extra, metadata.as_object_mut()) {
            map.insert(key.to_string(), json!(value));
        }
        NotificationDraft {
            audience,
            notification_type: notification_type.to_string(),
            title: title.to_string(),
            message,
            link: Some(self.event_link(event.id)),
            metadata: Some(metadata),
        }
    }
}
