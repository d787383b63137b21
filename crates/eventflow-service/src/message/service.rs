//! Direct messaging between organisers and admins.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use eventflow_core::config::WorkflowConfig;
use eventflow_core::error::AppError;
use eventflow_core::result::AppResult;
use eventflow_core::types::{EventId, ListLimit, MessageId, UserId};
use eventflow_database::{MessageStore, UserDirectory};
use eventflow_entity::message::{Message, NewMessage, ThreadView};

use super::thread::ThreadResolver;
use crate::context::RequestContext;
use crate::notification::NotificationRules;

/// Longest accepted subject, in characters.
const MAX_SUBJECT_LENGTH: usize = 200;
/// Longest accepted body, in characters.
const MAX_BODY_LENGTH: usize = 10_000;

/// A message as composed by the sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessage {
    /// Event the conversation is about. Replies inherit the parent's.
    pub event_id: Option<EventId>,
    /// Addressee.
    pub recipient_id: UserId,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Message being replied to.
    pub parent_message_id: Option<MessageId>,
}

/// Sends, lists, threads and marks messages for the current user.
#[derive(Clone)]
pub struct MessageService {
    /// Message storage.
    messages: Arc<dyn MessageStore>,
    /// Recipient lookups.
    users: Arc<dyn UserDirectory>,
    /// Thread expansion.
    resolver: ThreadResolver,
    /// Default page size.
    default_limit: u32,
    /// Largest accepted page size.
    max_limit: u32,
}

impl std::fmt::Debug for MessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageService")
            .field("resolver", &self.resolver)
            .field("default_limit", &self.default_limit)
            .finish_non_exhaustive()
    }
}

impl MessageService {
    /// Creates a new message service.
    pub fn new(
        messages: Arc<dyn MessageStore>,
        users: Arc<dyn UserDirectory>,
        config: &WorkflowConfig,
    ) -> Self {
        Self {
            resolver: ThreadResolver::new(messages.clone(), config.max_thread_depth),
            messages,
            users,
            default_limit: config.default_list_limit,
            max_limit: config.max_list_limit,
        }
    }

    /// Send a message and notify its recipient in one unit of work.
    pub async fn send(&self, ctx: &RequestContext, input: SendMessage) -> AppResult<Message> {
        let subject = input.subject.trim();
        let body = input.body.trim();
        if subject.is_empty() || body.is_empty() {
            return Err(AppError::validation("subject and body are required"));
        }
        if subject.chars().count() > MAX_SUBJECT_LENGTH {
            return Err(AppError::validation(format!(
                "subject must be at most {MAX_SUBJECT_LENGTH} characters"
            )));
        }
        if body.chars().count() > MAX_BODY_LENGTH {
            return Err(AppError::validation(format!(
                "body must be at most {MAX_BODY_LENGTH} characters"
            )));
        }
        if input.recipient_id == ctx.user_id {
            return Err(AppError::validation("cannot send a message to yourself"));
        }

        match self.users.find_user(input.recipient_id).await? {
            Some(user) if user.is_active => {}
            _ => return Err(AppError::not_found("Recipient not found")),
        }

        let mut event_id = input.event_id;
        if let Some(parent_id) = input.parent_message_id {
            let parent = self
                .messages
                .find_by_id(parent_id)
                .await?
                .filter(|m| m.is_visible_to(ctx.user_id))
                .ok_or_else(|| AppError::not_found(format!("Message {parent_id} not found")))?;

            if parent.counterpart_of(ctx.user_id) != input.recipient_id {
                return Err(AppError::validation(
                    "a reply must be addressed to the other participant of the parent message",
                ));
            }
            match (event_id, parent.event_id) {
                (Some(given), Some(inherited)) if given != inherited => {
                    return Err(AppError::validation(
                        "a reply must belong to the same event as its parent",
                    ));
                }
                (None, inherited) => event_id = inherited,
                _ => {}
            }
        }

        let new = NewMessage {
            event_id,
            sender_id: ctx.user_id,
            recipient_id: input.recipient_id,
            subject: subject.to_string(),
            body: body.to_string(),
            parent_message_id: input.parent_message_id,
        };
        let sender_name = ctx.display_name.as_str();
        let (message, notification) = self
            .messages
            .send(&new, &|m: &Message| {
                NotificationRules::message_received(m, sender_name)
            })
            .await?;

        info!(
            message_id = %message.id,
            user_id = %ctx.user_id,
            recipient_id = %message.recipient_id,
            notification_id = %notification.id,
            "Message sent"
        );
        Ok(message)
    }

    /// Sent and received messages of the caller, newest first.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        limit: Option<u32>,
    ) -> AppResult<Vec<Message>> {
        let limit = ListLimit::resolve(limit, self.default_limit, self.max_limit);
        self.messages.list_for_user(ctx.user_id, limit).await
    }

    /// Number of unread messages addressed to the caller.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.messages.count_unread(ctx.user_id).await
    }

    /// The reply thread rooted at `root_id`, as visible to the caller.
    pub async fn thread(&self, ctx: &RequestContext, root_id: MessageId) -> AppResult<ThreadView> {
        self.resolver.resolve(root_id, ctx.user_id).await
    }

    /// Mark a message read. Only its recipient may do so.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        message_id: MessageId,
    ) -> AppResult<Message> {
        let message = self
            .messages
            .find_by_id(message_id)
            .await?
            .filter(|m| m.is_visible_to(ctx.user_id))
            .ok_or_else(|| AppError::not_found(format!("Message {message_id} not found")))?;

        if message.recipient_id != ctx.user_id {
            return Err(AppError::forbidden(
                "only the recipient can mark a message as read",
            ));
        }

        self.messages
            .mark_read(message_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Message {message_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use eventflow_core::error::ErrorKind;
    use eventflow_entity::notification::kind;

    use crate::testing::Fixture;

    fn compose(to: UserId) -> SendMessage {
        SendMessage {
            event_id: None,
            recipient_id: to,
            subject: "Parking".to_string(),
            body: "Where do runners park?".to_string(),
            parent_message_id: None,
        }
    }

    #[tokio::test]
    async fn test_send_notifies_recipient() {
        let fx = Fixture::new().await;
        let service = fx.messages();

        let message = service
            .send(&fx.organiser_ctx(), compose(fx.admin.id))
            .await
            .unwrap();

        assert_eq!(service.unread_count(&fx.admin_ctx()).await.unwrap(), 1);
        let inbox = fx.notifications().list(&fx.admin_ctx(), None).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, kind::MESSAGE_RECEIVED);
        assert_eq!(
            inbox[0].link.as_deref(),
            Some(format!("/messages/{}", message.id).as_str())
        );
    }

    #[tokio::test]
    async fn test_send_validation() {
        let fx = Fixture::new().await;
        let service = fx.messages();
        let ctx = fx.organiser_ctx();

        let err = service.send(&ctx, compose(ctx.user_id)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let mut blank = compose(fx.admin.id);
        blank.body = "  ".to_string();
        let err = service.send(&ctx, blank).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = service.send(&ctx, compose(UserId::new())).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_reply_inherits_event_and_must_address_counterpart() {
        let fx = Fixture::new().await;
        let service = fx.messages();
        let (o, a) = (fx.organiser_ctx(), fx.admin_ctx());

        let mut first = compose(a.user_id);
        first.event_id = Some(fx.event.id);
        let m1 = service.send(&o, first).await.unwrap();

        let bystander = fx
            .add_user("Bea", eventflow_entity::user::ActorRole::Admin, true)
            .await;
        let mut misaddressed = compose(bystander.id);
        misaddressed.parent_message_id = Some(m1.id);
        let err = service.send(&a, misaddressed).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let mut answer = compose(o.user_id);
        answer.parent_message_id = Some(m1.id);
        let m2 = service.send(&a, answer).await.unwrap();
        assert_eq!(m2.event_id, Some(fx.event.id));
        assert_eq!(m2.parent_message_id, Some(m1.id));
    }

    #[tokio::test]
    async fn test_only_recipient_marks_read() {
        let fx = Fixture::new().await;
        let service = fx.messages();
        let m1 = service
            .send(&fx.organiser_ctx(), compose(fx.admin.id))
            .await
            .unwrap();

        let err = service
            .mark_read(&fx.organiser_ctx(), m1.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let read = service.mark_read(&fx.admin_ctx(), m1.id).await.unwrap();
        assert!(read.read_at.is_some());
        assert_eq!(service.unread_count(&fx.admin_ctx()).await.unwrap(), 0);

        let err = service
            .mark_read(&fx.admin_ctx(), MessageId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_combines_inbox_and_sent() {
        let fx = Fixture::new().await;
        let service = fx.messages();
        let (o, a) = (fx.organiser_ctx(), fx.admin_ctx());
        service.send(&o, compose(a.user_id)).await.unwrap();
        service.send(&a, compose(o.user_id)).await.unwrap();

        let listed = service.list_for_user(&o, None).await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].sender_id, a.user_id);
        assert_eq!(listed[1].sender_id, o.user_id);
    }
}
