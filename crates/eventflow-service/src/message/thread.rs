//! Reply-thread resolution.
//!
//! A thread is expanded breadth-first from its root over
//! `parent_message_id` links, one level per snapshot query, and re-sorted
//! by creation time at the end.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use eventflow_core::error::AppError;
use eventflow_core::result::AppResult;
use eventflow_core::types::{MessageId, UserId};
use eventflow_database::MessageStore;
use eventflow_entity::message::{Message, ThreadView, ThreadedMessage};

/// Builds reply threads visible to one user.
#[derive(Clone)]
pub struct ThreadResolver {
    /// Message storage.
    messages: Arc<dyn MessageStore>,
    /// Deepest reply level returned; the root is level 0, so a bound of
    /// `n` returns up to `n` reply levels below it.
    max_depth: u32,
}

impl std::fmt::Debug for ThreadResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadResolver")
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl ThreadResolver {
    /// Creates a new thread resolver.
    pub fn new(messages: Arc<dyn MessageStore>, max_depth: u32) -> Self {
        Self {
            messages,
            max_depth,
        }
    }

    /// Resolve the thread rooted at `root_id` as seen by `user_id`.
    ///
    /// The root must be visible to the user. Replies the user is not party
    /// to are skipped together with everything below them. When replies
    /// exist past the depth bound the partial thread is returned with
    /// `truncated` set.
    pub async fn resolve(&self, root_id: MessageId, user_id: UserId) -> AppResult<ThreadView> {
        let mut snapshot = self.messages.snapshot().await?;

        let root = snapshot
            .find(root_id)
            .await?
            .filter(|m| m.is_visible_to(user_id))
            .ok_or_else(|| AppError::not_found(format!("Message {root_id} not found")))?;

        let mut visited: HashSet<MessageId> = HashSet::from([root.id]);
        let mut frontier = vec![root.id];
        let mut collected = vec![ThreadedMessage {
            message: root,
            depth: 0,
        }];
        let mut depth = 0;
        let mut truncated = false;

        while !frontier.is_empty() {
            let level: Vec<Message> = snapshot
                .children_of(&frontier)
                .await?
                .into_iter()
                .filter(|m| m.is_visible_to(user_id) && visited.insert(m.id))
                .collect();

            if level.is_empty() {
                break;
            }
            if depth >= self.max_depth {
                truncated = true;
                warn!(
                    message_id = %root_id,
                    user_id = %user_id,
                    max_depth = self.max_depth,
                    "Thread truncated at depth bound"
                );
                break;
            }

            depth += 1;
            frontier = level.iter().map(|m| m.id).collect();
            collected.extend(
                level
                    .into_iter()
                    .map(|message| ThreadedMessage { message, depth }),
            );
        }

        collected.sort_by(|a, b| {
            a.message
                .created_at
                .cmp(&b.message.created_at)
                .then(a.depth.cmp(&b.depth))
        });

        Ok(ThreadView {
            root_id,
            messages: collected,
            truncated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use eventflow_core::error::ErrorKind;
    use eventflow_entity::user::ActorRole;

    use crate::message::SendMessage;
    use crate::testing::Fixture;

    fn reply(to: UserId, parent: Option<MessageId>, body: &str) -> SendMessage {
        SendMessage {
            event_id: None,
            recipient_id: to,
            subject: "Route".to_string(),
            body: body.to_string(),
            parent_message_id: parent,
        }
    }

    #[tokio::test]
    async fn test_thread_returns_replies_in_creation_order() {
        let fx = Fixture::new().await;
        let service = fx.messages();
        let (o, a) = (fx.organiser_ctx(), fx.admin_ctx());

        let m1 = service.send(&o, reply(a.user_id, None, "m1")).await.unwrap();
        let m2 = service
            .send(&a, reply(o.user_id, Some(m1.id), "m2"))
            .await
            .unwrap();
        let m3 = service
            .send(&o, reply(a.user_id, Some(m2.id), "m3"))
            .await
            .unwrap();

        let thread = service.thread(&o, m1.id).await.unwrap();

        assert_eq!(thread.ids(), vec![m1.id, m2.id, m3.id]);
        let depths: Vec<u32> = thread.messages.iter().map(|m| m.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
        assert!(!thread.truncated);
    }

    #[tokio::test]
    async fn test_thread_is_truncated_at_depth_bound() {
        let fx = Fixture::new().await;
        let service = fx.messages();
        let (o, a) = (fx.organiser_ctx(), fx.admin_ctx());

        let m1 = service.send(&o, reply(a.user_id, None, "m1")).await.unwrap();
        let m2 = service
            .send(&a, reply(o.user_id, Some(m1.id), "m2"))
            .await
            .unwrap();
        service
            .send(&o, reply(a.user_id, Some(m2.id), "m3"))
            .await
            .unwrap();

        let resolver = ThreadResolver::new(fx.storage.messages.clone(), 1);
        let thread = resolver.resolve(m1.id, o.user_id).await.unwrap();

        assert_eq!(thread.ids(), vec![m1.id, m2.id]);
        assert!(thread.truncated);
    }

    #[tokio::test]
    async fn test_depth_bound_counts_reply_levels_below_root() {
        let fx = Fixture::new().await;
        let service = fx.messages();
        let (o, a) = (fx.organiser_ctx(), fx.admin_ctx());

        let m1 = service.send(&o, reply(a.user_id, None, "m1")).await.unwrap();
        let m2 = service
            .send(&a, reply(o.user_id, Some(m1.id), "m2"))
            .await
            .unwrap();
        let m3 = service
            .send(&o, reply(a.user_id, Some(m2.id), "m3"))
            .await
            .unwrap();

        let resolver = ThreadResolver::new(fx.storage.messages.clone(), 2);
        let thread = resolver.resolve(m1.id, o.user_id).await.unwrap();

        assert_eq!(thread.ids(), vec![m1.id, m2.id, m3.id]);
        assert_eq!(thread.messages[2].depth, 2);
        assert!(!thread.truncated);
    }

    #[tokio::test]
    async fn test_thread_hides_root_from_outsiders() {
        let fx = Fixture::new().await;
        let outsider = fx.add_user("Eve", ActorRole::Organiser, true).await;
        let service = fx.messages();
        let m1 = service
            .send(&fx.organiser_ctx(), reply(fx.admin.id, None, "m1"))
            .await
            .unwrap();

        let err = service
            .thread(&Fixture::ctx(&outsider), m1.id)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_thread_never_includes_foreign_messages() {
        let fx = Fixture::new().await;
        let store = fx.storage.messages.clone();
        let other = fx.add_user("Bea", ActorRole::Admin, true).await;
        let outsider = fx.add_user("Eve", ActorRole::Organiser, true).await;
        let service = fx.messages();
        let (o, a) = (fx.organiser_ctx(), fx.admin_ctx());

        let m1 = service.send(&o, reply(a.user_id, None, "m1")).await.unwrap();
        // A reply between two other users, inserted directly since the
        // service would refuse it.
        let foreign = eventflow_entity::message::NewMessage {
            event_id: None,
            sender_id: other.id,
            recipient_id: outsider.id,
            subject: "aside".to_string(),
            body: "not for you".to_string(),
            parent_message_id: Some(m1.id),
        };
        let (foreign, _) = store
            .send(&foreign, &|m: &Message| {
                crate::notification::NotificationRules::message_received(m, "Bea")
            })
            .await
            .unwrap();
        let m2 = service
            .send(&a, reply(o.user_id, Some(m1.id), "m2"))
            .await
            .unwrap();

        let thread = service.thread(&o, m1.id).await.unwrap();

        assert!(!thread.ids().contains(&foreign.id));
        assert_eq!(thread.ids(), vec![m1.id, m2.id]);
        assert!(
            thread
                .messages
                .iter()
                .all(|m| m.message.is_visible_to(o.user_id))
        );
    }
}
