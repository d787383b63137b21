//! Well-known notification type tags.
//!
//! The `type` column is free-form; these are the tags this core emits.

/// An organiser submitted an event for review.
pub const EVENT_SUBMITTED: &str = "event_submitted";
/// An admin approved an event.
pub const EVENT_PUBLISHED: &str = "event_published";
/// An admin declined an event.
pub const EVENT_REJECTED: &str = "event_rejected";
/// An event was cancelled.
pub const EVENT_CANCELLED: &str = "event_cancelled";
/// An admin edited an event.
pub const EVENT_UPDATED: &str = "event_updated";
/// An organiser asked for changes to an event under review.
pub const CHANGE_REQUESTED: &str = "change_requested";
/// A direct message arrived.
pub const MESSAGE_RECEIVED: &str = "message_received";
