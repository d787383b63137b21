//! Notification entities.

pub mod kind;
pub mod model;

pub use model::{NewNotification, Notification};
