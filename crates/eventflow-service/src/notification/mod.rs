//! Notification inbox and recipient rules.

pub mod rules;
pub mod service;

pub use rules::NotificationRules;
pub use service::NotificationService;
