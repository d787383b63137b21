//! PostgreSQL repository implementations of the storage traits.

pub mod audit;
pub mod event;
pub mod message;
pub mod notification;
pub mod user;

pub use audit::AuditTrailRepository;
pub use event::EventRepository;
pub use message::MessageRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;
