//! Direct messages and reply threads.

pub mod service;
pub mod thread;

pub use service::{MessageService, SendMessage};
pub use thread::ThreadResolver;
