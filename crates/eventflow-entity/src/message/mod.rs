//! Direct message entities and reply threads.

pub mod model;
pub mod thread;

pub use model::{Message, NewMessage};
pub use thread::{ThreadView, ThreadedMessage};
