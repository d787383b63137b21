//! Value objects exchanged between the workflow services and storage.

pub mod commit;

pub use commit::{Audience, NotificationDraft, WorkflowCommit, WorkflowReceipt};
