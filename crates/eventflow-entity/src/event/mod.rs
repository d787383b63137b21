//! Event entities referenced by the approval workflow.

pub mod model;
pub mod status;

pub use model::EventRecord;
pub use status::EventStatus;
