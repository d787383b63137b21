//! Event approval state machine.

pub mod orchestrator;
pub mod transitions;

pub use orchestrator::WorkflowOrchestrator;
pub use transitions::WorkflowAction;
