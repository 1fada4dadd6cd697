//! Application services for TestOps.

pub mod orchestrator;

pub use orchestrator::WorkflowOrchestrator;
