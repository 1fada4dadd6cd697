//! Workflow domain module.
//!
//! Pipeline progress of a session: the current stage, the outputs collected
//! along the way, and the table of stage moves each purpose allows.
//!
//! # Module Structure
//!
//! - `stage`: Pipeline stages (`WorkflowStage`)
//! - `data`: Accumulated stage outputs (`WorkflowData`)
//! - `transitions`: Allowed moves per purpose (`WorkflowTransitions`)
//! - `ops`: Stage and data operations on the active session (`SessionManager`)

mod data;
mod ops;
mod stage;
mod transitions;

pub use data::WorkflowData;
pub use stage::WorkflowStage;
pub use transitions::WorkflowTransitions;
