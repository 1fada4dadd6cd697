use serde::Serialize;

use super::model::SessionPurpose;
use crate::workflow::WorkflowStage;

/// Change notifications published by `SessionManager` after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Snapshot loaded (or bootstrapped) at startup.
    Hydrated { session_count: usize },
    Created {
        session_id: String,
        purpose: SessionPurpose,
    },
    Removed { session_id: String },
    /// Cursor moved; `None` means no session is active.
    Selected { session_id: Option<String> },
    MessageAppended {
        session_id: String,
        message_id: String,
    },
    StageChanged {
        session_id: String,
        stage: WorkflowStage,
    },
    WorkflowDataMerged { session_id: String },
}

/// Callback registered through `SessionManager::subscribe`.
pub type SessionListener = Box<dyn Fn(&SessionEvent) + Send + Sync>;
