//! Stage and workflow-data operations on the active session.

use super::data::WorkflowData;
use super::stage::WorkflowStage;
use super::transitions::WorkflowTransitions;
use crate::error::Result;
use crate::session::{SessionEvent, SessionManager};

static EMPTY_WORKFLOW_DATA: WorkflowData = WorkflowData {
    approved_test_plan: None,
    generated_code: None,
    last_stage: None,
};

impl SessionManager {
    /// Sets the active session's stage and persists.
    ///
    /// No ordering check is made here; see [`advance_stage`](Self::advance_stage)
    /// for the validated variant.
    ///
    /// # Errors
    ///
    /// - `NoActiveSession` if the cursor is detached
    /// - Storage errors if the snapshot cannot be written
    pub fn set_stage(&mut self, stage: WorkflowStage) -> Result<()> {
        let session = self.active_session_mut()?;
        session.workflow_stage = stage;
        let session_id = session.id.clone();
        self.cursor.set_stage(stage);

        tracing::debug!("[SessionManager] Session {} stage -> {}", session_id, stage);
        self.emit(SessionEvent::StageChanged { session_id, stage });
        self.persist()
    }

    /// Shallow-merges `patch` into the active session's workflow data and
    /// persists. Fields left `None` in `patch` keep their stored value.
    pub fn merge_workflow_data(&mut self, patch: WorkflowData) -> Result<()> {
        let session = self.active_session_mut()?;
        session.workflow_data.merge(patch);
        let session_id = session.id.clone();

        self.emit(SessionEvent::WorkflowDataMerged { session_id });
        self.persist()
    }

    /// Moves the active session to `stage` if the transition table allows it,
    /// recording the previous stage as `lastStage`.
    ///
    /// Emits `WorkflowDataMerged` for the `lastStage` update, then
    /// `StageChanged`.
    ///
    /// # Errors
    ///
    /// - `NoActiveSession` if the cursor is detached
    /// - `InvalidTransition` if the move is not allowed for the purpose;
    ///   nothing is changed
    pub fn advance_stage(&mut self, stage: WorkflowStage) -> Result<()> {
        let session = self.active_session_mut()?;
        let from = session.workflow_stage;
        WorkflowTransitions::check(session.purpose, from, stage)?;

        session.workflow_data.last_stage = Some(from);
        let session_id = session.id.clone();

        self.emit(SessionEvent::WorkflowDataMerged { session_id });
        self.set_stage(stage)
    }

    /// Stage of the active session, `idle` when none is active.
    pub fn current_stage(&self) -> WorkflowStage {
        self.cursor.stage()
    }

    /// Workflow data of the active session, empty when none is active.
    pub fn current_workflow_data(&self) -> &WorkflowData {
        self.active_session()
            .map(|session| &session.workflow_data)
            .unwrap_or(&EMPTY_WORKFLOW_DATA)
    }
}
