//! Active session cursor.

use super::message::Message;
use super::model::{Session, SessionPurpose};
use crate::workflow::WorkflowStage;

/// Tracks the current session and a working copy of its projected fields.
///
/// The working message list is what callers read; it is reloaded from the
/// stored session on every cursor change and every append.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveCursor {
    session_id: Option<String>,
    purpose: Option<SessionPurpose>,
    stage: WorkflowStage,
    messages: Vec<Message>,
}

impl ActiveCursor {
    /// Points the cursor at `session` and copies its projected fields.
    pub(crate) fn load(&mut self, session: &Session) {
        self.session_id = Some(session.id.clone());
        self.purpose = Some(session.purpose);
        self.stage = session.workflow_stage;
        self.messages = session.messages.clone();
    }

    /// Detaches the cursor: no session, no purpose, idle, no messages.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn set_stage(&mut self, stage: WorkflowStage) {
        self.stage = stage;
    }

    pub(crate) fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Brings the working list back in line with `session` after an append.
    pub(crate) fn sync_messages(&mut self, session: &Session) {
        match session.messages.last() {
            Some(last) if self.messages.len() + 1 == session.messages.len() => {
                self.messages.push(last.clone());
            }
            _ => self.messages = session.messages.clone(),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn purpose(&self) -> Option<SessionPurpose> {
        self.purpose
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_active(&self, session_id: &str) -> bool {
        self.session_id.as_deref() == Some(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_then_clear() {
        let mut session = Session::new("s-1", SessionPurpose::Ui, 1);
        session.workflow_stage = WorkflowStage::Redact;

        let mut cursor = ActiveCursor::default();
        cursor.load(&session);
        assert!(cursor.is_active("s-1"));
        assert_eq!(cursor.purpose(), Some(SessionPurpose::Ui));
        assert_eq!(cursor.stage(), WorkflowStage::Redact);

        cursor.clear();
        assert_eq!(cursor.session_id(), None);
        assert_eq!(cursor.purpose(), None);
        assert_eq!(cursor.stage(), WorkflowStage::Idle);
        assert!(cursor.messages().is_empty());
    }
}
