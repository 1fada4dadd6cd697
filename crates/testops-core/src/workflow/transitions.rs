//! Allowed stage transitions per session purpose.
//!
//! `SessionManager::set_stage` accepts any stage. Callers that drive the
//! pipeline (the orchestrator) check moves against this table first.

use super::stage::WorkflowStage;
use crate::error::{Result, TestOpsError};
use crate::session::SessionPurpose;

const UI_PIPELINE: &[WorkflowStage] = &[
    WorkflowStage::Idle,
    WorkflowStage::GenerateUi,
    WorkflowStage::Redact,
    WorkflowStage::GenerateCode,
    WorkflowStage::Optimize,
    WorkflowStage::Review,
    WorkflowStage::Complete,
];

const API_PIPELINE: &[WorkflowStage] = &[
    WorkflowStage::Idle,
    WorkflowStage::GenerateApi,
    WorkflowStage::Redact,
    WorkflowStage::GenerateCode,
    WorkflowStage::Optimize,
    WorkflowStage::Review,
    WorkflowStage::Complete,
];

const GENERAL_PIPELINE: &[WorkflowStage] = &[WorkflowStage::Idle];

/// Transition table for the test-generation pipeline.
///
/// Rules for `ui` and `api` sessions:
/// - from `idle` the only move is to the purpose's generation stage
/// - afterwards any stage of the purpose's pipeline at the same or a later
///   position is allowed (re-running and skipping forward are fine)
/// - `complete` only transitions to itself
///
/// `general` sessions stay at `idle`.
pub struct WorkflowTransitions;

impl WorkflowTransitions {
    /// Ordered stages used by sessions of `purpose`.
    pub fn pipeline(purpose: SessionPurpose) -> &'static [WorkflowStage] {
        match purpose {
            SessionPurpose::Ui => UI_PIPELINE,
            SessionPurpose::Api => API_PIPELINE,
            SessionPurpose::General => GENERAL_PIPELINE,
        }
    }

    /// The generation stage that opens the pipeline, if the purpose has one.
    pub fn entry_stage(purpose: SessionPurpose) -> Option<WorkflowStage> {
        match purpose {
            SessionPurpose::Ui => Some(WorkflowStage::GenerateUi),
            SessionPurpose::Api => Some(WorkflowStage::GenerateApi),
            SessionPurpose::General => None,
        }
    }

    pub fn is_allowed(purpose: SessionPurpose, from: WorkflowStage, to: WorkflowStage) -> bool {
        let pipeline = Self::pipeline(purpose);
        let (Some(from_pos), Some(to_pos)) = (
            pipeline.iter().position(|s| *s == from),
            pipeline.iter().position(|s| *s == to),
        ) else {
            return false;
        };

        if from == WorkflowStage::Idle {
            return to == WorkflowStage::Idle || Some(to) == Self::entry_stage(purpose);
        }
        if from.is_terminal() {
            return to.is_terminal();
        }
        to_pos >= from_pos
    }

    /// Checks a move and returns a typed error when it is not in the table.
    pub fn check(purpose: SessionPurpose, from: WorkflowStage, to: WorkflowStage) -> Result<()> {
        if Self::is_allowed(purpose, from, to) {
            Ok(())
        } else {
            Err(TestOpsError::InvalidTransition { purpose, from, to })
        }
    }

    /// Stages reachable from `from` in one move.
    pub fn next_stages(purpose: SessionPurpose, from: WorkflowStage) -> Vec<WorkflowStage> {
        Self::pipeline(purpose)
            .iter()
            .copied()
            .filter(|to| *to != from && Self::is_allowed(purpose, from, *to))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_canonical_path_is_allowed() {
        let path = [
            WorkflowStage::Idle,
            WorkflowStage::GenerateUi,
            WorkflowStage::Redact,
            WorkflowStage::GenerateCode,
            WorkflowStage::Optimize,
            WorkflowStage::Review,
            WorkflowStage::Complete,
        ];
        for pair in path.windows(2) {
            assert!(
                WorkflowTransitions::check(SessionPurpose::Ui, pair[0], pair[1]).is_ok(),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_api_session_cannot_generate_ui() {
        let err = WorkflowTransitions::check(
            SessionPurpose::Api,
            WorkflowStage::Idle,
            WorkflowStage::GenerateUi,
        )
        .unwrap_err();
        assert_eq!(
            err,
            TestOpsError::InvalidTransition {
                purpose: SessionPurpose::Api,
                from: WorkflowStage::Idle,
                to: WorkflowStage::GenerateUi,
            }
        );
        assert!(WorkflowTransitions::is_allowed(
            SessionPurpose::Api,
            WorkflowStage::Idle,
            WorkflowStage::GenerateApi
        ));
    }

    #[test]
    fn test_idle_must_start_with_generation() {
        assert!(!WorkflowTransitions::is_allowed(
            SessionPurpose::Ui,
            WorkflowStage::Idle,
            WorkflowStage::Redact
        ));
    }

    #[test]
    fn test_backward_moves_are_rejected() {
        assert!(!WorkflowTransitions::is_allowed(
            SessionPurpose::Ui,
            WorkflowStage::Review,
            WorkflowStage::Redact
        ));
        assert!(!WorkflowTransitions::is_allowed(
            SessionPurpose::Api,
            WorkflowStage::Redact,
            WorkflowStage::GenerateApi
        ));
    }

    #[test]
    fn test_rerun_and_skip_forward() {
        assert!(WorkflowTransitions::is_allowed(
            SessionPurpose::Ui,
            WorkflowStage::Redact,
            WorkflowStage::Redact
        ));
        assert!(WorkflowTransitions::is_allowed(
            SessionPurpose::Ui,
            WorkflowStage::GenerateUi,
            WorkflowStage::GenerateCode
        ));
    }

    #[test]
    fn test_complete_is_terminal() {
        assert_eq!(
            WorkflowTransitions::next_stages(SessionPurpose::Ui, WorkflowStage::Complete),
            Vec::<WorkflowStage>::new()
        );
        assert!(WorkflowTransitions::is_allowed(
            SessionPurpose::Api,
            WorkflowStage::Complete,
            WorkflowStage::Complete
        ));
    }

    #[test]
    fn test_general_stays_idle() {
        assert!(WorkflowTransitions::is_allowed(
            SessionPurpose::General,
            WorkflowStage::Idle,
            WorkflowStage::Idle
        ));
        assert!(!WorkflowTransitions::is_allowed(
            SessionPurpose::General,
            WorkflowStage::Idle,
            WorkflowStage::GenerateUi
        ));
        let next = WorkflowTransitions::next_stages(SessionPurpose::General, WorkflowStage::Idle);
        assert!(next.is_empty());
    }

    #[test]
    fn test_next_stages_from_generate_api() {
        assert_eq!(
            WorkflowTransitions::next_stages(SessionPurpose::Api, WorkflowStage::GenerateApi),
            vec![
                WorkflowStage::Redact,
                WorkflowStage::GenerateCode,
                WorkflowStage::Optimize,
                WorkflowStage::Review,
                WorkflowStage::Complete,
            ]
        );
    }
}
