//! Accumulated outputs of the workflow stages.

use serde::{Deserialize, Serialize};

use super::stage::WorkflowStage;

/// Stage outputs stored on a session.
///
/// The same type doubles as the patch passed to
/// `SessionManager::merge_workflow_data`: a `Some` field overwrites the stored
/// value, a `None` field leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowData {
    /// Test plan accepted for code generation
    #[serde(default, alias = "testPlan", skip_serializing_if = "Option::is_none")]
    pub approved_test_plan: Option<String>,

    /// Generated pytest source
    #[serde(default, alias = "code", skip_serializing_if = "Option::is_none")]
    pub generated_code: Option<String>,

    /// Stage the session was in before the most recent advance
    #[serde(default, alias = "lastStep", skip_serializing_if = "Option::is_none")]
    pub last_stage: Option<WorkflowStage>,
}

impl WorkflowData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_approved_test_plan(mut self, plan: impl Into<String>) -> Self {
        self.approved_test_plan = Some(plan.into());
        self
    }

    pub fn with_generated_code(mut self, code: impl Into<String>) -> Self {
        self.generated_code = Some(code.into());
        self
    }

    pub fn with_last_stage(mut self, stage: WorkflowStage) -> Self {
        self.last_stage = Some(stage);
        self
    }

    /// Shallow, field-by-field merge: every `Some` in `patch` wins.
    pub fn merge(&mut self, patch: WorkflowData) {
        if let Some(plan) = patch.approved_test_plan {
            self.approved_test_plan = Some(plan);
        }
        if let Some(code) = patch.generated_code {
            self.generated_code = Some(code);
        }
        if let Some(stage) = patch.last_stage {
            self.last_stage = Some(stage);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.approved_test_plan.is_none()
            && self.generated_code.is_none()
            && self.last_stage.is_none()
    }
}
