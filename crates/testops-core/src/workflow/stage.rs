//! Workflow stage enumeration.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A step of the test-generation pipeline.
///
/// Serialized in kebab-case (`generate-ui`, `generate-code`, ...), which is
/// also the on-disk representation inside the sessions snapshot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WorkflowStage {
    /// Nothing generated yet. `general` sessions never leave this stage.
    #[default]
    Idle,
    /// UI test plan generated from an application description.
    GenerateUi,
    /// API test plan generated from an uploaded specification.
    GenerateApi,
    /// Test plan edited according to user instructions.
    Redact,
    /// Executable pytest code generated from the approved plan.
    GenerateCode,
    /// Test cases optimized.
    Optimize,
    /// Generated code reviewed against rules.
    Review,
    /// Pipeline finished.
    Complete,
}

impl WorkflowStage {
    /// Returns true for the two plan-generation stages.
    pub fn is_generation(self) -> bool {
        matches!(self, Self::GenerateUi | Self::GenerateApi)
    }

    /// Returns true once the pipeline has finished.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_is_kebab_case() {
        assert_eq!(WorkflowStage::GenerateUi.to_string(), "generate-ui");
        assert_eq!(WorkflowStage::GenerateCode.as_ref(), "generate-code");
        assert_eq!(WorkflowStage::Idle.to_string(), "idle");
    }

    #[test]
    fn test_from_str_matches_serde() {
        for stage in WorkflowStage::iter() {
            let parsed = WorkflowStage::from_str(stage.as_ref()).unwrap();
            assert_eq!(parsed, stage);

            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage));
        }
    }

    #[test]
    fn test_unknown_stage_is_rejected() {
        assert!(WorkflowStage::from_str("deploy").is_err());
        assert!(serde_json::from_str::<WorkflowStage>("\"deploy\"").is_err());
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(WorkflowStage::default(), WorkflowStage::Idle);
    }
}
