//! Session domain model.
//!
//! This module contains the core Session entity. Its serde representation is
//! the record shape stored in the sessions snapshot.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::message::Message;
use crate::workflow::{WorkflowData, WorkflowStage};

/// The fixed category of a session.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionPurpose {
    /// UI test generation from an application description.
    Ui,
    /// API test generation from an uploaded specification.
    Api,
    /// Free-form chat without a pipeline.
    #[default]
    General,
}

impl SessionPurpose {
    /// Title given to new sessions of this purpose.
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Ui => "UI Testing",
            Self::Api => "API Testing",
            Self::General => "General Chat",
        }
    }
}

/// A persisted conversation with its own messages and workflow progress.
///
/// Older snapshots used `type`, `workflowStep`
/// and `testPlan`/`code`/`lastStep`; those names are still accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Session category; missing on disk means `general`
    #[serde(default, alias = "type")]
    pub purpose: SessionPurpose,
    /// Messages in chronological order
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Creation time (Unix epoch milliseconds)
    pub created_at: i64,
    /// Last mutation time (Unix epoch milliseconds)
    pub updated_at: i64,
    /// Current pipeline stage
    #[serde(default, alias = "workflowStep")]
    pub workflow_stage: WorkflowStage,
    /// Outputs accumulated by the pipeline
    #[serde(default)]
    pub workflow_data: WorkflowData,
}

impl Session {
    /// Builds an empty, idle session titled after its purpose.
    pub fn new(id: impl Into<String>, purpose: SessionPurpose, now: i64) -> Self {
        Self {
            id: id.into(),
            title: purpose.default_title().to_string(),
            purpose,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            workflow_stage: WorkflowStage::Idle,
            workflow_data: WorkflowData::default(),
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Read-only listing entry for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub purpose: SessionPurpose,
    pub workflow_stage: WorkflowStage,
    pub message_count: usize,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            purpose: session.purpose,
            workflow_stage: session.workflow_stage,
            message_count: session.messages.len(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// Current time in Unix epoch milliseconds.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
