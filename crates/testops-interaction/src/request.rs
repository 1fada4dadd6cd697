//! Request bodies sent to the AI gateway.

use serde::Serialize;
use std::path::Path;

use crate::error::GatewayError;

pub const DEFAULT_API_DESCRIPTION: &str = "API specification";
pub const DEFAULT_API_MODULES: &str = "Auto-detected";

/// Body of `POST /generate-ui-tests`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiTestRequest {
    pub url: String,
    pub general_description: String,
    pub modules: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_scenarios: Option<String>,
}

/// Multipart body of `POST /generate-api-tests`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTestRequest {
    pub file_name: String,
    pub content: Vec<u8>,
    pub general_description: Option<String>,
    pub modules: Option<String>,
}

impl ApiTestRequest {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            general_description: None,
            modules: None,
        }
    }

    /// Reads the specification file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Attachment` if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .map_err(|err| GatewayError::Attachment {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "specification".to_string());
        Ok(Self::new(file_name, content))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.general_description = Some(description.into());
        self
    }

    pub fn with_modules(mut self, modules: impl Into<String>) -> Self {
        self.modules = Some(modules.into());
        self
    }

    /// Description form field, defaulted when unset or blank.
    pub fn description_or_default(&self) -> &str {
        non_blank(self.general_description.as_deref()).unwrap_or(DEFAULT_API_DESCRIPTION)
    }

    /// Modules form field, defaulted when unset or blank.
    pub fn modules_or_default(&self) -> &str {
        non_blank(self.modules.as_deref()).unwrap_or(DEFAULT_API_MODULES)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Body of `POST /redact-content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactRequest {
    pub original_content: String,
    pub edit_instructions: String,
}

/// Body of `POST /optimize-tests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizeRequest {
    pub modules: String,
    pub test_cases: String,
}

/// Body of `POST /generate-code-pytest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRequest {
    pub url: String,
    pub general_description: String,
    pub approved_test_plan: String,
}

/// Body of `POST /review-code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRequest {
    pub code_snippet: String,
    pub rules: String,
}
