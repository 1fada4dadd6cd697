use async_trait::async_trait;

use crate::error::GatewayError;
use crate::request::{
    ApiTestRequest, CodeRequest, OptimizeRequest, RedactRequest, ReviewRequest, UiTestRequest,
};

/// Remote AI backend that turns descriptions into test plans and code.
///
/// Every generation call returns the response already normalised to display
/// text (see [`normalize_body`](crate::http_gateway::normalize_body)).
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// `true` iff the backend answered the health check with a 2xx status.
    async fn ping(&self) -> bool;

    async fn generate_ui_tests(&self, request: &UiTestRequest) -> Result<String, GatewayError>;

    async fn generate_api_tests(&self, request: &ApiTestRequest) -> Result<String, GatewayError>;

    async fn redact_content(&self, request: &RedactRequest) -> Result<String, GatewayError>;

    async fn optimize_tests(&self, request: &OptimizeRequest) -> Result<String, GatewayError>;

    async fn generate_code_pytest(&self, request: &CodeRequest) -> Result<String, GatewayError>;

    async fn review_code(&self, request: &ReviewRequest) -> Result<String, GatewayError>;
}
