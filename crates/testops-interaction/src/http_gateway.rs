//! HttpAiGateway - REST client for the TestOps AI backend.
//!
//! Endpoints live under `{base}/api/v1/ai`, the health check at
//! `{base}/api/v1/ping`. Base URL comes from `config.toml` or `TESTOPS_API_BASE`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use testops_core::config::GatewayConfig;

use crate::error::GatewayError;
use crate::gateway::AiGateway;
use crate::request::{
    ApiTestRequest, CodeRequest, OptimizeRequest, RedactRequest, ReviewRequest, UiTestRequest,
};

const FALLBACK_ERROR_MESSAGE: &str = "server returned an error";

/// Gateway implementation over HTTP.
#[derive(Clone)]
pub struct HttpAiGateway {
    client: Client,
    ai_base: String,
    ping_url: String,
}

impl HttpAiGateway {
    /// Creates a gateway for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Unavailable` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                GatewayError::Unavailable(format!("Failed to build HTTP client: {err}"))
            })?;

        let base = normalize_base_url(base_url);
        tracing::debug!("[HttpAiGateway] Using base {}", base);
        Ok(Self {
            client,
            ai_base: format!("{base}/api/v1/ai"),
            ping_url: format!("{base}/api/v1/ping"),
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn ai_base(&self) -> &str {
        &self.ai_base
    }

    pub fn ping_url(&self) -> &str {
        &self.ping_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.ai_base, path)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, GatewayError> {
        let request = self.client.post(self.endpoint(path)).json(body);
        self.send(path, request).await
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<String, GatewayError> {
        tracing::debug!("[HttpAiGateway] POST {}", path);
        let response = request.send().await.map_err(|err| {
            tracing::warn!("[HttpAiGateway] {} unreachable: {}", path, err);
            GatewayError::Unavailable(err.to_string())
        })?;
        read_response(response).await
    }
}

#[async_trait]
impl AiGateway for HttpAiGateway {
    async fn ping(&self) -> bool {
        match self.client.get(&self.ping_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!("[HttpAiGateway] Health check failed: {}", err);
                false
            }
        }
    }

    async fn generate_ui_tests(&self, request: &UiTestRequest) -> Result<String, GatewayError> {
        self.post_json("generate-ui-tests", request).await
    }

    async fn generate_api_tests(&self, request: &ApiTestRequest) -> Result<String, GatewayError> {
        let file = Part::bytes(request.content.clone()).file_name(request.file_name.clone());
        let form = Form::new()
            .part("file", file)
            .text(
                "general_description",
                request.description_or_default().to_string(),
            )
            .text("modules", request.modules_or_default().to_string());

        let builder = self
            .client
            .post(self.endpoint("generate-api-tests"))
            .multipart(form);
        self.send("generate-api-tests", builder).await
    }

    async fn redact_content(&self, request: &RedactRequest) -> Result<String, GatewayError> {
        self.post_json("redact-content", request).await
    }

    async fn optimize_tests(&self, request: &OptimizeRequest) -> Result<String, GatewayError> {
        self.post_json("optimize-tests", request).await
    }

    async fn generate_code_pytest(&self, request: &CodeRequest) -> Result<String, GatewayError> {
        self.post_json("generate-code-pytest", request).await
    }

    async fn review_code(&self, request: &ReviewRequest) -> Result<String, GatewayError> {
        self.post_json("review-code", request).await
    }
}

async fn read_response(response: Response) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| GatewayError::Body(err.to_string()))?;

    if !status.is_success() {
        let err = status_error(status, body);
        tracing::warn!("[HttpAiGateway] {}", err);
        return Err(err);
    }

    Ok(normalize_body(&body))
}

/// Strips a trailing `/`, `/api/v1/ai` or `/api/v1` so endpoint paths are
/// never doubled.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let base = trimmed
        .strip_suffix("/api/v1/ai")
        .or_else(|| trimmed.strip_suffix("/api/v1"))
        .unwrap_or(trimmed);
    base.trim_end_matches('/').to_string()
}

/// Turns a 2xx body into display text.
///
/// A JSON object with a `message` field yields that field, any other JSON is
/// pretty-printed, anything else is returned verbatim.
pub fn normalize_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) if map.contains_key("message") => {
            match &map["message"] {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            }
        }
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Error for a non-2xx response: the body, else the reason phrase, else a
/// generic message.
fn status_error(status: StatusCode, body: String) -> GatewayError {
    let message = if !body.is_empty() {
        body
    } else {
        status
            .canonical_reason()
            .unwrap_or(FALLBACK_ERROR_MESSAGE)
            .to_string()
    };
    GatewayError::Status {
        status: status.as_u16(),
        message,
    }
}
