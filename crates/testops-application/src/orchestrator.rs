//! Drives the active session through the generation pipeline.
//!
//! Each stage operation follows the same shape:
//! 1. Under the lock: validate the transition, collect inputs, record the
//!    user-side message
//! 2. Without the lock: call the gateway
//! 3. Under the lock again: drop the reply if the user switched sessions or
//!    the stage moved meanwhile, otherwise record it and advance the stage

use std::future::Future;
use std::sync::Arc;
use testops_core::error::{Result, TestOpsError};
use testops_core::session::{MessageRole, SessionManager, SessionPurpose};
use testops_core::workflow::{WorkflowData, WorkflowStage, WorkflowTransitions};
use testops_interaction::{
    AiGateway, ApiTestRequest, CodeRequest, GatewayError, OptimizeRequest, RedactRequest,
    ReviewRequest, UiTestRequest,
};
use tokio::sync::Mutex;

/// Captured at the start of a stage and checked when the reply arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StageTicket {
    session_id: String,
    purpose: SessionPurpose,
    from: WorkflowStage,
    to: WorkflowStage,
}

/// Runs gateway-backed workflow stages against the shared [`SessionManager`].
///
/// # Thread Safety
///
/// The manager lock is never held across a gateway call, so the session list
/// stays responsive while a generation is in flight.
#[derive(Clone)]
pub struct WorkflowOrchestrator {
    sessions: Arc<Mutex<SessionManager>>,
    gateway: Arc<dyn AiGateway>,
}

impl WorkflowOrchestrator {
    /// Creates a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `sessions` - Hydrated session manager shared with the caller
    /// * `gateway` - Backend used for every generation stage
    pub fn new(sessions: Arc<Mutex<SessionManager>>, gateway: Arc<dyn AiGateway>) -> Self {
        Self { sessions, gateway }
    }

    pub fn sessions(&self) -> &Arc<Mutex<SessionManager>> {
        &self.sessions
    }

    /// `true` if the gateway answers its health check.
    pub async fn check_availability(&self) -> bool {
        let available = self.gateway.ping().await;
        tracing::info!("[Orchestrator] Gateway available: {}", available);
        available
    }

    /// Generates a UI test plan from a page description.
    ///
    /// The reply becomes `approvedTestPlan` and the stage `generate-ui`.
    pub async fn generate_ui_tests(&self, request: UiTestRequest) -> Result<String> {
        let prompt = format!(
            "Generate UI tests for {}\nModules: {}\n\n{}",
            request.url, request.modules, request.general_description
        );
        let (ticket, ()) = self
            .begin(WorkflowStage::GenerateUi, prompt, |_| Ok(()))
            .await?;

        let reply = self
            .call(&ticket, self.gateway.generate_ui_tests(&request))
            .await?;
        let patch = WorkflowData::new().with_approved_test_plan(reply.clone());
        self.finish(ticket, reply, patch).await
    }

    /// Generates an API test plan from an uploaded specification file.
    ///
    /// The reply becomes `approvedTestPlan` and the stage `generate-api`.
    pub async fn generate_api_tests(&self, request: ApiTestRequest) -> Result<String> {
        let prompt = format!("Generate API tests from {}", request.file_name);
        let (ticket, ()) = self
            .begin(WorkflowStage::GenerateApi, prompt, |_| Ok(()))
            .await?;

        let reply = self
            .call(&ticket, self.gateway.generate_api_tests(&request))
            .await?;
        let patch = WorkflowData::new().with_approved_test_plan(reply.clone());
        self.finish(ticket, reply, patch).await
    }

    /// Edits the current test plan according to `instructions`.
    ///
    /// # Errors
    ///
    /// `MissingWorkflowData("approvedTestPlan")` if no plan exists yet.
    pub async fn redact(&self, instructions: &str) -> Result<String> {
        let (ticket, plan) = self
            .begin(WorkflowStage::Redact, instructions, require_plan)
            .await?;

        let request = RedactRequest {
            original_content: plan,
            edit_instructions: instructions.to_string(),
        };
        let reply = self
            .call(&ticket, self.gateway.redact_content(&request))
            .await?;
        let patch = WorkflowData::new().with_approved_test_plan(reply.clone());
        self.finish(ticket, reply, patch).await
    }

    /// Generates pytest code from the approved plan.
    ///
    /// The reply becomes `generatedCode` and the stage `generate-code`.
    pub async fn generate_code(&self, url: &str, description: &str) -> Result<String> {
        let prompt = format!("Generate pytest code for {}", url);
        let (ticket, plan) = self
            .begin(WorkflowStage::GenerateCode, prompt, require_plan)
            .await?;

        let request = CodeRequest {
            url: url.to_string(),
            general_description: description.to_string(),
            approved_test_plan: plan,
        };
        let reply = self
            .call(&ticket, self.gateway.generate_code_pytest(&request))
            .await?;
        let patch = WorkflowData::new().with_generated_code(reply.clone());
        self.finish(ticket, reply, patch).await
    }

    /// Rewrites the approved plan with duplicate and redundant cases removed.
    pub async fn optimize(&self, modules: &str) -> Result<String> {
        let prompt = format!("Optimize test cases for modules: {}", modules);
        let (ticket, plan) = self
            .begin(WorkflowStage::Optimize, prompt, require_plan)
            .await?;

        let request = OptimizeRequest {
            modules: modules.to_string(),
            test_cases: plan,
        };
        let reply = self
            .call(&ticket, self.gateway.optimize_tests(&request))
            .await?;
        let patch = WorkflowData::new().with_approved_test_plan(reply.clone());
        self.finish(ticket, reply, patch).await
    }

    /// Reviews the generated code against `rules`. The review is recorded as
    /// a message only.
    ///
    /// # Errors
    ///
    /// `MissingWorkflowData("generatedCode")` if no code exists yet.
    pub async fn review(&self, rules: &str) -> Result<String> {
        let prompt = format!("Review generated code against rules:\n{}", rules);
        let (ticket, code) = self
            .begin(WorkflowStage::Review, prompt, |data| {
                data.generated_code
                    .clone()
                    .ok_or(TestOpsError::MissingWorkflowData("generatedCode"))
            })
            .await?;

        let request = ReviewRequest {
            code_snippet: code,
            rules: rules.to_string(),
        };
        let reply = self
            .call(&ticket, self.gateway.review_code(&request))
            .await?;
        self.finish(ticket, reply, WorkflowData::new()).await
    }

    /// Marks the active session's pipeline as finished.
    pub async fn complete(&self) -> Result<()> {
        let mut manager = self.sessions.lock().await;
        manager.advance_stage(WorkflowStage::Complete)?;
        tracing::info!(
            "[Orchestrator] Session {} completed",
            manager.active_session_id().unwrap_or_default()
        );
        Ok(())
    }

    /// Validates the move to `to`, extracts stage inputs and records the
    /// user-side message. Nothing is recorded if validation fails.
    async fn begin<T>(
        &self,
        to: WorkflowStage,
        prompt: impl Into<String>,
        inputs: impl FnOnce(&WorkflowData) -> Result<T>,
    ) -> Result<(StageTicket, T)> {
        let mut manager = self.sessions.lock().await;

        let session_id = manager
            .active_session_id()
            .ok_or(TestOpsError::NoActiveSession)?
            .to_string();
        let purpose = manager
            .current_purpose()
            .ok_or(TestOpsError::NoActiveSession)?;
        let from = manager.current_stage();

        WorkflowTransitions::check(purpose, from, to)?;
        let inputs = inputs(manager.current_workflow_data())?;
        manager.append_message(MessageRole::User, prompt)?;

        tracing::debug!(
            "[Orchestrator] Session {} ({}) starting {} from {}",
            session_id,
            purpose,
            to,
            from
        );
        Ok((
            StageTicket {
                session_id,
                purpose,
                from,
                to,
            },
            inputs,
        ))
    }

    /// Awaits a gateway call with the manager unlocked.
    async fn call<F>(&self, ticket: &StageTicket, request: F) -> Result<String>
    where
        F: Future<Output = std::result::Result<String, GatewayError>>,
    {
        request.await.map_err(|err| {
            tracing::warn!(
                "[Orchestrator] {} failed for session {}: {}",
                ticket.to,
                ticket.session_id,
                err
            );
            TestOpsError::from(err)
        })
    }

    /// Records the reply and advances the stage, unless the active session
    /// or its stage changed while the call was in flight.
    async fn finish(
        &self,
        ticket: StageTicket,
        reply: String,
        patch: WorkflowData,
    ) -> Result<String> {
        let mut manager = self.sessions.lock().await;

        if manager.active_session_id() != Some(ticket.session_id.as_str()) {
            tracing::warn!(
                "[Orchestrator] Discarding {} reply for session {}: no longer active",
                ticket.to,
                ticket.session_id
            );
            return Err(TestOpsError::StaleResponse {
                session_id: ticket.session_id,
            });
        }

        let current = manager.current_stage();
        if current != ticket.from {
            tracing::warn!(
                "[Orchestrator] Discarding {} reply for session {}: stage moved {} -> {}",
                ticket.to,
                ticket.session_id,
                ticket.from,
                current
            );
            return Err(TestOpsError::StaleResponse {
                session_id: ticket.session_id,
            });
        }

        manager.append_message(MessageRole::Assistant, reply.clone())?;
        manager.merge_workflow_data(patch.with_last_stage(ticket.from))?;
        manager.set_stage(ticket.to)?;

        tracing::info!(
            "[Orchestrator] {} session {} moved {} -> {}",
            ticket.purpose,
            ticket.session_id,
            ticket.from,
            ticket.to
        );
        Ok(reply)
    }
}

fn require_plan(data: &WorkflowData) -> Result<String> {
    data.approved_test_plan
        .clone()
        .ok_or(TestOpsError::MissingWorkflowData("approvedTestPlan"))
}
