use async_trait::async_trait;
use std::sync::{Arc, Mutex as StdMutex};
use testops_application::WorkflowOrchestrator;
use testops_core::{
    SequentialIdGenerator, SessionManager, SessionPurpose, TestOpsError, WorkflowStage,
};
use testops_infrastructure::MemoryStore;
use testops_interaction::{
    AiGateway, ApiTestRequest, CodeRequest, GatewayError, OptimizeRequest, RedactRequest,
    ReviewRequest, UiTestRequest,
};
use tokio::sync::Mutex;

/// Echoes a tag per endpoint and records what each call received.
#[derive(Default)]
struct RecordingGateway {
    seen: StdMutex<Vec<String>>,
}

impl RecordingGateway {
    fn record(&self, entry: String) {
        self.seen.lock().unwrap().push(entry);
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiGateway for RecordingGateway {
    async fn ping(&self) -> bool {
        true
    }

    async fn generate_ui_tests(&self, request: &UiTestRequest) -> Result<String, GatewayError> {
        self.record(format!("ui:{}", request.url));
        Ok("plan-v1".into())
    }

    async fn generate_api_tests(&self, request: &ApiTestRequest) -> Result<String, GatewayError> {
        self.record(format!(
            "api:{}:{}",
            request.file_name,
            request.description_or_default()
        ));
        Ok("api-plan".into())
    }

    async fn redact_content(&self, request: &RedactRequest) -> Result<String, GatewayError> {
        self.record(format!("redact:{}", request.original_content));
        Ok("plan-v2".into())
    }

    async fn optimize_tests(&self, request: &OptimizeRequest) -> Result<String, GatewayError> {
        self.record(format!("optimize:{}", request.test_cases));
        Ok("plan-v3".into())
    }

    async fn generate_code_pytest(&self, request: &CodeRequest) -> Result<String, GatewayError> {
        self.record(format!("code:{}", request.approved_test_plan));
        Ok("def test_login(): ...".into())
    }

    async fn review_code(&self, request: &ReviewRequest) -> Result<String, GatewayError> {
        self.record(format!("review:{}", request.code_snippet));
        Ok("LGTM".into())
    }
}

fn setup(purpose: SessionPurpose) -> (WorkflowOrchestrator, Arc<RecordingGateway>) {
    let mut manager = SessionManager::new(
        Arc::new(MemoryStore::new()),
        Arc::new(SequentialIdGenerator::new("p")),
    );
    manager.hydrate();
    manager.create(purpose).expect("Should create session");

    let gateway = Arc::new(RecordingGateway::default());
    let orchestrator = WorkflowOrchestrator::new(Arc::new(Mutex::new(manager)), gateway.clone());
    (orchestrator, gateway)
}

#[tokio::test]
async fn test_ui_pipeline_end_to_end() {
    let (orchestrator, gateway) = setup(SessionPurpose::Ui);

    orchestrator
        .generate_ui_tests(UiTestRequest {
            url: "https://shop.example".into(),
            general_description: "storefront".into(),
            modules: "cart".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    orchestrator.redact("drop case 3").await.unwrap();
    orchestrator
        .generate_code("https://shop.example", "storefront")
        .await
        .unwrap();
    orchestrator.optimize("cart").await.unwrap();
    let review = orchestrator.review("pep8").await.unwrap();
    orchestrator.complete().await.unwrap();

    assert_eq!(review, "LGTM");
    assert_eq!(
        gateway.seen(),
        vec![
            "ui:https://shop.example",
            "redact:plan-v1",
            "code:plan-v2",
            "optimize:plan-v2",
            "review:def test_login(): ...",
        ]
    );

    let manager = orchestrator.sessions().lock().await;
    assert_eq!(manager.current_stage(), WorkflowStage::Complete);
    let data = manager.current_workflow_data();
    assert_eq!(data.approved_test_plan.as_deref(), Some("plan-v3"));
    assert_eq!(data.generated_code.as_deref(), Some("def test_login(): ..."));
    assert_eq!(data.last_stage, Some(WorkflowStage::Review));
    // Five request/reply pairs
    assert_eq!(manager.messages().len(), 10);
}

#[tokio::test]
async fn test_api_pipeline_uses_defaults() {
    let (orchestrator, gateway) = setup(SessionPurpose::Api);

    orchestrator
        .generate_api_tests(ApiTestRequest::new("petstore.yaml", b"openapi: 3.0".to_vec()))
        .await
        .unwrap();

    assert_eq!(gateway.seen(), vec!["api:petstore.yaml:API specification"]);
    let manager = orchestrator.sessions().lock().await;
    assert_eq!(manager.current_stage(), WorkflowStage::GenerateApi);
}

#[tokio::test]
async fn test_going_back_is_rejected() {
    let (orchestrator, gateway) = setup(SessionPurpose::Ui);
    orchestrator
        .generate_ui_tests(UiTestRequest::default())
        .await
        .unwrap();
    orchestrator.complete().await.unwrap();

    let err = orchestrator.redact("again").await.unwrap_err();

    assert!(matches!(err, TestOpsError::InvalidTransition { .. }));
    assert_eq!(gateway.seen().len(), 1);
}

#[tokio::test]
async fn test_general_sessions_have_no_pipeline() {
    let (orchestrator, gateway) = setup(SessionPurpose::General);

    let err = orchestrator
        .generate_ui_tests(UiTestRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, TestOpsError::InvalidTransition { .. }));
    assert!(gateway.seen().is_empty());
    assert!(orchestrator.check_availability().await);
}
