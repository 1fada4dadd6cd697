use std::fs;
use std::sync::Arc;

use tempfile::TempDir;
use testops_core::session::{BootstrapReason, HydrationOutcome};
use testops_core::storage::SESSIONS_KEY;
use testops_core::theme::{Theme, ThemeService};
use testops_core::{
    KeyValueStore, MessageRole, SequentialIdGenerator, SessionManager, SessionPurpose,
    UuidGenerator, WorkflowData, WorkflowStage,
};
use testops_infrastructure::{JsonFileStore, MemoryStore};

fn open(temp_dir: &TempDir) -> SessionManager {
    let store = JsonFileStore::new(temp_dir.path()).expect("Should create store");
    SessionManager::new(Arc::new(store), Arc::new(UuidGenerator::new()))
}

#[test]
fn test_sessions_survive_restart() {
    let temp_dir = TempDir::new().unwrap();

    let (ui_id, snapshot) = {
        let mut manager = open(&temp_dir);
        manager.hydrate();
        let ui_id = manager.create(SessionPurpose::Ui).unwrap();
        manager
            .append_message(MessageRole::User, "test login")
            .unwrap();
        manager.set_stage(WorkflowStage::GenerateUi).unwrap();
        manager
            .merge_workflow_data(WorkflowData::new().with_approved_test_plan("1. open /login"))
            .unwrap();
        (ui_id, manager.sessions().to_vec())
    };

    let mut restarted = open(&temp_dir);
    assert_eq!(
        restarted.hydrate(),
        HydrationOutcome::Restored { session_count: 2 }
    );

    assert_eq!(restarted.sessions(), snapshot.as_slice());
    assert_eq!(restarted.active_session_id(), Some(ui_id.as_str()));
    assert_eq!(restarted.current_stage(), WorkflowStage::GenerateUi);
    assert_eq!(
        restarted
            .current_workflow_data()
            .approved_test_plan
            .as_deref(),
        Some("1. open /login")
    );
}

#[test]
fn test_corrupted_snapshot_file_bootstraps() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(format!("{}.json", SESSIONS_KEY)),
        "{\"truncated\": ",
    )
    .unwrap();

    let mut manager = open(&temp_dir);
    let outcome = manager.hydrate();

    assert!(matches!(
        outcome,
        HydrationOutcome::Bootstrapped {
            reason: BootstrapReason::Corrupted(_),
            ..
        }
    ));
    assert_eq!(manager.sessions().len(), 1);
    assert_eq!(manager.sessions()[0].purpose, SessionPurpose::General);
    assert_eq!(manager.current_stage(), WorkflowStage::Idle);

    // The bootstrap overwrote the unreadable file
    let mut reopened = open(&temp_dir);
    assert!(matches!(
        reopened.hydrate(),
        HydrationOutcome::Restored { session_count: 1 }
    ));
}

#[test]
fn test_legacy_snapshot_hydrates() {
    let legacy = r#"[
        {
            "id": "1700000000000",
            "title": "API Testing",
            "type": "api",
            "messages": [
                {"id": "m-1", "role": "user", "content": "petstore.yaml", "timestamp": 1700000000100},
                {"id": "m-2", "role": "assistant", "content": "Plan ready", "timestamp": 1700000000200}
            ],
            "createdAt": 1700000000000,
            "updatedAt": 1700000000200,
            "workflowStep": "redact",
            "workflowData": {"testPlan": "GET /pets", "lastStep": "generate-api"}
        }
    ]"#;
    let store = MemoryStore::with_entries([(SESSIONS_KEY, legacy)]);
    let mut manager = SessionManager::new(
        Arc::new(store),
        Arc::new(SequentialIdGenerator::new("new")),
    );

    manager.hydrate();

    assert_eq!(manager.current_purpose(), Some(SessionPurpose::Api));
    assert_eq!(manager.current_stage(), WorkflowStage::Redact);
    assert_eq!(manager.messages().len(), 2);
    let data = manager.current_workflow_data();
    assert_eq!(data.approved_test_plan.as_deref(), Some("GET /pets"));
    assert_eq!(data.last_stage, Some(WorkflowStage::GenerateApi));
}

#[test]
fn test_snapshot_is_written_in_canonical_shape() {
    let store = Arc::new(MemoryStore::new());
    let mut manager = SessionManager::new(
        store.clone(),
        Arc::new(SequentialIdGenerator::new("s")),
    );
    manager.hydrate();
    manager.set_stage(WorkflowStage::Idle).unwrap();

    let raw = store.load(SESSIONS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &json[0];

    assert_eq!(record["purpose"], "general");
    assert_eq!(record["workflowStage"], "idle");
    assert!(record["createdAt"].is_i64());
    assert!(record["messages"].as_array().unwrap().is_empty());
}

#[test]
fn test_theme_persists_in_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(temp_dir.path()).unwrap());

    let service = ThemeService::new(store.clone());
    assert_eq!(service.load(), Theme::Light);
    assert_eq!(service.toggle().unwrap(), Theme::Dark);

    let reopened = ThemeService::new(Arc::new(JsonFileStore::new(temp_dir.path()).unwrap()));
    assert_eq!(reopened.load(), Theme::Dark);
}
