//! Composition root: wires the store, session manager and gateway together.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use testops_application::WorkflowOrchestrator;
use testops_core::theme::ThemeService;
use testops_core::{AppConfig, KeyValueStore, SessionManager, UuidGenerator};
use testops_infrastructure::JsonFileStore;
use testops_interaction::HttpAiGateway;
use tokio::sync::Mutex;

/// Key holding the session id selected by the last invocation.
pub const ACTIVE_SESSION_KEY: &str = "testops-active-session";

pub struct App {
    pub config: AppConfig,
    pub sessions: Arc<Mutex<SessionManager>>,
    pub themes: ThemeService,
    store: Arc<dyn KeyValueStore>,
}

impl App {
    /// Opens the store under `data_dir`, hydrates sessions and restores the
    /// previous selection.
    pub fn open(config: AppConfig, data_dir: &Path) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(
            JsonFileStore::new(data_dir)
                .with_context(|| format!("Failed to open data dir {}", data_dir.display()))?,
        );

        let mut manager = SessionManager::new(store.clone(), Arc::new(UuidGenerator::new()));
        let outcome = manager.hydrate();
        tracing::debug!("[App] Hydration: {:?}", outcome);
        restore_selection(&mut manager, store.as_ref());

        Ok(Self {
            config,
            sessions: Arc::new(Mutex::new(manager)),
            themes: ThemeService::new(store.clone()),
            store,
        })
    }

    /// Builds the orchestrator over the HTTP gateway from config.
    pub fn orchestrator(&self) -> Result<WorkflowOrchestrator> {
        let gateway = HttpAiGateway::from_config(&self.config.gateway)
            .context("Failed to create AI gateway client")?;
        Ok(WorkflowOrchestrator::new(
            self.sessions.clone(),
            Arc::new(gateway),
        ))
    }

    /// Stores the current selection for the next invocation.
    pub async fn remember_selection(&self) -> Result<()> {
        let manager = self.sessions.lock().await;
        let active = manager.active_session_id().unwrap_or_default();
        self.store
            .save(ACTIVE_SESSION_KEY, active)
            .context("Failed to remember the active session")
    }
}

fn restore_selection(manager: &mut SessionManager, store: &dyn KeyValueStore) {
    let remembered = match store.load(ACTIVE_SESSION_KEY) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("[App] Failed to read remembered session: {}", err);
            return;
        }
    };

    match remembered.as_deref().map(str::trim) {
        None | Some("") => {}
        Some(id) => {
            if !manager.select(Some(id)) {
                tracing::debug!("[App] Remembered session {} no longer exists", id);
            }
        }
    }
}
