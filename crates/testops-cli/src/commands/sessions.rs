use anyhow::{Context, Result, bail};
use testops_core::workflow::WorkflowTransitions;
use testops_core::{MessageRole, SessionPurpose, WorkflowStage};

use crate::app::App;

pub async fn list(app: &App) -> Result<()> {
    let manager = app.sessions.lock().await;
    let active = manager.active_session_id();

    for summary in manager.list() {
        let marker = if active == Some(summary.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {}  {:<7} {:<13} {:>3} msg  {}",
            marker,
            summary.id,
            summary.purpose,
            summary.workflow_stage,
            summary.message_count,
            summary.title
        );
    }
    Ok(())
}

pub async fn create(app: &App, purpose: SessionPurpose) -> Result<()> {
    let mut manager = app.sessions.lock().await;
    let id = manager
        .create(purpose)
        .context("Session created but could not be saved")?;
    println!("{}", id);
    Ok(())
}

pub async fn select(app: &App, id: &str) -> Result<()> {
    let mut manager = app.sessions.lock().await;
    if !manager.select(Some(id)) {
        bail!("No session with id {}", id);
    }
    Ok(())
}

pub async fn remove(app: &App, id: &str) -> Result<()> {
    let mut manager = app.sessions.lock().await;
    if manager.get(id).is_none() {
        bail!("No session with id {}", id);
    }
    manager.remove(id).context("Failed to save after removal")?;
    match manager.active_session_id() {
        Some(active) => println!("Active session: {}", active),
        None => println!("No sessions left"),
    }
    Ok(())
}

pub async fn say(app: &App, text: &str) -> Result<()> {
    let mut manager = app.sessions.lock().await;
    manager
        .append_message(MessageRole::User, text)
        .context("Failed to append message")?;
    Ok(())
}

pub async fn show(app: &App) -> Result<()> {
    let manager = app.sessions.lock().await;
    let Some(session) = manager.active_session() else {
        println!("No active session");
        return Ok(());
    };

    println!("{} [{}] {}", session.title, session.purpose, session.id);
    println!("Stage: {}", session.workflow_stage);
    let next = WorkflowTransitions::next_stages(session.purpose, session.workflow_stage);
    if !next.is_empty() {
        let names: Vec<_> = next.iter().map(|s| s.to_string()).collect();
        println!("Next:  {}", names.join(", "));
    }

    let data = manager.current_workflow_data();
    if let Some(plan) = &data.approved_test_plan {
        println!("\n--- Test plan ---\n{}", plan);
    }
    if let Some(code) = &data.generated_code {
        println!("\n--- Generated code ---\n{}", code);
    }

    if !manager.messages().is_empty() {
        println!("\n--- Messages ---");
    }
    for message in manager.messages() {
        println!("[{}] {}", message.role, message.content);
    }
    Ok(())
}

pub async fn stage(app: &App, stage: WorkflowStage) -> Result<()> {
    let mut manager = app.sessions.lock().await;
    manager.set_stage(stage).context("Failed to set stage")?;
    Ok(())
}
