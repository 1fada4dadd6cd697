use anyhow::{Context, Result};
use std::path::Path;
use testops_interaction::{ApiTestRequest, UiTestRequest};

use crate::app::App;

pub async fn ping(app: &App) -> Result<()> {
    let orchestrator = app.orchestrator()?;
    if orchestrator.check_availability().await {
        println!("Gateway at {} is available", app.config.gateway.base_url);
    } else {
        println!("Gateway at {} is unreachable", app.config.gateway.base_url);
    }
    Ok(())
}

pub async fn generate_ui(
    app: &App,
    url: String,
    description: String,
    modules: String,
    buttons: Option<String>,
    scenarios: Option<String>,
) -> Result<()> {
    let request = UiTestRequest {
        url,
        general_description: description,
        modules,
        buttons_description: buttons,
        special_scenarios: scenarios,
    };
    let reply = app
        .orchestrator()?
        .generate_ui_tests(request)
        .await
        .context("UI test generation failed")?;
    println!("{}", reply);
    Ok(())
}

pub async fn generate_api(
    app: &App,
    file: &Path,
    description: Option<String>,
    modules: Option<String>,
) -> Result<()> {
    let mut request = ApiTestRequest::from_path(file)
        .await
        .context("Failed to read API specification")?;
    request.general_description = description;
    request.modules = modules;

    let reply = app
        .orchestrator()?
        .generate_api_tests(request)
        .await
        .context("API test generation failed")?;
    println!("{}", reply);
    Ok(())
}

pub async fn redact(app: &App, instructions: &str) -> Result<()> {
    let reply = app
        .orchestrator()?
        .redact(instructions)
        .await
        .context("Redaction failed")?;
    println!("{}", reply);
    Ok(())
}

pub async fn code(app: &App, url: &str, description: &str) -> Result<()> {
    let reply = app
        .orchestrator()?
        .generate_code(url, description)
        .await
        .context("Code generation failed")?;
    println!("{}", reply);
    Ok(())
}

pub async fn optimize(app: &App, modules: &str) -> Result<()> {
    let reply = app
        .orchestrator()?
        .optimize(modules)
        .await
        .context("Optimization failed")?;
    println!("{}", reply);
    Ok(())
}

pub async fn review(app: &App, rules: &str) -> Result<()> {
    let reply = app
        .orchestrator()?
        .review(rules)
        .await
        .context("Review failed")?;
    println!("{}", reply);
    Ok(())
}

pub async fn complete(app: &App) -> Result<()> {
    app.orchestrator()?
        .complete()
        .await
        .context("Failed to complete the workflow")?;
    println!("Workflow complete");
    Ok(())
}
