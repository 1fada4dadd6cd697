use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use testops_core::{SessionPurpose, WorkflowStage};
use testops_infrastructure::ConfigService;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod commands;

use app::App;

#[derive(Parser)]
#[command(name = "testops")]
#[command(about = "TestOps CLI - AI-assisted test generation sessions", long_about = None)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sessions, most recent first
    List,
    /// Create a session and make it active
    New {
        /// ui, api or general
        purpose: SessionPurpose,
    },
    /// Make a session active
    Select { id: String },
    /// Delete a session
    Remove { id: String },
    /// Append a user message to the active session
    Say {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Show the active session's messages and workflow state
    Show,
    /// Set the active session's stage without validation
    Stage { stage: WorkflowStage },
    /// Check that the AI gateway is reachable
    Ping,
    /// Show or change the theme preference
    Theme { action: Option<ThemeAction> },
    /// Generate a UI test plan for a page
    GenerateUi {
        #[arg(long)]
        url: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        modules: String,
        #[arg(long)]
        buttons: Option<String>,
        #[arg(long)]
        scenarios: Option<String>,
    },
    /// Generate an API test plan from a specification file
    GenerateApi {
        file: PathBuf,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        modules: Option<String>,
    },
    /// Edit the current test plan
    Redact {
        #[arg(required = true, num_args = 1..)]
        instructions: Vec<String>,
    },
    /// Generate pytest code from the current test plan
    Code {
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Remove redundant cases from the current test plan
    Optimize {
        #[arg(long)]
        modules: String,
    },
    /// Review the generated code
    Review {
        #[arg(long, default_value = "pep8")]
        rules: String,
    },
    /// Mark the active session's pipeline as complete
    Complete,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Toggle,
    Light,
    Dark,
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let config = config_service
        .get_config()
        .context("Failed to load configuration")?;
    init_tracing(&config.logging.level);

    let data_dir = config_service
        .data_dir()
        .context("Failed to resolve data directory")?;
    let app = App::open(config, &data_dir)?;

    let result = commands::run(&app, cli.command).await;
    app.remember_selection().await?;
    result
}
