use anyhow::Result;

use crate::Commands;
use crate::app::App;

pub mod sessions;
pub mod theme;
pub mod workflow;

pub async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::List => sessions::list(app).await,
        Commands::New { purpose } => sessions::create(app, purpose).await,
        Commands::Select { id } => sessions::select(app, &id).await,
        Commands::Remove { id } => sessions::remove(app, &id).await,
        Commands::Say { text } => sessions::say(app, &text.join(" ")).await,
        Commands::Show => sessions::show(app).await,
        Commands::Stage { stage } => sessions::stage(app, stage).await,
        Commands::Ping => workflow::ping(app).await,
        Commands::Theme { action } => theme::run(app, action),
        Commands::GenerateUi {
            url,
            description,
            modules,
            buttons,
            scenarios,
        } => {
            workflow::generate_ui(app, url, description, modules, buttons, scenarios).await
        }
        Commands::GenerateApi {
            file,
            description,
            modules,
        } => workflow::generate_api(app, &file, description, modules).await,
        Commands::Redact { instructions } => {
            workflow::redact(app, &instructions.join(" ")).await
        }
        Commands::Code { url, description } => workflow::code(app, &url, &description).await,
        Commands::Optimize { modules } => workflow::optimize(app, &modules).await,
        Commands::Review { rules } => workflow::review(app, &rules).await,
        Commands::Complete => workflow::complete(app).await,
    }
}
