use anyhow::{Context, Result};
use testops_core::theme::Theme;

use crate::ThemeAction;
use crate::app::App;

pub fn run(app: &App, action: Option<ThemeAction>) -> Result<()> {
    let theme = match action {
        None => app.themes.load(),
        Some(ThemeAction::Toggle) => app.themes.toggle().context("Failed to toggle theme")?,
        Some(ThemeAction::Light) => set(app, Theme::Light)?,
        Some(ThemeAction::Dark) => set(app, Theme::Dark)?,
    };
    println!("{}", theme);
    Ok(())
}

fn set(app: &App, theme: Theme) -> Result<Theme> {
    app.themes.set(theme).context("Failed to save theme")?;
    Ok(theme)
}
