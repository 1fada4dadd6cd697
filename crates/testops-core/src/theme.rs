//! Light/dark theme preference.
//!
//! Only the stored preference is handled here; applying it is up to the
//! presentation layer.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumString};

use crate::error::Result;
use crate::storage::{KeyValueStore, THEME_KEY};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Reads and writes the theme preference under [`THEME_KEY`].
///
/// The value is stored as the bare string `light` or `dark`.
#[derive(Clone)]
pub struct ThemeService {
    store: Arc<dyn KeyValueStore>,
}

impl ThemeService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored preference, or the default when absent or unrecognised.
    pub fn load(&self) -> Theme {
        match self.store.load(THEME_KEY) {
            Ok(Some(raw)) => Theme::from_str(raw.trim()).unwrap_or_else(|_| {
                tracing::debug!("[ThemeService] Ignoring stored theme {:?}", raw);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                tracing::warn!("[ThemeService] Failed to read theme: {}", err);
                Theme::default()
            }
        }
    }

    pub fn set(&self, theme: Theme) -> Result<()> {
        self.store.save(THEME_KEY, theme.as_ref())
    }

    /// Flips the stored preference and returns the new value.
    pub fn toggle(&self) -> Result<Theme> {
        let next = self.load().toggled();
        self.set(next)?;
        Ok(next)
    }
}
