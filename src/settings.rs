//! Persistent settings - JSON record with defaults and a per-store cache
//!
//! The persisted file is `{theme, logo, username, liteMode}`; unknown keys
//! are discarded on load and the file is rewritten wholesale on every save.
//! Loading and saving both export the resolved lite-mode flag to the
//! process environment so delay scaling never needs the settings threaded
//! through call sites.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::XtlError;
use crate::term::LITE_MODE_ENV;
use crate::theme::DEFAULT_THEME;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: String,
    pub logo: String,
    pub username: Option<String>,
    pub lite_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            logo: "Arch".to_string(),
            username: None,
            lite_mode: false,
        }
    }
}

/// Owns the settings file path and a single-load-per-run cache.
///
/// The cache is replaced on save and droppable via [`invalidate`], so a
/// run sees its own writes without re-reading the file.
///
/// [`invalidate`]: SettingsStore::invalidate
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    cache: Option<Settings>,
}

impl SettingsStore {
    /// Store at the platform config directory (`<config>/xtl/settings.json`).
    pub fn open_default() -> Self {
        Self::with_path(default_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, serving the cache when warm.
    ///
    /// A missing or corrupt file yields defaults; corruption is logged.
    pub fn load(&mut self) -> Settings {
        if let Some(cached) = &self.cache {
            return cached.clone();
        }
        let settings = read_settings(&self.path);
        export_lite_env(&settings);
        self.cache = Some(settings.clone());
        settings
    }

    /// Persist settings (merge-then-overwrite, not patch).
    pub fn save(&mut self, settings: Settings) -> Result<(), XtlError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut payload = serde_json::to_string_pretty(&settings)?;
        payload.push('\n');
        fs::write(&self.path, payload)?;
        export_lite_env(&settings);
        self.cache = Some(settings);
        Ok(())
    }

    /// Drop the cache so the next load re-reads the file.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}

fn read_settings(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "corrupt settings, using defaults");
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("xtl")
        .join("settings.json")
}

fn export_lite_env(settings: &Settings) {
    std::env::set_var(LITE_MODE_ENV, if settings.lite_mode { "1" } else { "0" });
}
