/// Application configuration: load, save, resolve, and sanitize.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::surface::EditSurface;

/// Undo depth used when neither the config file nor a surface override
/// says otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Upper bound for any configured undo depth.
pub const MAX_HISTORY_CAPACITY: usize = 10_000;

/// Environment variable that overrides the config file location.
const CONFIG_ENV_VAR: &str = "PLOTWEAVE_CONFIG";

const CONFIG_FILE_NAME: &str = "plotweave.json";

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Undo depth for every surface without an override.
    pub history_capacity: usize,
    /// Per-surface undo depth overrides.
    pub surface_capacities: BTreeMap<EditSurface, usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            surface_capacities: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Returns the config file path.
    ///
    /// Resolution order:
    /// 1. `PLOTWEAVE_CONFIG` environment variable
    /// 2. `<user config dir>/plotweave/plotweave.json`
    /// 3. `plotweave.json` next to the executable
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }
        if let Some(dir) = dirs::config_dir() {
            return dir.join("plotweave").join(CONFIG_FILE_NAME);
        }
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (unreadable file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Don't overwrite a broken file
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e:#}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the disk write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Returns the undo depth for `surface`, falling back to
    /// `history_capacity` when the surface has no override.
    pub fn capacity_for(&self, surface: EditSurface) -> usize {
        self.surface_capacities
            .get(&surface)
            .copied()
            .unwrap_or(self.history_capacity)
    }

    /// Clamps every capacity into `1..=MAX_HISTORY_CAPACITY`.
    pub fn sanitize(&mut self) {
        self.history_capacity = self.history_capacity.clamp(1, MAX_HISTORY_CAPACITY);
        for capacity in self.surface_capacities.values_mut() {
            *capacity = (*capacity).clamp(1, MAX_HISTORY_CAPACITY);
        }
    }
}
