//! Configuration handling for the builder

use crate::state::{PreviewMode, ThemeMode};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "FORMWRIGHT_DATA_DIR";

/// User configuration for the builder
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuilderConfig {
    /// Editor colour scheme
    pub theme_mode: Option<ThemeMode>,
    /// Viewport used when the preview opens
    pub preview_mode: Option<PreviewMode>,
    /// Where forms and submissions are stored
    pub data_dir: Option<PathBuf>,
    /// Save every committed edit in the background
    pub autosave: Option<bool>,
}

impl BuilderConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "formwright", "formwright")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let config: BuilderConfig = serde_json::from_str(&content)
                    .with_context(|| format!("parsing {}", path.display()))?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Resolve the data directory: environment, then config, then platform default
    pub fn data_dir(&self) -> Option<PathBuf> {
        resolve_data_dir(
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            self.data_dir.clone(),
            Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()),
        )
    }

    pub fn autosave_enabled(&self) -> bool {
        self.autosave.unwrap_or(true)
    }
}

fn resolve_data_dir(
    env: Option<PathBuf>,
    configured: Option<PathBuf>,
    platform: Option<PathBuf>,
) -> Option<PathBuf> {
    env.filter(|p| !p.as_os_str().is_empty())
        .or(configured)
        .or(platform)
}
