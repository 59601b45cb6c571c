// Configuration module
// Application configuration loaded from a TOML file

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::services::drag::DragConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the platform data file location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_filter: String,
    pub drag: DragConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            log_filter: "info".to_string(),
            drag: DragConfig::default(),
        }
    }
}

impl AppConfig {
    /// Config file under the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "LessonCalendar", "LessonCalendar")
            .context("Failed to determine config directory")?;
        Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), String> {
        let drag = &self.drag;
        if drag.snap_minutes == 0 || drag.snap_minutes > 60 {
            return Err("drag.snap_minutes must be between 1 and 60".to_string());
        }
        if drag.px_per_hour <= 0.0 || drag.column_width <= 0.0 {
            return Err("drag grid dimensions must be positive".to_string());
        }
        if drag.threshold_px < 0.0 {
            return Err("drag.threshold_px cannot be negative".to_string());
        }
        Ok(())
    }
}
