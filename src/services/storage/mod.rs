//! Versioned, checksummed persistence of [`AppState`].
//!
//! A data file holds a [`StorageEnvelope`]. Saving keeps the previous file
//! as `<file>.bak`; loading falls back from the primary file to the backup
//! and finally to an empty state.

mod checksum;
mod migrations;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::state::AppState;

pub use checksum::{checksum_of, djb2};
pub use migrations::migrate;

pub const STORAGE_VERSION: u32 = 2;

pub const DATA_FILE_NAME: &str = "lesson-calendar.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Malformed data: {0}")]
    Malformed(String),
    #[error("Checksum mismatch: stored {stored}, computed {computed}")]
    ChecksumMismatch { stored: String, computed: String },
    #[error("Unsupported storage version {0} (newest supported is {max})", max = STORAGE_VERSION)]
    UnsupportedVersion(u32),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Malformed(err.to_string())
    }
}

fn first_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEnvelope {
    /// Documents written before versioning count as version 1.
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Local>>,
    pub data: Value,
    pub checksum: String,
}

impl StorageEnvelope {
    /// Wrap `state` at the current version.
    pub fn seal(state: &AppState) -> Result<Self, StorageError> {
        let data = serde_json::to_value(state)?;
        let checksum = checksum_of(&data)?;
        Ok(Self {
            version: STORAGE_VERSION,
            timestamp: Some(Local::now()),
            data,
            checksum,
        })
    }

    /// Verify, migrate and decode the payload.
    pub fn open(self) -> Result<AppState, StorageError> {
        let computed = checksum_of(&self.data)?;
        if computed != self.checksum {
            return Err(StorageError::ChecksumMismatch {
                stored: self.checksum,
                computed,
            });
        }

        let data = migrate(self.data, self.version)?;
        Ok(serde_json::from_value(data)?)
    }
}

/// Pretty-printed envelope suitable for a user-facing export file.
pub fn export_data(state: &AppState) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(&StorageEnvelope::seal(state)?)?)
}

/// Parse an export produced by [`export_data`] (or an older version of it).
pub fn import_data(json: &str) -> Result<AppState, StorageError> {
    let envelope: StorageEnvelope = serde_json::from_str(json)?;
    envelope.open()
}

/// JSON file store with a single rolling backup.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Data file under the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "LessonCalendar", "LessonCalendar")
            .context("Failed to determine data directory")?;
        Ok(dirs.data_dir().join(DATA_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    pub fn save(&self, state: &AppState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {}", parent.display()))?;
        }

        if self.path.exists() {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup)
                .with_context(|| format!("Failed to back up data to {}", backup.display()))?;
        }

        let envelope = StorageEnvelope::seal(state)?;
        let data = serde_json::to_string(&envelope)?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write data to {}", self.path.display()))?;

        log::info!("Saved {} lessons to {}", state.lessons.len(), self.path.display());
        Ok(())
    }

    /// Load the primary file, then the backup, then fall back to an empty
    /// state. Never fails; problems are logged.
    pub fn load(&self) -> AppState {
        match read_envelope(&self.path) {
            Ok(Some(state)) => {
                log::info!("Loaded data from {}", self.path.display());
                return state;
            }
            Ok(None) => log::info!("No data file at {}", self.path.display()),
            Err(err) => log::warn!("{:#}", err),
        }

        let backup = self.backup_path();
        match read_envelope(&backup) {
            Ok(Some(state)) => {
                log::warn!("Recovered data from backup {}", backup.display());
                state
            }
            Ok(None) => AppState::default(),
            Err(err) => {
                log::warn!("{:#}", err);
                log::warn!("Starting with empty data");
                AppState::default()
            }
        }
    }

    /// Load the primary file only. A missing file yields an empty state.
    pub fn load_strict(&self) -> Result<AppState> {
        Ok(read_envelope(&self.path)?.unwrap_or_default())
    }
}

fn read_envelope(path: &Path) -> Result<Option<AppState>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data from {}", path.display()))?;
    let state = import_data(&raw)
        .with_context(|| format!("Failed to decode data from {}", path.display()))?;
    Ok(Some(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lesson::Lesson;
    use crate::services::schedule::{apply, Action};
    use crate::utils::date::DayOfWeek;
    use crate::utils::time::TimeOfDay;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_state() -> AppState {
        let draft = Lesson::builder()
            .title("Piano")
            .slot(DayOfWeek::Monday, TimeOfDay::new(10, 0), 60)
            .build()
            .unwrap();
        apply(AppState::default(), Action::AddLesson(draft))
    }

    #[test]
    fn test_export_import() {
        let state = sample_state();
        let json = export_data(&state).unwrap();
        assert!(json.contains("\"version\": 2"));
        assert_eq!(import_data(&json).unwrap(), state);
    }

    #[test]
    fn test_tampered_import_rejected() {
        let json = export_data(&sample_state()).unwrap();
        let tampered = json.replace("Piano", "Organ");
        assert!(matches!(
            import_data(&tampered),
            Err(StorageError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_garbage_import_rejected() {
        assert!(matches!(import_data("not json"), Err(StorageError::Malformed(_))));
        assert!(matches!(import_data(r#"{"version":2}"#), Err(StorageError::Malformed(_))));
    }

    #[test]
    fn test_future_version_rejected() {
        let mut envelope = StorageEnvelope::seal(&sample_state()).unwrap();
        envelope.version = STORAGE_VERSION + 1;
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(matches!(
            import_data(&json),
            Err(StorageError::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn test_save_keeps_backup() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("data.json"));

        store.save(&AppState::default()).unwrap();
        assert!(!store.backup_path().exists());

        let state = sample_state();
        store.save(&state).unwrap();
        assert!(store.backup_path().exists());
        assert_eq!(store.load(), state);
    }

    #[test]
    fn test_corrupt_primary_falls_back_to_backup() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("data.json"));
        let state = sample_state();

        store.save(&state).unwrap();
        store.save(&state).unwrap();
        fs::write(store.path(), "{ truncated").unwrap();

        assert_eq!(store.load(), state);
        assert!(store.load_strict().is_err());
    }

    #[test]
    fn test_missing_files_yield_default() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("nested").join("data.json"));
        assert_eq!(store.load(), AppState::default());
        assert_eq!(store.load_strict().unwrap(), AppState::default());
    }
}
