use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::engine::ScoringConfig;

pub const DATABASE_ENV: &str = "RESUME_REACTOR_DB";
pub const SETTINGS_ENV: &str = "RESUME_REACTOR_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "resume_reactor_settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageSettings {
    pub database_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: "resume_reactor.sqlite3".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct UserSettings {
    scoring: ScoringConfig,
    storage: StorageSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    /// Open the settings file. A missing or malformed file yields defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut data: UserSettings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring malformed settings in {}: {err}",
                    path.display()
                );
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };
        data.scoring = data.scoring.clamped();

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Settings path from `RESUME_REACTOR_SETTINGS`, or the working directory default.
    pub fn default_path() -> PathBuf {
        env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    pub fn scoring(&self) -> ScoringConfig {
        self.read().scoring.clone()
    }

    pub fn update_scoring(&self, scoring: ScoringConfig) -> Result<()> {
        let mut guard = self.write();
        guard.scoring = scoring.clamped();
        self.persist(&guard)
    }

    pub fn storage(&self) -> StorageSettings {
        self.read().storage.clone()
    }

    /// `RESUME_REACTOR_DB` wins; otherwise the configured file next to the settings file.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = env::var_os(DATABASE_ENV) {
            return PathBuf::from(path);
        }

        let file = self.read().storage.database_file.clone();
        match self.path.parent() {
            Some(parent) => parent.join(file),
            None => PathBuf::from(file),
        }
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
