use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::session::{SettingField, Settings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// On-disk form of the timer settings. Values are clamped when read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub long_break_every: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for Config {
    fn from(s: &Settings) -> Self {
        Self {
            work_minutes: s.get(SettingField::WorkMinutes),
            short_break_minutes: s.get(SettingField::ShortBreakMinutes),
            long_break_minutes: s.get(SettingField::LongBreakMinutes),
            long_break_every: s.get(SettingField::LongBreakEvery),
        }
    }
}

impl Config {
    pub fn to_settings(&self) -> Settings {
        Settings::new(
            self.work_minutes,
            self.short_break_minutes,
            self.long_break_minutes,
            self.long_break_every,
        )
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "pomo") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("pomo_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
            tracing::warn!(path = %self.path.display(), "ignoring unreadable settings file");
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            work_minutes: 50,
            short_break_minutes: 10,
            long_break_minutes: 30,
            long_break_every: 3,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "work_minutes": 40 }"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.work_minutes, 40);
        assert_eq!(cfg.short_break_minutes, 5);
        assert_eq!(cfg.long_break_every, 4);
    }

    #[test]
    fn out_of_range_values_are_clamped_into_settings() {
        let cfg = Config {
            work_minutes: 0,
            short_break_minutes: 600,
            long_break_minutes: 91,
            long_break_every: 1,
        };
        let settings = cfg.to_settings();
        assert_eq!(settings.get(SettingField::WorkMinutes), 1);
        assert_eq!(settings.get(SettingField::ShortBreakMinutes), 60);
        assert_eq!(settings.get(SettingField::LongBreakMinutes), 90);
        assert_eq!(settings.get(SettingField::LongBreakEvery), 2);
    }

    #[test]
    fn save_into_unwritable_location_is_an_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        // parent "directory" is actually a file
        let store = FileConfigStore::with_path(blocker.join("config.json"));
        let err = store.save(&Config::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
