use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;
use crate::error::{Result, TypemasterError};
use crate::timer::DEFAULT_COUNTDOWN_SECS;
use crate::words::{Difficulty, DEFAULT_CORPUS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    /// Overrides the difficulty preset when set.
    pub custom_words: Option<usize>,
    pub countdown_secs: u32,
    pub punctuation: bool,
    pub corpus: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            custom_words: None,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            punctuation: false,
            corpus: DEFAULT_CORPUS.to_string(),
        }
    }
}

impl Config {
    pub fn word_target(&self) -> usize {
        self.custom_words
            .unwrap_or_else(|| self.difficulty.word_target())
    }

    pub fn validate(&self) -> Result<()> {
        if self.word_target() == 0 {
            return Err(TypemasterError::EmptyWordTarget);
        }
        if self.countdown_secs == 0 {
            return Err(TypemasterError::ZeroCountdown);
        }
        Ok(())
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
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
    /// Missing or unreadable files fall back to the defaults.
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "no stored config, using defaults");
                return Config::default();
            }
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| TypemasterError::ConfigIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data).map_err(|source| TypemasterError::ConfigIo {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        let cfg = Config {
            difficulty: Difficulty::Hard,
            custom_words: Some(75),
            countdown_secs: 30,
            punctuation: true,
            corpus: "english".into(),
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn malformed_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ difficulty: ").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "difficulty": "normal" }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.difficulty, Difficulty::Normal);
        assert_eq!(cfg.countdown_secs, DEFAULT_COUNTDOWN_SECS);
        assert_eq!(cfg.word_target(), 25);
    }

    #[test]
    fn custom_words_override_difficulty() {
        let cfg = Config {
            custom_words: Some(7),
            ..Config::default()
        };
        assert_eq!(cfg.word_target(), 7);
    }

    #[test]
    fn validate_rejects_zero_values() {
        let zero_words = Config {
            custom_words: Some(0),
            ..Config::default()
        };
        assert!(matches!(zero_words.validate(), Err(TypemasterError::EmptyWordTarget)));

        let zero_secs = Config {
            countdown_secs: 0,
            ..Config::default()
        };
        assert!(matches!(zero_secs.validate(), Err(TypemasterError::ZeroCountdown)));
        assert!(Config::default().validate().is_ok());
    }
}
