use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::{AppSettings, DEFAULT_FADE_IN_MS, WORD_COUNT_PRESETS};
use crate::app_dirs::AppDirs;

/// Settings file contents; every field may be omitted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub word_count: usize,
    pub fade_in_ms: u64,
    pub mouse: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_count: WORD_COUNT_PRESETS[0],
            fade_in_ms: DEFAULT_FADE_IN_MS,
            mouse: true,
        }
    }
}

impl From<&Config> for AppSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            number_of_words: cfg.word_count.max(1),
            prompt: None,
            fade_in: Duration::from_millis(cfg.fade_in_ms),
        }
    }
}

/// Read-only settings file in JSON
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

    /// Load the settings file. A missing file means defaults; an unreadable
    /// or malformed one is logged and also falls back to defaults.
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(Some(cfg)) => cfg,
            Ok(None) => {
                log::debug!("no config at {}, using defaults", self.path.display());
                Config::default()
            }
            Err(err) => {
                log::warn!("ignoring config: {err:#}");
                Config::default()
            }
        }
    }

    fn try_load(&self) -> anyhow::Result<Option<Config>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };

        let cfg = serde_json::from_slice::<Config>(&bytes)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(cfg))
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
