//! Small persisted settings record: the API key and the image-loading
//! preference. The engine only reads the key when it is constructed.

use std::fs;
use std::path::{Path, PathBuf};

use feed_logging::{feed_info, feed_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::{write_atomically, PersistError};

pub const SETTINGS_FILENAME: &str = "settings.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: String,
    /// Prefer low-bandwidth thumbnails.
    pub low_data_images: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            low_data_images: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Loads and saves [`Settings`] in a directory.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILENAME)
    }

    /// Missing, unreadable or undecodable files yield defaults.
    pub fn load(&self) -> Settings {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Settings::default();
            }
            Err(err) => {
                feed_warn!("Failed to read settings from {:?}: {}", path, err);
                return Settings::default();
            }
        };

        match ron::from_str(&content) {
            Ok(settings) => {
                feed_info!("Loaded settings from {:?}", path);
                settings
            }
            Err(err) => {
                feed_warn!("Failed to parse settings from {:?}: {}", path, err);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<PathBuf, SettingsError> {
        let content = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::new())?;
        let path = write_atomically(&self.dir, SETTINGS_FILENAME, &content)?;
        feed_info!("Saved settings to {:?}", path);
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
