//! Project configuration stored in `.coauthor/config.json`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_DIR: &str = ".coauthor";
pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_DATA_FILE: &str = "coauthors.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings shared by every command. CLI flags take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub version: String,
    /// CSV file of co-author rows, relative to the project directory.
    pub data: PathBuf,
    pub port: u16,
    pub cache: bool,
    /// Step limit for longest-path searches.
    pub max_steps: Option<u64>,
    /// Time limit in seconds for longest-path searches.
    pub timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            data: PathBuf::from(DEFAULT_DATA_FILE),
            port: coauthor_server::DEFAULT_PORT,
            cache: false,
            max_steps: None,
            timeout_secs: Some(10),
        }
    }
}

impl AppConfig {
    pub fn path(project: &Path) -> PathBuf {
        project.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Loads the project config, or `None` when the project has none.
    pub fn load(project: &Path) -> Result<Option<Self>, ConfigError> {
        let path = Self::path(project);
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;
        Ok(Some(config))
    }

    /// Writes the config, creating the config directory if needed.
    pub fn save(&self, project: &Path) -> Result<PathBuf, ConfigError> {
        let dir = project.join(CONFIG_DIR);
        fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(CONFIG_FILE);
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, text).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// The data file as seen from the current directory.
    pub fn data_path(&self, project: &Path) -> PathBuf {
        if self.data.is_absolute() {
            self.data.clone()
        } else {
            project.join(&self.data)
        }
    }
}
