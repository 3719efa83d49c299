use nayan_core::config::NayanConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Finds and reads the YAML config.
///
/// An explicit path (the `--config` flag) must exist. Otherwise the first of
/// `./nayan.yaml` and `~/.nayan/config.yaml` that exists is used, and with
/// neither present the defaults apply.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    search: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        let mut search = vec![PathBuf::from("./nayan.yaml")];
        if let Some(home) = dirs::home_dir() {
            search.push(home.join(".nayan").join("config.yaml"));
        }
        Self { search }
    }
}

impl ConfigLoader {
    /// Loader over a custom search list, first match wins.
    pub fn with_search_paths(search: Vec<PathBuf>) -> Self {
        Self { search }
    }

    /// The file `load` would read, if any.
    pub fn locate(&self, explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Ok(Some(path.to_path_buf()));
        }
        Ok(self.search.iter().find(|p| p.exists()).cloned())
    }

    pub async fn load(&self, explicit: Option<&Path>) -> Result<NayanConfig, ConfigError> {
        match self.locate(explicit)? {
            Some(path) => Self::load_from(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(NayanConfig::default())
            }
        }
    }

    pub async fn load_from(path: &Path) -> Result<NayanConfig, ConfigError> {
        debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        // An empty file means "all defaults".
        if content.trim().is_empty() {
            return Ok(NayanConfig::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }
}
