use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{klog_debug, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Email of the user this session acts as. Falls back to the store's
    /// recorded current user when unset.
    pub current_user: Option<String>,
    /// Override for the task store file location.
    pub store_path: Option<String>,
}

impl Config {
    pub fn kanri_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".kanri"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::kanri_dir()?.join("kanri.toml"))
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(expand_tilde(path)),
            None => Ok(Self::kanri_dir()?.join("tasks.json")),
        }
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        klog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            klog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        klog_debug!(
            "Config loaded: current_user={:?}, store_path={:?}",
            config.current_user,
            config.store_path
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let kanri_dir = Self::kanri_dir()?;
        if !kanri_dir.exists() {
            fs::create_dir_all(&kanri_dir)?;
        }
        let path = Self::config_path()?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        klog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn ensure_dirs() -> Result<()> {
        let kanri_dir = Self::kanri_dir()?;
        if !kanri_dir.exists() {
            klog_debug!("Creating kanri directory: {}", kanri_dir.display());
            fs::create_dir_all(&kanri_dir)?;
        }
        Ok(())
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
