//! Persisted default canteen.
//!
//! A single JSON file, `config.json`, holding `{"canteen": {...}}`. Saving
//! always replaces the whole file.

use crate::error::{MensaError, Result};
use crate::models::Canteen;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";

/// The user's default canteen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultCanteenConfig {
    pub canteen: Canteen,
}

/// Config directory (`$MENSA_CONFIG_DIR`, `$XDG_CONFIG_HOME/mensa` or `~/.config/mensa`)
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("MENSA_CONFIG_DIR") {
        PathBuf::from(dir)
    } else if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(config_home).join("mensa")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".config/mensa")
    } else {
        PathBuf::from(".config/mensa")
    }
}

/// File-backed store for [`DefaultCanteenConfig`]
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::at(config_dir())
    }
}

impl ConfigStore {
    /// Store rooted at `dir`
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Write `config`, creating the directory (owner-only) if needed.
    pub fn save(&self, config: &DefaultCanteenConfig) -> Result<()> {
        create_private_dir(&self.dir)?;

        let json = serde_json::to_string_pretty(config)?;
        let path = self.path();
        fs::write(&path, json)?;
        set_mode(&path, 0o644)?;

        tracing::debug!(path = %path.display(), canteen = config.canteen.id, "saved default canteen");
        Ok(())
    }

    /// Load the stored config, failing with [`MensaError::Config`] when it is
    /// missing or unreadable.
    pub fn load(&self) -> Result<DefaultCanteenConfig> {
        let path = self.path();
        if !path.exists() {
            return Err(MensaError::Config(format!(
                "no config file at {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| MensaError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| MensaError::Config(format!("corrupt config {}: {}", path.display(), e)))
    }

    /// Like [`ConfigStore::load`], but logs failures and returns `None`.
    pub fn read(&self) -> Option<DefaultCanteenConfig> {
        match self.load() {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::debug!(error = %e, "no usable default canteen");
                None
            }
        }
    }
}

fn create_private_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)?;
    }
    #[cfg(not(unix))]
    fs::create_dir_all(dir)?;

    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
