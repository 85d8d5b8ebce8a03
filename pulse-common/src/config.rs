//! Configuration loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! Levels 1 and 2 are handled by the binary's argument parser; this module
//! owns the TOML layer and the merged settings types.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::submission::DEFAULT_ROSTER;
use crate::{Error, Result};

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "residency-pulse";

/// Connection parameters consulted by the backend-selection policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendSettings {
    pub remote_url: Option<String>,
    pub remote_token: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// Optional `config.toml` contents; every key may be omitted
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TomlConfig {
    pub bind: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub admin_password: Option<String>,
    pub roster: Option<Vec<String>>,
    pub remote_url: Option<String>,
    pub remote_token: Option<String>,
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    /// Load the explicit path if given, else the platform default if it
    /// exists, else an empty config
    ///
    /// A missing default file is not an error; an explicit path that cannot be
    /// read is.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// `~/.config/residency-pulse/config.toml` (platform equivalent elsewhere)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join("config.toml"))
}

/// Names accepted on submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(Into::into)
            .map(|n: String| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    /// Parse a comma-separated list, e.g. from an environment variable
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_ROSTER)
    }
}
