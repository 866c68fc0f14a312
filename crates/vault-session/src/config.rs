//! TOML configuration: cookie attribute policy and jar location.
//!
//! ```toml
//! jar = "/var/lib/vault/cookies.json"
//!
//! [cookie]
//! path = "/"
//! same_site = "lax"     # strict | lax | none
//! secure = false
//! lifetime_secs = 1800  # omit for a browser-session cookie
//! ```
//!
//! Every field is optional. Unknown keys are rejected so typos surface.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vault_storage::{CookieDefaults, StorageError};

/// Directory name under the platform config and data directories.
const APP_DIR: &str = "vault";

/// Config loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid cookie policy in {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: StorageError,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VaultConfig {
    /// Cookie jar file. `None` = [`VaultConfig::default_jar_path`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar: Option<PathBuf>,
    pub cookie: CookieDefaults,
}

impl VaultConfig {
    /// `$XDG_CONFIG_HOME/vault/config.toml` (platform equivalent elsewhere).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// `$XDG_DATA_HOME/vault/cookies.json`, or `./vault-cookies.json` when
    /// the platform has no data directory.
    pub fn default_jar_path() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR).join("cookies.json"))
            .unwrap_or_else(|| PathBuf::from("vault-cookies.json"))
    }

    pub fn from_toml(path: &Path, source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.cookie.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Load an explicitly named config file. It must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &source)
    }

    /// Load the config at the default location, or defaults if there is none.
    pub fn load_default() -> Result<Self, ConfigError> {
        let Some(path) = Self::default_path() else {
            return Ok(Self::default());
        };
        match std::fs::read_to_string(&path) {
            Ok(source) => Self::from_toml(&path, &source),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    /// The jar path to use, falling back to the default location.
    pub fn jar_path(&self) -> PathBuf {
        self.jar.clone().unwrap_or_else(Self::default_jar_path)
    }
}
