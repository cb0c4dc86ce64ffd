use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

/// Credentials for one remote host.
///
/// Immutable once constructed; the password lives in a [`SecretString`] and is
/// only exposed at the authentication call site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2222,
            username: "demo".to_string(),
            password: SecretString::from("demo"),
        }
    }
}

impl Credentials {
    /// The `host:port` address string used for the TCP connection
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// What the driver transfers once connected
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransferPlan {
    /// Remote directory to list before and after the upload
    pub remote_dir: String,
    /// Local file to upload
    pub local_file: PathBuf,
    /// Remote destination path for the upload
    pub remote_path: String,
}

impl Default for TransferPlan {
    fn default() -> Self {
        Self {
            remote_dir: "/upload".to_string(),
            local_file: PathBuf::from("file.txt"),
            remote_path: "/upload/file.txt".to_string(),
        }
    }
}

/// Application config stored in ferry.toml
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub connection: Credentials,
    pub transfer: TransferPlan,
}

impl Config {
    /// Load from the default config file location, falling back to built-in
    /// defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match super::paths::config_file() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(ConfigError::Parse)
    }
}
