use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// SFTP session errors
#[derive(Error, Debug)]
pub enum SftpError {
    #[error("Session is already connected")]
    AlreadyConnected,

    #[error("Session is not connected")]
    NotConnected,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("File operation failed: {0}")]
    FileOperation(String),

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Local I/O error: {0}")]
    LocalIo(String),
}

impl From<russh::Error> for SftpError {
    fn from(err: russh::Error) -> Self {
        SftpError::Connection(err.to_string())
    }
}
