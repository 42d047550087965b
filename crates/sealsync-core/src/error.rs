//! Error types for sealsync-core

use thiserror::Error;

/// Result type alias using sealsync-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for sealsync
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown backup target
    #[error("Invalid backup target: {target} (use 'aws', 'gcp', or 'none')")]
    InvalidBackupTarget { target: String },

    /// Malformed repository reference
    #[error("Invalid repository '{value}': expected OWNER/REPO")]
    InvalidRepository { value: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid backup target error
    pub fn invalid_backup_target(target: impl Into<String>) -> Self {
        Self::InvalidBackupTarget {
            target: target.into(),
        }
    }

    /// Create an invalid repository error
    pub fn invalid_repository(value: impl Into<String>) -> Self {
        Self::InvalidRepository {
            value: value.into(),
        }
    }
}
