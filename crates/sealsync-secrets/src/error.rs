//! Error types for the synchronization engine
//!
//! Each component has its own tagged error with a `kind()` discriminant so
//! callers can branch on the failure category without string matching.

use crate::sync::SyncResult;
use sealsync_core::BackupTarget;
use thiserror::Error;

// ─── Encryption ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionErrorKind {
    InvalidKey,
    EncryptFailed,
}

/// Failure to seal a value for the primary store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncryptionError {
    #[error("invalid recipient public key: {reason}")]
    InvalidKey { reason: String },

    #[error("sealed-box encryption failed: {reason}")]
    EncryptFailed { reason: String },
}

impl EncryptionError {
    pub fn kind(&self) -> EncryptionErrorKind {
        match self {
            EncryptionError::InvalidKey { .. } => EncryptionErrorKind::InvalidKey,
            EncryptionError::EncryptFailed { .. } => EncryptionErrorKind::EncryptFailed,
        }
    }
}

// ─── Keyed blob stores ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    NotFound,
    AuthFailure,
    Other,
}

/// Error surfaced by a KeyedBlobStore adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("secret '{name}' not found")]
    NotFound { name: String },

    #[error("authentication failed: {message}")]
    AuthFailure { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl StoreError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthFailure {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::NotFound { .. } => StoreErrorKind::NotFound,
            StoreError::AuthFailure { .. } => StoreErrorKind::AuthFailure,
            StoreError::Other { .. } => StoreErrorKind::Other,
        }
    }
}

// ─── Aggregation layer ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationErrorKind {
    CollectionNotFound,
    CorruptFormat,
    KeyNotFound,
    AuthFailure,
    Other,
}

/// Error from a JSON collection read-modify-write cycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error(
        "{backend} secret '{collection}' not found. Create it first or configure a different secret_name"
    )]
    CollectionNotFound {
        backend: &'static str,
        collection: String,
    },

    #[error("{backend} secret '{collection}' exists but is not a valid JSON object of strings: {reason}")]
    CorruptFormat {
        backend: &'static str,
        collection: String,
        reason: String,
    },

    #[error("key '{key}' not found in {backend} secret '{collection}'")]
    KeyNotFound {
        backend: &'static str,
        collection: String,
        key: String,
    },

    #[error("{backend} authentication error for secret '{collection}': {message}. {hint}")]
    AuthFailure {
        backend: &'static str,
        collection: String,
        message: String,
        hint: &'static str,
    },

    #[error("failed to access {backend} secret '{collection}': {message}")]
    Other {
        backend: &'static str,
        collection: String,
        message: String,
    },
}

impl AggregationError {
    pub fn kind(&self) -> AggregationErrorKind {
        match self {
            AggregationError::CollectionNotFound { .. } => AggregationErrorKind::CollectionNotFound,
            AggregationError::CorruptFormat { .. } => AggregationErrorKind::CorruptFormat,
            AggregationError::KeyNotFound { .. } => AggregationErrorKind::KeyNotFound,
            AggregationError::AuthFailure { .. } => AggregationErrorKind::AuthFailure,
            AggregationError::Other { .. } => AggregationErrorKind::Other,
        }
    }

    /// Name of the collection the failed operation targeted
    pub fn collection(&self) -> &str {
        match self {
            AggregationError::CollectionNotFound { collection, .. }
            | AggregationError::CorruptFormat { collection, .. }
            | AggregationError::KeyNotFound { collection, .. }
            | AggregationError::AuthFailure { collection, .. }
            | AggregationError::Other { collection, .. } => collection,
        }
    }
}

// ─── Primary store ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryStoreErrorKind {
    AuthFailure,
    Rejected,
    Transport,
    InvalidResponse,
}

/// Error from the primary store (GitHub Actions secrets API)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimaryStoreError {
    #[error("GitHub authentication failed ({status}): {message}")]
    AuthFailure { status: u16, message: String },

    #[error("GitHub rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("GitHub request failed: {message}")]
    Transport { message: String },

    #[error("unexpected GitHub response: {message}")]
    InvalidResponse { message: String },
}

impl PrimaryStoreError {
    pub fn kind(&self) -> PrimaryStoreErrorKind {
        match self {
            PrimaryStoreError::AuthFailure { .. } => PrimaryStoreErrorKind::AuthFailure,
            PrimaryStoreError::Rejected { .. } => PrimaryStoreErrorKind::Rejected,
            PrimaryStoreError::Transport { .. } => PrimaryStoreErrorKind::Transport,
            PrimaryStoreError::InvalidResponse { .. } => PrimaryStoreErrorKind::InvalidResponse,
        }
    }
}

// ─── Orchestration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestrationErrorKind {
    ConfigMissing,
    BackupFailed,
    Encryption,
    PrimaryWriteFailed,
    PartialRestoreFailure,
}

/// Error returned by push and restore
#[derive(Error, Debug, Clone)]
pub enum OrchestrationError {
    #[error("missing required configuration: {}", .fields.join(", "))]
    ConfigMissing { fields: Vec<String> },

    #[error("backup to {} failed: {source}", .target.service_name())]
    BackupFailed {
        target: BackupTarget,
        #[source]
        source: AggregationError,
    },

    #[error("failed to encrypt secret '{key}': {source}")]
    Encryption {
        key: String,
        #[source]
        source: EncryptionError,
    },

    #[error("failed to write secret '{key}' to {destination}: {source}")]
    PrimaryWriteFailed {
        key: String,
        destination: String,
        #[source]
        source: PrimaryStoreError,
    },

    #[error(
        "{} of {} secrets failed to restore",
        .0.failures.len(),
        .0.attempted
    )]
    PartialRestoreFailure(SyncResult),
}

impl OrchestrationError {
    pub fn kind(&self) -> OrchestrationErrorKind {
        match self {
            OrchestrationError::ConfigMissing { .. } => OrchestrationErrorKind::ConfigMissing,
            OrchestrationError::BackupFailed { .. } => OrchestrationErrorKind::BackupFailed,
            OrchestrationError::Encryption { .. } => OrchestrationErrorKind::Encryption,
            OrchestrationError::PrimaryWriteFailed { .. } => {
                OrchestrationErrorKind::PrimaryWriteFailed
            }
            OrchestrationError::PartialRestoreFailure(_) => {
                OrchestrationErrorKind::PartialRestoreFailure
            }
        }
    }

    /// Create a config missing error from field names
    pub fn config_missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ConfigMissing {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// The restore tally, present only for partial restore failures
    pub fn sync_result(&self) -> Option<&SyncResult> {
        match self {
            OrchestrationError::PartialRestoreFailure(result) => Some(result),
            _ => None,
        }
    }
}
