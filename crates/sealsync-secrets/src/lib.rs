//! Credential synchronization for sealsync
//!
//! This crate keeps GitHub Actions repository secrets and cloud backups in step:
//! - **Sealed-box encryption**: values are sealed for the repository public key
//! - **Keyed blob stores**: AWS Secrets Manager, GCP Secret Manager, in-memory
//! - **JSON collections**: many secrets aggregated into one backend secret
//! - **Orchestration**: backup-first push, per-key isolated restore

pub mod aggregate;
pub mod auth;
pub mod error;
pub mod github;
pub mod sealed;
pub mod store;
pub mod sync;
pub mod types;

// Re-export commonly used items
pub use aggregate::{JsonCollection, SecretMap};
pub use auth::{
    github_token_from_config_or_env, resolve_gcp_access_token, resolve_github_token,
    CredentialError,
};
pub use error::{
    AggregationError, AggregationErrorKind, EncryptionError, EncryptionErrorKind,
    OrchestrationError, OrchestrationErrorKind, PrimaryStoreError, PrimaryStoreErrorKind,
    StoreError, StoreErrorKind,
};
pub use github::{validate_secret_name, GithubClient, PrimaryStore};
pub use store::{AwsSecretsManagerStore, GcpSecretManagerStore, KeyedBlobStore, MemoryBlobStore};
pub use sync::{KeyFailure, RestoreFailure, SyncConfig, SyncEngine, SyncResult};
pub use types::{KeyState, RecipientPublicKey, SecretEntry};
