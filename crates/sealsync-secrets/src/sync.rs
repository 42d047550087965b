//! Push and restore orchestration
//!
//! Push writes the backup collection first and only touches the primary store
//! once the backup succeeded. Restore replays a backup collection into the
//! primary store one key at a time, collecting per-key failures instead of
//! aborting the batch.

use crate::aggregate::JsonCollection;
use crate::error::{AggregationError, EncryptionError, OrchestrationError, PrimaryStoreError};
use crate::github::PrimaryStore;
use crate::sealed;
use crate::store::KeyedBlobStore;
use crate::types::{KeyState, SecretEntry};
use sealsync_core::{BackupTarget, RepoRef};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Explicit settings for one engine instance
#[derive(Clone, Default)]
pub struct SyncConfig {
    /// Name of the backup collection (the cloud secret holding the JSON blob)
    pub collection: Option<String>,
    /// Repository that receives restored secrets
    pub destination: Option<RepoRef>,
    /// Credential for the primary store
    pub credential: Option<String>,
}

impl SyncConfig {
    pub fn new(
        collection: Option<String>,
        destination: Option<RepoRef>,
        credential: Option<String>,
    ) -> Self {
        Self {
            collection,
            destination,
            credential,
        }
    }

    fn collection_name(&self) -> Option<&str> {
        self.collection
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Check that everything restore needs is present, naming every missing field
    pub fn validate_for_restore(&self) -> Result<(), OrchestrationError> {
        let mut missing = Vec::new();

        if self.collection_name().is_none() {
            missing.push("collection name");
        }
        if self.destination.is_none() {
            missing.push("destination repository");
        }
        if self
            .credential
            .as_deref()
            .map_or(true, |c| c.trim().is_empty())
        {
            missing.push("credential");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(OrchestrationError::config_missing(missing))
        }
    }
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("collection", &self.collection)
            .field("destination", &self.destination)
            .field(
                "credential",
                &self.credential.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Why a single key failed to restore
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyFailure {
    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error(transparent)]
    Primary(#[from] PrimaryStoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreFailure {
    pub key: String,
    pub error: KeyFailure,
}

/// Tally of a restore batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<RestoreFailure>,
    /// Keys written to the primary store, in processing order
    pub restored: Vec<String>,
}

impl SyncResult {
    pub fn is_success(&self) -> bool {
        self.succeeded == self.attempted
    }

    /// `succeeded/attempted`
    pub fn summary(&self) -> String {
        format!("{}/{}", self.succeeded, self.attempted)
    }

    pub fn failed_keys(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.key.as_str()).collect()
    }
}

/// Coordinates a primary store with its registered backup stores
pub struct SyncEngine<P: PrimaryStore> {
    config: SyncConfig,
    primary: P,
    backups: BTreeMap<BackupTarget, Arc<dyn KeyedBlobStore>>,
}

impl<P: PrimaryStore> SyncEngine<P> {
    pub fn new(config: SyncConfig, primary: P) -> Self {
        Self {
            config,
            primary,
            backups: BTreeMap::new(),
        }
    }

    /// Register the store backing a backup target
    pub fn with_backup(mut self, target: BackupTarget, store: Arc<dyn KeyedBlobStore>) -> Self {
        self.backups.insert(target, store);
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    fn collection(&self, target: BackupTarget) -> Result<JsonCollection<'_>, OrchestrationError> {
        let name = self
            .config
            .collection_name()
            .ok_or_else(|| OrchestrationError::config_missing(["collection name"]))?;

        let store = self
            .backups
            .get(&target)
            .ok_or_else(|| OrchestrationError::BackupFailed {
                target,
                source: AggregationError::Other {
                    backend: target.service_name(),
                    collection: name.to_string(),
                    message: "no store configured for this backup target".to_string(),
                },
            })?;

        Ok(JsonCollection::new(store.as_ref(), name))
    }

    /// Store one secret, backing it up first when a target is given.
    ///
    /// A failed backup leaves the primary store untouched.
    pub async fn push(
        &self,
        key: &str,
        value: &str,
        backup: Option<BackupTarget>,
    ) -> Result<(), OrchestrationError> {
        if let Some(target) = backup {
            let collection = self.collection(target)?;
            info!(
                "Backing up {} to {} secret {}",
                key,
                target.service_name(),
                collection.name()
            );
            collection
                .add_or_update(key, value)
                .await
                .map_err(|source| OrchestrationError::BackupFailed { target, source })?;
        }

        self.seal_and_write(key, value)
            .await
            .map_err(|failure| match failure {
                KeyFailure::Encryption(source) => OrchestrationError::Encryption {
                    key: key.to_string(),
                    source,
                },
                KeyFailure::Primary(source) => OrchestrationError::PrimaryWriteFailed {
                    key: key.to_string(),
                    destination: self.primary.destination(),
                    source,
                },
            })?;

        info!("Stored {} in {}", key, self.primary.destination());
        Ok(())
    }

    /// Replay every secret in the backup collection into the primary store
    pub async fn restore(&self, source: BackupTarget) -> Result<SyncResult, OrchestrationError> {
        self.restore_with(source, |_, _| {}).await
    }

    /// Restore, reporting each key's state transitions to `observer`.
    ///
    /// Keys are processed sequentially in sorted order. A failing key is
    /// recorded and the batch continues.
    pub async fn restore_with<F>(
        &self,
        source: BackupTarget,
        mut observer: F,
    ) -> Result<SyncResult, OrchestrationError>
    where
        F: FnMut(&str, KeyState),
    {
        self.config.validate_for_restore()?;
        let collection = self.collection(source)?;

        let entries: Vec<SecretEntry> = collection
            .get_all()
            .await
            .map_err(|err| OrchestrationError::BackupFailed {
                target: source,
                source: err,
            })?
            .into_iter()
            .map(|(key, value)| SecretEntry::new(key, value))
            .collect();

        if entries.is_empty() {
            info!("No secrets found in {} secret {}", source.service_name(), collection.name());
            return Ok(SyncResult::default());
        }

        info!(
            "Restoring {} secrets from {} to {}",
            entries.len(),
            source.service_name(),
            self.primary.destination()
        );

        for entry in &entries {
            observer(&entry.key, KeyState::Pending);
        }

        let mut result = SyncResult {
            attempted: entries.len(),
            ..SyncResult::default()
        };

        for entry in &entries {
            observer(&entry.key, KeyState::Writing);

            match self.seal_and_write(&entry.key, &entry.value).await {
                Ok(()) => {
                    debug!("Restored {}", entry.key);
                    result.succeeded += 1;
                    result.restored.push(entry.key.clone());
                    observer(&entry.key, KeyState::Succeeded);
                }
                Err(error) => {
                    warn!("Failed to restore {}: {}", entry.key, error);
                    result.failures.push(RestoreFailure {
                        key: entry.key.clone(),
                        error,
                    });
                    observer(&entry.key, KeyState::Failed);
                }
            }
        }

        info!("Restore complete: {}", result.summary());

        if result.is_success() {
            Ok(result)
        } else {
            Err(OrchestrationError::PartialRestoreFailure(result))
        }
    }

    /// Fetch a fresh recipient key, seal, and write one secret
    async fn seal_and_write(&self, key: &str, value: &str) -> Result<(), KeyFailure> {
        let recipient = self.primary.encryption_key().await?;
        let ciphertext = sealed::seal_for(&recipient, value)?;
        self.primary
            .write_encrypted_secret(key, &ciphertext, &recipient.key_id)
            .await?;
        Ok(())
    }
}
