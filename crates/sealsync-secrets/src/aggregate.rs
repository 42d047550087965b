//! JSON collections on top of a keyed blob store
//!
//! A collection is a single backend secret whose value is a flat JSON object
//! mapping secret names to values:
//!
//! ```json
//! {
//!   "API_KEY": "abc123",
//!   "DB_PASSWORD": "hunter2"
//! }
//! ```
//!
//! Every operation is one read, optionally followed by one whole-blob write.
//! There is no locking: two processes updating the same collection at once
//! can lose an update.

use crate::error::{AggregationError, StoreError};
use crate::store::KeyedBlobStore;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Decoded collection contents, always serialized with sorted keys
pub type SecretMap = BTreeMap<String, String>;

pub struct JsonCollection<'a> {
    store: &'a dyn KeyedBlobStore,
    name: String,
}

impl<'a> JsonCollection<'a> {
    pub fn new(store: &'a dyn KeyedBlobStore, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Insert or replace one key, preserving every other key in the collection.
    ///
    /// The collection must already exist. A blob that is not a flat JSON
    /// object of strings is left untouched.
    pub async fn add_or_update(&self, key: &str, value: &str) -> Result<(), AggregationError> {
        let mut secrets = self.load().await?;

        let replaced = secrets.insert(key.to_string(), value.to_string()).is_some();
        debug!(
            "{} key {} in collection {} ({} keys)",
            if replaced { "Updating" } else { "Adding" },
            key,
            self.name,
            secrets.len()
        );

        let serialized = serde_json::to_string_pretty(&secrets).map_err(|e| AggregationError::Other {
            backend: self.backend(),
            collection: self.name.clone(),
            message: format!("failed to serialize collection: {}", e),
        })?;

        self.store
            .put(&self.name, &serialized)
            .await
            .map_err(|e| self.map_store_error(e))?;

        info!("Stored {} in {} secret {}", key, self.backend(), self.name);
        Ok(())
    }

    /// Value of a single key
    pub async fn get(&self, key: &str) -> Result<String, AggregationError> {
        let mut secrets = self.load().await?;
        secrets
            .remove(key)
            .ok_or_else(|| AggregationError::KeyNotFound {
                backend: self.backend(),
                collection: self.name.clone(),
                key: key.to_string(),
            })
    }

    /// Every key/value pair in the collection
    pub async fn get_all(&self) -> Result<SecretMap, AggregationError> {
        self.load().await
    }

    /// Key names only, sorted
    pub async fn keys(&self) -> Result<Vec<String>, AggregationError> {
        Ok(self.load().await?.into_keys().collect())
    }

    async fn load(&self) -> Result<SecretMap, AggregationError> {
        let raw = self
            .store
            .get(&self.name)
            .await
            .map_err(|e| self.map_store_error(e))?;

        self.decode(&raw)
    }

    fn decode(&self, raw: &str) -> Result<SecretMap, AggregationError> {
        if raw.trim().is_empty() {
            return Ok(SecretMap::new());
        }

        serde_json::from_str(raw).map_err(|e| AggregationError::CorruptFormat {
            backend: self.backend(),
            collection: self.name.clone(),
            reason: e.to_string(),
        })
    }

    fn map_store_error(&self, err: StoreError) -> AggregationError {
        let backend = self.backend();
        let collection = self.name.clone();

        match err {
            StoreError::AuthFailure { message } => AggregationError::AuthFailure {
                backend,
                collection,
                message,
                hint: self.store.auth_hint(),
            },
            StoreError::NotFound { .. } => AggregationError::CollectionNotFound { backend, collection },
            StoreError::Other { message } => AggregationError::Other {
                backend,
                collection,
                message,
            },
        }
    }
}
