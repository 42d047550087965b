//! In-memory keyed blob store
//!
//! Holds slots in a process-local map. Slots must be provisioned explicitly
//! with [`MemoryBlobStore::with_slot`] or [`MemoryBlobStore::provision`], the
//! same way a cloud secret has to exist before the aggregation layer writes
//! to it.

use crate::error::StoreError;
use crate::store::KeyedBlobStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    slots: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style slot provisioning
    pub fn with_slot(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.provision(name, value);
        self
    }

    /// Create or overwrite a slot without counting it as a write
    pub fn provision(&self, name: impl Into<String>, value: impl Into<String>) {
        self.slots().insert(name.into(), value.into());
    }

    /// Raw stored value, bypassing any decoding
    pub fn raw(&self, name: &str) -> Option<String> {
        self.slots().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots().contains_key(name)
    }

    pub fn slot_count(&self) -> usize {
        self.slots().len()
    }

    /// Names passed to `put`, in call order
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl KeyedBlobStore for MemoryBlobStore {
    async fn get(&self, name: &str) -> Result<String, StoreError> {
        self.slots()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::not_found(name))
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(name.to_string());
        self.slots().insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "in-memory store"
    }
}
