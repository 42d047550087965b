//! Common test helpers for sealsync-secrets integration tests
//!
//! Provides recording doubles for both sides of the engine:
//! - `RecordingPrimary`: a primary store holding a real X25519 keypair so
//!   written ciphertexts can be opened and checked
//! - `RecordingStore`: a keyed blob store over `MemoryBlobStore` that can be
//!   told to fail reads
//! - `EventLog`: a shared, ordered record of calls across doubles

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;
use sealsync_secrets::{
    KeyedBlobStore, MemoryBlobStore, PrimaryStore, PrimaryStoreError, RecipientPublicKey,
    StoreError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ─── Event Log ───────────────────────────────────────────────────────────────

/// Ordered record of calls made against the doubles.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

// ─── Primary Store Double ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct StoredSecret {
    pub ciphertext: String,
    pub key_id: String,
}

/// Primary store double that records every write.
#[derive(Clone)]
pub struct RecordingPrimary {
    secret_key: Arc<SecretKey>,
    public_key: String,
    key_id: String,
    secrets: Arc<Mutex<HashMap<String, StoredSecret>>>,
    key_fetches: Arc<Mutex<usize>>,
    write_attempts: Arc<Mutex<usize>>,
    fail_on_write: Option<usize>,
    log: EventLog,
}

#[allow(dead_code)]
impl RecordingPrimary {
    pub fn new(log: EventLog) -> Self {
        let secret_key = SecretKey::generate(&mut OsRng);
        let public_key = BASE64.encode(secret_key.public_key().as_bytes());

        Self {
            secret_key: Arc::new(secret_key),
            public_key,
            key_id: "568250167242549743".to_string(),
            secrets: Arc::new(Mutex::new(HashMap::new())),
            key_fetches: Arc::new(Mutex::new(0)),
            write_attempts: Arc::new(Mutex::new(0)),
            fail_on_write: None,
            log,
        }
    }

    /// Fail the nth write attempt (1-based) with a rejection
    pub fn fail_on_write(mut self, nth: usize) -> Self {
        self.fail_on_write = Some(nth);
        self
    }

    /// Hand out a malformed public key
    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = key.into();
        self
    }

    /// Decrypt the stored value for `name`
    pub fn opened(&self, name: &str) -> Option<String> {
        let stored = self.secrets.lock().unwrap().get(name).cloned()?;
        let sealed = BASE64.decode(stored.ciphertext).ok()?;
        let plain = self.secret_key.unseal(&sealed).ok()?;
        String::from_utf8(plain).ok()
    }

    pub fn stored(&self, name: &str) -> Option<StoredSecret> {
        self.secrets.lock().unwrap().get(name).cloned()
    }

    pub fn secret_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.secrets.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn write_attempts(&self) -> usize {
        *self.write_attempts.lock().unwrap()
    }

    pub fn key_fetches(&self) -> usize {
        *self.key_fetches.lock().unwrap()
    }
}

#[async_trait]
impl PrimaryStore for RecordingPrimary {
    async fn encryption_key(&self) -> Result<RecipientPublicKey, PrimaryStoreError> {
        *self.key_fetches.lock().unwrap() += 1;
        self.log.record("primary:public-key");
        Ok(RecipientPublicKey::new(&self.key_id, &self.public_key))
    }

    async fn write_encrypted_secret(
        &self,
        name: &str,
        ciphertext: &str,
        key_id: &str,
    ) -> Result<(), PrimaryStoreError> {
        let attempt = {
            let mut attempts = self.write_attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        self.log.record(format!("primary:write:{}", name));

        if self.fail_on_write == Some(attempt) {
            return Err(PrimaryStoreError::Rejected {
                status: 422,
                message: format!("simulated failure for {}", name),
            });
        }

        self.secrets.lock().unwrap().insert(
            name.to_string(),
            StoredSecret {
                ciphertext: ciphertext.to_string(),
                key_id: key_id.to_string(),
            },
        );
        Ok(())
    }

    fn destination(&self) -> String {
        "acme/widgets".to_string()
    }
}

// ─── Keyed Blob Store Double ─────────────────────────────────────────────────

/// Blob store double that logs calls and can fail reads.
pub struct RecordingStore {
    inner: MemoryBlobStore,
    get_error: Option<StoreError>,
    log: EventLog,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn new(log: EventLog) -> Self {
        Self {
            inner: MemoryBlobStore::new(),
            get_error: None,
            log,
        }
    }

    pub fn with_slot(self, name: &str, value: &str) -> Self {
        self.inner.provision(name, value);
        self
    }

    /// Every `get` returns this error
    pub fn failing_get(mut self, err: StoreError) -> Self {
        self.get_error = Some(err);
        self
    }

    pub fn raw(&self, name: &str) -> Option<String> {
        self.inner.raw(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    pub fn put_count(&self) -> usize {
        self.inner.writes().len()
    }
}

#[async_trait]
impl KeyedBlobStore for RecordingStore {
    async fn get(&self, name: &str) -> Result<String, StoreError> {
        self.log.record(format!("backup:get:{}", name));
        match &self.get_error {
            Some(err) => Err(err.clone()),
            None => self.inner.get(name).await,
        }
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.log.record(format!("backup:put:{}", name));
        self.inner.put(name, value).await
    }

    fn backend(&self) -> &'static str {
        "recording store"
    }

    fn auth_hint(&self) -> &'static str {
        "Run 'aws sso login'"
    }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub const COLLECTION: &str = "github-secrets-acme-widgets";

#[allow(dead_code)]
pub fn complete_config() -> sealsync_secrets::SyncConfig {
    sealsync_secrets::SyncConfig::new(
        Some(COLLECTION.to_string()),
        Some(sealsync_core::RepoRef::new("acme", "widgets")),
        Some("ghp_test_token".to_string()),
    )
}
