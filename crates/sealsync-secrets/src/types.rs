//! Core types for secret synchronization

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A single logical secret: unique, case-sensitive key plus its value
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretEntry {
    #[zeroize(skip)]
    pub key: String,
    pub value: String,
}

impl SecretEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the length of the secret value in bytes
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SecretEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SecretEntry(key={}, value=[REDACTED {} bytes])",
            self.key,
            self.value.len()
        )
    }
}

/// Public key the primary store uses to seal secrets, as returned by GitHub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientPublicKey {
    /// Identifier the primary store uses to select the matching private key
    pub key_id: String,
    /// Base64-encoded 32-byte Curve25519 public key
    pub key: String,
}

impl RecipientPublicKey {
    pub fn new(key_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key: key.into(),
        }
    }
}

/// Per-key state during a restore batch.
///
/// `Pending -> Writing -> {Succeeded | Failed}`; terminal states are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pending,
    Writing,
    Succeeded,
    Failed,
}

impl KeyState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, KeyState::Succeeded | KeyState::Failed)
    }
}

impl std::fmt::Display for KeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyState::Pending => write!(f, "pending"),
            KeyState::Writing => write!(f, "writing"),
            KeyState::Succeeded => write!(f, "succeeded"),
            KeyState::Failed => write!(f, "failed"),
        }
    }
}
