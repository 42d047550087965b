//! Keyed blob stores: one opaque string per name
//!
//! Backup backends (AWS Secrets Manager, GCP Secret Manager) only hold a
//! single string per secret name. This module defines that capability and the
//! error classification every adapter shares.

pub mod aws;
pub mod gcp;
pub mod memory;

use crate::error::StoreError;
use async_trait::async_trait;

pub use aws::AwsSecretsManagerStore;
pub use gcp::GcpSecretManagerStore;
pub use memory::MemoryBlobStore;

/// Trait for backends that store one string value per name
#[async_trait]
pub trait KeyedBlobStore: Send + Sync {
    /// Read the current value stored under `name`.
    ///
    /// Returns `StoreError::NotFound` if no slot with that name exists.
    async fn get(&self, name: &str) -> Result<String, StoreError>;

    /// Replace the whole value stored under `name`
    async fn put(&self, name: &str, value: &str) -> Result<(), StoreError>;

    /// Backend name for error messages
    fn backend(&self) -> &'static str;

    /// Remediation shown to the operator on authentication failures
    fn auth_hint(&self) -> &'static str {
        "Please check your credentials"
    }
}

/// Error text fragments that indicate an authentication or authorization
/// problem rather than a missing resource
const AUTH_MARKERS: &[&str] = &[
    "ExpiredToken",
    "InvalidToken",
    "NoCredentialProviders",
    "UnauthorizedException",
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "AccessDenied",
    "PERMISSION_DENIED",
    "UNAUTHENTICATED",
    "no valid credential",
    "failed to retrieve credentials",
    "failed to load credentials",
    "token has expired",
    "the SSO session",
];

/// Whether an error message carries an authentication failure marker
pub fn is_auth_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    AUTH_MARKERS
        .iter()
        .any(|marker| lower.contains(&marker.to_lowercase()))
}

/// Classify a backend failure.
///
/// Auth markers are checked before the not-found signal: some backends
/// report "resource not found" when the caller lacks permission to know
/// whether it exists.
pub fn classify(name: &str, message: &str, not_found: bool) -> StoreError {
    if is_auth_message(message) {
        StoreError::auth(message)
    } else if not_found {
        StoreError::not_found(name)
    } else {
        StoreError::other(message)
    }
}
