//! Sealed-box encryption for the primary store
//!
//! GitHub only accepts repository secrets encrypted with an anonymous
//! libsodium sealed box (`crypto_box_seal`) for the repository public key:
//! 1. Generate an ephemeral X25519 keypair per call
//! 2. Derive the shared key from the ephemeral secret and the recipient key
//! 3. Encrypt with XSalsa20-Poly1305 (nonce = BLAKE2b(ephemeral_pk || recipient_pk))
//! 4. Prepend the ephemeral public key to the ciphertext
//!
//! The ephemeral key is discarded after each call, so sealing the same value
//! twice never produces the same ciphertext.

use crate::error::EncryptionError;
use crate::types::RecipientPublicKey;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use crypto_box::aead::OsRng;
use crypto_box::PublicKey;

/// Size of a Curve25519 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Bytes a sealed box adds to the plaintext (ephemeral public key + Poly1305 tag)
pub const SEAL_OVERHEAD: usize = PUBLIC_KEY_SIZE + 16;

/// Decode a base64 recipient key, requiring exactly 32 bytes
pub fn decode_public_key(public_key: &str) -> Result<PublicKey, EncryptionError> {
    let bytes = BASE64
        .decode(public_key.trim())
        .map_err(|e| EncryptionError::InvalidKey {
            reason: format!("not valid base64: {}", e),
        })?;

    let bytes: [u8; PUBLIC_KEY_SIZE] =
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| EncryptionError::InvalidKey {
                reason: format!("expected {} bytes, got {}", PUBLIC_KEY_SIZE, bytes.len()),
            })?;

    Ok(PublicKey::from(bytes))
}

/// Seal `plaintext` for a base64-encoded recipient public key.
///
/// Returns the base64-encoded sealed box. The key is validated before any
/// cryptographic work is done.
pub fn seal(public_key: &str, plaintext: &str) -> Result<String, EncryptionError> {
    let recipient = decode_public_key(public_key)?;

    let sealed = recipient
        .seal(&mut OsRng, plaintext.as_bytes())
        .map_err(|e| EncryptionError::EncryptFailed {
            reason: e.to_string(),
        })?;

    Ok(BASE64.encode(sealed))
}

/// Seal `plaintext` for a key fetched from the primary store
pub fn seal_for(key: &RecipientPublicKey, plaintext: &str) -> Result<String, EncryptionError> {
    seal(&key.key, plaintext)
}
