// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations and constant-time comparison.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the
//! system CSPRNG. Nonce reuse would be catastrophic for GCM security.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use taskmint_core::TaskmintError;

/// Encrypt plaintext with AES-256-GCM using a random 96-bit nonce.
///
/// Returns `(ciphertext_with_tag, nonce_bytes)`. The caller must persist
/// both to be able to decrypt later.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; 12]), TaskmintError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| TaskmintError::Internal("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; 12];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| TaskmintError::Internal("failed to generate random nonce".to_string()))?;

    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: the buffer is extended with the 16-byte auth tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| TaskmintError::Internal("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// `ciphertext` must include the authentication tag appended by [`seal`].
/// A wrong key or tampered data yields [`TaskmintError::Decryption`].
pub fn open(
    key: &[u8; 32],
    nonce_bytes: &[u8; 12],
    ciphertext: &[u8],
) -> Result<Vec<u8>, TaskmintError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| TaskmintError::Internal("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*nonce_bytes);

    let mut in_out = ciphertext.to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| {
            TaskmintError::Decryption(
                "AES-256-GCM decryption failed -- wrong master key or corrupted data".to_string(),
            )
        })?;

    Ok(plaintext.to_vec())
}

/// Generate a random 32-byte key suitable for AES-256-GCM.
pub fn generate_random_key() -> Result<[u8; 32], TaskmintError> {
    let rng = SystemRandom::new();
    let mut key = [0u8; 32];
    rng.fill(&mut key)
        .map_err(|_| TaskmintError::Internal("failed to generate random key".to_string()))?;
    Ok(key)
}

/// Constant-time equality for secret material.
///
/// Length is not hidden (ring compares equal-length slices only), but for
/// equal lengths comparison time does not depend on content.
pub fn secrets_equal(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && ring::constant_time::verify_slices_are_equal(a, b).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key = generate_random_key().unwrap();
        let plaintext = b"sk-test-credential-value";

        let (ciphertext, nonce) = seal(&key, plaintext).unwrap();
        let decrypted = open(&key, &nonce, &ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn nonces_are_fresh_per_seal() {
        let key = generate_random_key().unwrap();

        let (ct1, nonce1) = seal(&key, b"same input twice").unwrap();
        let (ct2, nonce2) = seal(&key, b"same input twice").unwrap();

        assert_ne!(nonce1, nonce2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn open_with_wrong_key_is_decryption_error() {
        let key1 = generate_random_key().unwrap();
        let key2 = generate_random_key().unwrap();

        let (ciphertext, nonce) = seal(&key1, b"secret data").unwrap();
        let result = open(&key2, &nonce, &ciphertext);

        assert!(matches!(result, Err(TaskmintError::Decryption(_))));
    }

    #[test]
    fn tampered_ciphertext_is_decryption_error() {
        let key = generate_random_key().unwrap();

        let (mut ciphertext, nonce) = seal(&key, b"do not tamper").unwrap();
        ciphertext[0] ^= 0x01;

        let result = open(&key, &nonce, &ciphertext);
        assert!(matches!(result, Err(TaskmintError::Decryption(_))));
    }

    #[test]
    fn secrets_equal_matches_and_rejects() {
        assert!(secrets_equal(b"sk-abc", b"sk-abc"));
        assert!(!secrets_equal(b"sk-abc", b"sk-abd"));
        assert!(!secrets_equal(b"sk-abc", b"sk-abcd"));
    }
}
