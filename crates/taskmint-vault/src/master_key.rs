// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master key file management.
//!
//! The master key is generated once per deployment, written with owner-only
//! permissions beside the store document, and never transmitted or logged.
//! Secrets in the store are encrypted directly with this key; losing the
//! file makes all stored ciphertext unrecoverable by design.

use std::path::Path;

use tracing::{debug, info};
use zeroize::Zeroizing;

use taskmint_core::TaskmintError;

use crate::crypto;

/// Load the master key from `path`, generating and persisting a fresh one
/// if the file does not exist yet.
///
/// The key file is created with mode `0600`; a key file of the wrong length
/// is treated as corruption, not silently regenerated.
pub fn load_or_create(path: &Path) -> Result<Zeroizing<[u8; 32]>, TaskmintError> {
    if path.exists() {
        let bytes = std::fs::read(path).map_err(TaskmintError::storage)?;
        let key: [u8; 32] = bytes.try_into().map_err(|_| {
            TaskmintError::Decryption("master key file is corrupted (expected 32 bytes)".to_string())
        })?;
        debug!(path = %path.display(), "master key loaded");
        return Ok(Zeroizing::new(key));
    }

    let key = crypto::generate_random_key()?;
    write_owner_only(path, &key)?;
    info!(path = %path.display(), "master key generated");
    Ok(Zeroizing::new(key))
}

/// Write `bytes` to `path` with owner-only permissions.
#[cfg(unix)]
fn write_owner_only(path: &Path, bytes: &[u8]) -> Result<(), TaskmintError> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
        .map_err(TaskmintError::storage)?;
    file.write_all(bytes).map_err(TaskmintError::storage)?;
    file.sync_all().map_err(TaskmintError::storage)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_owner_only(path: &Path, bytes: &[u8]) -> Result<(), TaskmintError> {
    std::fs::write(path, bytes).map_err(TaskmintError::storage)
}
