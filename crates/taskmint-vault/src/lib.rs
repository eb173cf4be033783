// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted credential store for the Taskmint security layer.
//!
//! Secrets are sealed with AES-256-GCM under a locally generated master key
//! and persisted in one JSON document per deployment. The master key file
//! and the document are owner-only; writes are atomic.

pub mod crypto;
pub mod master_key;
pub mod record;
pub mod store;

pub use record::{CredentialRecord, StoreDocument, StoredEntry};
pub use store::{mask_secret, CredentialStore};
