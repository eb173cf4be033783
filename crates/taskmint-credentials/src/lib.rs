// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential lifecycle management for the Taskmint security layer.
//!
//! [`CredentialManager`] layers business rules over the encrypted store:
//! input validation, usage tracking, environment fallback, rotation with
//! prior-key retention, expiry-as-absent semantics, and batch lookup with
//! per-item failure isolation.

pub mod manager;

pub use manager::{CredentialManager, CredentialExtra};
