// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Taskmint security layer.

use thiserror::Error;

use crate::types::ThreatCategory;

/// The primary error type used across all Taskmint components.
///
/// Expected security and validation outcomes get their own variants so
/// callers can match on them; truly fatal conditions (corrupted store,
/// misconfigured dependency) surface as `Storage`, `Config`, or `Internal`.
/// No variant ever carries a secret value.
#[derive(Debug, Error)]
pub enum TaskmintError {
    /// Provider id is empty or contains characters outside `[a-z0-9_-]`.
    #[error("invalid provider id: {0}")]
    InvalidProvider(String),

    /// A credential operation was given an empty secret.
    #[error("secret must not be empty")]
    EmptySecret,

    /// No (unexpired) record exists for the provider.
    #[error("no credentials found for provider: {provider}")]
    NotFound { provider: String },

    /// Filesystem or persistence failure, cause preserved.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Ciphertext could not be decrypted (corruption or changed master key).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// A store failure surfaced while saving credentials.
    #[error("failed to save credentials for {provider}")]
    SaveFailed {
        provider: String,
        #[source]
        source: Box<TaskmintError>,
    },

    /// A store failure surfaced while retrieving credentials.
    #[error("failed to retrieve credentials for {provider}")]
    RetrieveFailed {
        provider: String,
        #[source]
        source: Box<TaskmintError>,
    },

    /// A store failure surfaced while deleting credentials.
    #[error("failed to delete credentials for {provider}")]
    DeleteFailed {
        provider: String,
        #[source]
        source: Box<TaskmintError>,
    },

    /// Caller's permission level is below the operation's minimum.
    #[error("permission denied for operation: {operation}")]
    PermissionDenied { operation: String },

    /// An update path attempted to assign the ADMIN tier.
    #[error("permission escalation blocked for provider: {provider}")]
    PermissionEscalation { provider: String },

    /// One or more declarative validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Outbound content matched a threat signature.
    #[error("threat detected: {0}")]
    ThreatDetected(ThreatCategory),

    /// Payload exceeded the scan size guard.
    #[error("input too large: {size} bytes (limit {limit})")]
    InputTooLarge { size: usize, limit: usize },

    /// A stored proof's hashes no longer match the recorded content.
    #[error("verification proof hash mismatch for record: {record_id}")]
    TamperDetected { record_id: String },

    /// A verification timestamp fell outside the freshness window.
    #[error("verification timestamp outside freshness window ({skew_secs}s skew)")]
    ReplaySuspected { skew_secs: i64 },

    /// An external call exceeded its caller-supplied bound.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Ledger adapter failure (proof anchoring, status lookup).
    #[error("ledger error: {message}")]
    Ledger {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TaskmintError {
    /// Wrap a filesystem or serialization failure, preserving the cause.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(source),
        }
    }
}
