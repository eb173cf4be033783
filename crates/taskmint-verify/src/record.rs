// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Verification record types.
//!
//! A [`VerificationRecord`] is created at most once per verified operation
//! and never mutated afterwards; nothing in this crate hands out mutable
//! access to one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskmint_core::{AiAction, PrivacyLevel, ProviderId};

/// Caller-supplied context for a verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationMetadata {
    /// Identity the operation ran on behalf of.
    pub user: String,
    /// When the AI operation happened (checked against the freshness window).
    pub timestamp: DateTime<Utc>,
    /// Free-form extra context carried into the record.
    #[serde(default)]
    pub extra: serde_json::Value,
}

/// Content retained by the record, governed by [`PrivacyLevel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "retention", rename_all = "snake_case")]
pub enum RetainedContent {
    /// Raw request and response alongside the hashes.
    Full { request: String, response: String },
    /// Hashes only.
    HashOnly,
    /// Truncated summaries with markup stripped.
    Redacted { request_summary: String, response_summary: String },
}

/// A tamper-evident proof of one AI operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub id: String,
    pub request_hash: String,
    pub response_hash: String,
    pub user: String,
    pub provider: ProviderId,
    pub timestamp: DateTime<Utc>,
    pub verification_type: AiAction,
    pub privacy_level: PrivacyLevel,
    pub content: RetainedContent,
    pub metadata: serde_json::Value,
    /// Handle assigned by the ledger when the proof was anchored.
    pub proof_id: String,
}
