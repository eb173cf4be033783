// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential record types: the decrypted in-memory form and the sealed
//! on-disk form.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use taskmint_core::{CredentialType, PermissionLevel, ProviderId};

/// A decrypted credential record.
///
/// The secret lives in [`SecretString`] so accidental `Debug`/`Display`
/// output never reveals it. Records are created on save, have usage stats
/// mutated on read, are wholly replaced on rotation, and are physically
/// removed on delete.
#[derive(Clone)]
pub struct CredentialRecord {
    pub provider: ProviderId,
    pub secret: SecretString,
    pub credential_type: CredentialType,
    pub permission_level: PermissionLevel,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    pub usage_count: u64,
    pub expires_at: Option<DateTime<Utc>>,
    /// Secret that was current before the last rotation.
    pub previous_key: Option<SecretString>,
    pub rotated_at: Option<DateTime<Utc>>,
    /// Ledger proof id attached by the verification service, if any.
    pub verification_proof: Option<String>,
}

impl CredentialRecord {
    /// A fresh record for `provider` with default metadata.
    pub fn new(provider: ProviderId, secret: SecretString) -> Self {
        let now = Utc::now();
        Self {
            provider,
            secret,
            credential_type: CredentialType::default(),
            permission_level: PermissionLevel::Standard,
            created_at: now,
            last_used: now,
            usage_count: 0,
            expires_at: None,
            previous_key: None,
            rotated_at: None,
            verification_proof: None,
        }
    }

    /// Whether the record's expiry, if set, has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("provider", &self.provider)
            .field("secret", &"[REDACTED]")
            .field("credential_type", &self.credential_type)
            .field("permission_level", &self.permission_level)
            .field("usage_count", &self.usage_count)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// A sealed value as persisted: AES-256-GCM ciphertext plus nonce, both
/// base64-encoded for the JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedValue {
    pub ciphertext: String,
    pub nonce: String,
}

/// The on-disk form of one credential record.
///
/// Only sealed fields hold secret material; everything else is metadata
/// readable without the master key (this is what makes `list()` cheap).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub secret: SealedValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_key: Option<SealedValue>,
    pub credential_type: CredentialType,
    pub permission_level: PermissionLevel,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    pub usage_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_proof: Option<String>,
}

/// The whole store document: one JSON file per deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    pub version: u32,
    pub providers: std::collections::BTreeMap<String, StoredEntry>,
}

impl StoreDocument {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn empty() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            providers: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secret() {
        let record = CredentialRecord::new(
            ProviderId::new("openai").unwrap(),
            SecretString::from("sk-test123".to_string()),
        );
        let dbg = format!("{record:?}");
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains("sk-test123"));
    }

    #[test]
    fn expiry_in_past_means_expired() {
        let mut record = CredentialRecord::new(
            ProviderId::new("openai").unwrap(),
            SecretString::from("sk-test".to_string()),
        );
        let now = Utc::now();
        assert!(!record.is_expired(now));

        record.expires_at = Some(now - chrono::Duration::seconds(1));
        assert!(record.is_expired(now));

        record.expires_at = Some(now + chrono::Duration::hours(1));
        assert!(!record.is_expired(now));
    }

    #[test]
    fn store_document_round_trips_json() {
        let mut doc = StoreDocument::empty();
        doc.providers.insert(
            "openai".to_string(),
            StoredEntry {
                secret: SealedValue {
                    ciphertext: "YWJj".into(),
                    nonce: "bm9uY2U=".into(),
                },
                previous_key: None,
                credential_type: CredentialType::ApiKey,
                permission_level: PermissionLevel::Standard,
                created_at: Utc::now(),
                last_used: Utc::now(),
                usage_count: 3,
                expires_at: None,
                rotated_at: None,
                verification_proof: None,
            },
        );

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: StoreDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, StoreDocument::CURRENT_VERSION);
        assert_eq!(parsed.providers.len(), 1);
        assert_eq!(parsed.providers["openai"].usage_count, 3);
    }
}
