// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Taskmint security layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::TaskmintError;

/// A normalized AI-provider identifier.
///
/// Construction goes through [`ProviderId::new`], which lowercases the
/// input, maps non-alphanumeric characters to `_`, and rejects ids that
/// end up empty or contain nothing but separators. After construction the
/// id always matches `[a-z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Normalize and validate a raw provider name.
    pub fn new(raw: &str) -> Result<Self, TaskmintError> {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        if normalized.is_empty() || !normalized.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(TaskmintError::InvalidProvider(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// The normalized id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The environment variable name used for fallback lookup:
    /// `${PROVIDER}_API_KEY` with the id upper-cased and non-alphanumerics
    /// mapped to `_`.
    pub fn env_var(&self) -> String {
        let upper: String = self
            .0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{upper}_API_KEY")
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered capability tier governing which operations a credential may
/// authorize. The derived `Ord` follows declaration order, so
/// `ReadOnly < Restricted < Standard < Full < Admin`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    ReadOnly,
    Restricted,
    Standard,
    Full,
    Admin,
}

/// How a credential is presented to its provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    #[default]
    ApiKey,
    BearerToken,
    OauthToken,
}

/// Policy controlling how much raw content a verification record retains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    /// Raw request/response retained alongside the hashes.
    Full,
    /// Only the hashes are retained.
    HashOnly,
    /// A truncated, redacted summary is retained with the hashes.
    Redacted,
}

/// AI operations that can be minted into a verification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AiAction {
    Summarize,
    Prioritize,
    Categorize,
    Suggest,
}

/// Named class of malicious-input pattern detected around AI calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ThreatCategory {
    PromptInjection,
    Ssrf,
    Smuggling,
    Sql,
    Xss,
    Command,
    PrototypePollution,
}

/// An entry for the append-only audit sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_type: AuditEventType,
    pub provider: Option<ProviderId>,
    pub timestamp: DateTime<Utc>,
    /// Free-form detail, never containing secret values.
    pub details: String,
}

impl AuditEvent {
    /// Build an event stamped with the current time.
    pub fn now(event_type: AuditEventType, provider: Option<ProviderId>, details: impl Into<String>) -> Self {
        Self {
            event_type,
            provider,
            timestamp: Utc::now(),
            details: details.into(),
        }
    }
}

/// Kinds of security-relevant events worth auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    CredentialSaved,
    CredentialAccessed,
    CredentialRotated,
    CredentialDeleted,
    PermissionChanged,
    PermissionDenied,
    EscalationBlocked,
    ThreatBlocked,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn provider_id_normalizes_case_and_separators() {
        let id = ProviderId::new("OpenAI GPT-4").unwrap();
        assert_eq!(id.as_str(), "openai_gpt-4");
    }

    #[test]
    fn provider_id_rejects_empty_and_separator_only() {
        assert!(ProviderId::new("").is_err());
        assert!(ProviderId::new("   ").is_err());
        assert!(ProviderId::new("!!!").is_err());
    }

    #[test]
    fn provider_id_env_var_uppercases() {
        let id = ProviderId::new("openai").unwrap();
        assert_eq!(id.env_var(), "OPENAI_API_KEY");

        let id = ProviderId::new("my-provider").unwrap();
        assert_eq!(id.env_var(), "MY_PROVIDER_API_KEY");
    }

    #[test]
    fn permission_levels_are_totally_ordered() {
        assert!(PermissionLevel::ReadOnly < PermissionLevel::Restricted);
        assert!(PermissionLevel::Restricted < PermissionLevel::Standard);
        assert!(PermissionLevel::Standard < PermissionLevel::Full);
        assert!(PermissionLevel::Full < PermissionLevel::Admin);
    }

    #[test]
    fn threat_category_round_trips_kebab_case() {
        let s = ThreatCategory::PromptInjection.to_string();
        assert_eq!(s, "prompt-injection");
        assert_eq!(
            ThreatCategory::from_str("prompt-injection").unwrap(),
            ThreatCategory::PromptInjection
        );
    }

    #[test]
    fn ai_action_rejects_unknown_names() {
        assert!(AiAction::from_str("summarize").is_ok());
        assert!(AiAction::from_str("exfiltrate").is_err());
    }

    #[test]
    fn privacy_level_serializes_snake_case() {
        let json = serde_json::to_string(&PrivacyLevel::HashOnly).unwrap();
        assert_eq!(json, "\"hash_only\"");
    }
}
