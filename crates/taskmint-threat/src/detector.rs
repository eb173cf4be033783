// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Threat scanning around external AI calls.
//!
//! Outbound request content is scanned after structural validation and
//! before any network call; a match fails the operation so nothing is
//! partially sent. Inbound provider responses are neutralized instead of
//! rejected, since the caller does not control remote output. Scans are
//! pure functions and independently parallelizable across payloads.

use serde_json::Value;
use tracing::warn;

use taskmint_config::SecurityConfig;
use taskmint_core::{
    AuditEvent, AuditEventType, AuditSink, ProviderId, TaskmintError, ThreatCategory,
};

use crate::patterns::{PATTERN_SETS, POLLUTION_KEYS};

/// An inbound payload after neutralization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neutralized {
    pub content: String,
    /// True when any signature matched and was stripped.
    pub modified: bool,
}

/// Pattern-based scanner for injection/SSRF/smuggling signatures.
#[derive(Debug, Clone)]
pub struct ThreatDetector {
    max_scan_bytes: usize,
}

impl ThreatDetector {
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            max_scan_bytes: config.max_scan_bytes,
        }
    }

    /// Scan `content`, returning the first matching category.
    ///
    /// The size guard runs before any pattern evaluation so oversized
    /// payloads are rejected at fixed cost.
    pub fn scan(&self, content: &str) -> Result<Option<ThreatCategory>, TaskmintError> {
        self.guard_size(content)?;
        for set in PATTERN_SETS {
            if set.signatures.iter().any(|sig| sig.is_match(content)) {
                return Ok(Some(set.category));
            }
        }
        Ok(None)
    }

    /// Scan outbound request content; any match fails the operation before
    /// a single byte is sent.
    pub fn scan_outbound(&self, content: &str) -> Result<(), TaskmintError> {
        match self.scan(content)? {
            Some(category) => {
                warn!(category = %category, "outbound content blocked");
                Err(TaskmintError::ThreatDetected(category))
            }
            None => Ok(()),
        }
    }

    /// Like [`scan_outbound`](Self::scan_outbound), also recording a
    /// `ThreatBlocked` audit event on detection.
    pub async fn scan_outbound_audited(
        &self,
        content: &str,
        provider: &ProviderId,
        audit: &dyn AuditSink,
    ) -> Result<(), TaskmintError> {
        match self.scan_outbound(content) {
            Err(TaskmintError::ThreatDetected(category)) => {
                audit
                    .record(AuditEvent::now(
                        AuditEventType::ThreatBlocked,
                        Some(provider.clone()),
                        format!("category={category} direction=outbound"),
                    ))
                    .await?;
                Err(TaskmintError::ThreatDetected(category))
            }
            other => other,
        }
    }

    /// Neutralize inbound provider responses: matched signatures are
    /// stripped rather than the payload rejected, and the result is
    /// flagged when modified.
    pub fn scan_inbound(&self, content: &str) -> Result<Neutralized, TaskmintError> {
        self.guard_size(content)?;
        let mut sanitized = content.to_string();
        let mut modified = false;
        for set in PATTERN_SETS {
            for signature in set.signatures {
                let replaced = signature.replace_all(&sanitized, "[filtered]");
                if let std::borrow::Cow::Owned(new) = replaced {
                    warn!(category = %set.category, "inbound content neutralized");
                    sanitized = new;
                    modified = true;
                }
            }
        }
        Ok(Neutralized {
            content: sanitized,
            modified,
        })
    }

    /// Check deserialized, untrusted object fields for prototype-pollution
    /// keys, recursing into nested objects and arrays.
    ///
    /// Strongly-typed records with fixed fields make this scan unnecessary;
    /// it exists for the JSON edges where payloads stay dynamic.
    pub fn scan_object(&self, value: &Value) -> Result<(), TaskmintError> {
        match value {
            Value::Object(map) => {
                for (key, nested) in map {
                    if POLLUTION_KEYS.contains(&key.as_str()) {
                        warn!(key = %key, "prototype pollution key on object field");
                        return Err(TaskmintError::ThreatDetected(
                            ThreatCategory::PrototypePollution,
                        ));
                    }
                    self.scan_object(nested)?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for item in items {
                    self.scan_object(item)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn guard_size(&self, content: &str) -> Result<(), TaskmintError> {
        if content.len() > self.max_scan_bytes {
            return Err(TaskmintError::InputTooLarge {
                size: content.len(),
                limit: self.max_scan_bytes,
            });
        }
        Ok(())
    }
}
