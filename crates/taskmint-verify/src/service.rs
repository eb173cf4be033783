// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Verification of AI operations, anchored on an external ledger.
//!
//! The service hashes request/response content, retains as much raw
//! content as the privacy level allows, and delegates proof persistence to
//! the ledger adapter. It never retries: failures surface to the caller,
//! who decides whether to retry. Every ledger call is bounded by a
//! caller-supplied timeout.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

use taskmint_config::VerificationConfig;
use taskmint_core::traits::ledger::ProofStatus;
use taskmint_core::{AiAction, LedgerAdapter, PrivacyLevel, ProviderId, TaskmintError};

use crate::record::{RetainedContent, VerificationMetadata, VerificationRecord};

/// SHA-256 hex digest of `content`.
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Produces tamper-evident verification records.
pub struct VerificationService {
    ledger: Arc<dyn LedgerAdapter>,
    config: VerificationConfig,
}

impl VerificationService {
    pub fn new(ledger: Arc<dyn LedgerAdapter>, config: VerificationConfig) -> Self {
        Self { ledger, config }
    }

    /// Create and anchor a verification record for one AI operation.
    ///
    /// Empty request/response content is rejected before the adapter is
    /// called, and a metadata timestamp outside the freshness window fails
    /// as a suspected replay.
    pub async fn create_verification(
        &self,
        action: AiAction,
        request: &str,
        response: &str,
        metadata: VerificationMetadata,
        privacy_level: PrivacyLevel,
        provider: &ProviderId,
        timeout: Duration,
    ) -> Result<VerificationRecord, TaskmintError> {
        if request.is_empty() {
            return Err(TaskmintError::Validation("request must not be empty".to_string()));
        }
        if response.is_empty() {
            return Err(TaskmintError::Validation("response must not be empty".to_string()));
        }
        self.check_freshness(&metadata)?;

        let request_hash = content_hash(request);
        let response_hash = content_hash(response);
        // The anchored digest binds both hashes together.
        let digest = content_hash(&format!("{request_hash}:{response_hash}"));

        let proof = self
            .bounded(timeout, self.ledger.generate_credential_proof(provider, &digest))
            .await?;

        let record = VerificationRecord {
            id: Uuid::new_v4().to_string(),
            request_hash,
            response_hash,
            user: metadata.user.clone(),
            provider: provider.clone(),
            timestamp: Utc::now(),
            verification_type: action,
            privacy_level,
            content: self.retain(privacy_level, request, response),
            metadata: metadata.extra,
            proof_id: proof.proof_id,
        };
        debug!(record_id = %record.id, action = %action, "verification record created");
        Ok(record)
    }

    /// Confirm that `record` still covers exactly `request` and `response`.
    ///
    /// Any hash mismatch means the content or the record was altered.
    pub fn verify_content(
        &self,
        record: &VerificationRecord,
        request: &str,
        response: &str,
    ) -> Result<(), TaskmintError> {
        if content_hash(request) != record.request_hash
            || content_hash(response) != record.response_hash
        {
            warn!(record_id = %record.id, "verification hash mismatch");
            return Err(TaskmintError::TamperDetected {
                record_id: record.id.clone(),
            });
        }
        Ok(())
    }

    /// Confirm the anchored proof's current validity via the ledger.
    pub async fn check_verification_status(
        &self,
        record: &VerificationRecord,
        timeout: Duration,
    ) -> Result<ProofStatus, TaskmintError> {
        self.bounded(
            timeout,
            self.ledger.check_verification_status(&record.proof_id),
        )
        .await
    }

    /// Full proof check: content hashes plus ledger status.
    pub async fn verify_proof(
        &self,
        record: &VerificationRecord,
        request: &str,
        response: &str,
        timeout: Duration,
    ) -> Result<(), TaskmintError> {
        self.verify_content(record, request, response)?;
        match self.check_verification_status(record, timeout).await? {
            ProofStatus::Valid => Ok(()),
            ProofStatus::Revoked | ProofStatus::Unknown => Err(TaskmintError::TamperDetected {
                record_id: record.id.clone(),
            }),
        }
    }

    /// Revoke an anchored proof.
    pub async fn revoke(
        &self,
        record: &VerificationRecord,
        timeout: Duration,
    ) -> Result<(), TaskmintError> {
        self.bounded(timeout, self.ledger.revoke_verification(&record.proof_id))
            .await
    }

    fn check_freshness(&self, metadata: &VerificationMetadata) -> Result<(), TaskmintError> {
        let window = chrono::Duration::seconds(self.config.freshness_window_secs as i64);
        let skew = Utc::now() - metadata.timestamp;
        if skew > window || skew < -window {
            warn!(skew_secs = skew.num_seconds(), "verification timestamp outside window");
            return Err(TaskmintError::ReplaySuspected {
                skew_secs: skew.num_seconds(),
            });
        }
        Ok(())
    }

    fn retain(&self, level: PrivacyLevel, request: &str, response: &str) -> RetainedContent {
        match level {
            PrivacyLevel::Full => RetainedContent::Full {
                request: request.to_string(),
                response: response.to_string(),
            },
            PrivacyLevel::HashOnly => RetainedContent::HashOnly,
            PrivacyLevel::Redacted => RetainedContent::Redacted {
                request_summary: summarize(request, self.config.redacted_summary_chars),
                response_summary: summarize(response, self.config.redacted_summary_chars),
            },
        }
    }

    async fn bounded<T>(
        &self,
        timeout: Duration,
        call: impl std::future::Future<Output = Result<T, TaskmintError>>,
    ) -> Result<T, TaskmintError> {
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(TaskmintError::Timeout { duration: timeout }),
        }
    }
}

impl std::fmt::Debug for VerificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Character-truncated summary, suitable for redacted retention.
fn summarize(content: &str, max_chars: usize) -> String {
    let truncated: String = content.chars().take(max_chars).collect();
    if content.chars().count() > max_chars {
        format!("{truncated}…")
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmint_test_utils::MockLedger;

    fn service() -> (VerificationService, Arc<MockLedger>) {
        let ledger = Arc::new(MockLedger::new());
        (
            VerificationService::new(ledger.clone(), VerificationConfig::default()),
            ledger,
        )
    }

    fn metadata() -> VerificationMetadata {
        VerificationMetadata {
            user: "alice".to_string(),
            timestamp: Utc::now(),
            extra: serde_json::Value::Null,
        }
    }

    fn provider() -> ProviderId {
        ProviderId::new("openai").unwrap()
    }

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn hashing_is_deterministic_and_sensitive() {
        assert_eq!(content_hash("req"), content_hash("req"));
        assert_ne!(content_hash("req"), content_hash("reQ"));
        assert_ne!(content_hash("req"), content_hash("re"));
    }

    #[tokio::test]
    async fn creates_hash_only_record() {
        let (service, ledger) = service();
        let record = service
            .create_verification(
                AiAction::Summarize,
                "req",
                "resp",
                metadata(),
                PrivacyLevel::HashOnly,
                &provider(),
                TIMEOUT,
            )
            .await
            .unwrap();

        assert_eq!(record.request_hash, content_hash("req"));
        assert_eq!(record.content, RetainedContent::HashOnly);
        assert_eq!(ledger.anchored_count().await, 1);
    }

    #[tokio::test]
    async fn empty_content_is_rejected_before_anchoring() {
        let (service, ledger) = service();
        let result = service
            .create_verification(
                AiAction::Summarize,
                "",
                "resp",
                metadata(),
                PrivacyLevel::HashOnly,
                &provider(),
                TIMEOUT,
            )
            .await;
        assert!(matches!(result, Err(TaskmintError::Validation(_))));
        assert_eq!(ledger.anchored_count().await, 0);
    }

    #[tokio::test]
    async fn stale_timestamp_is_suspected_replay() {
        let (service, _ledger) = service();
        let stale = VerificationMetadata {
            timestamp: Utc::now() - chrono::Duration::minutes(10),
            ..metadata()
        };
        let result = service
            .create_verification(
                AiAction::Summarize,
                "req",
                "resp",
                stale,
                PrivacyLevel::HashOnly,
                &provider(),
                TIMEOUT,
            )
            .await;
        assert!(matches!(result, Err(TaskmintError::ReplaySuspected { .. })));
    }

    #[tokio::test]
    async fn verify_proof_detects_tampered_content() {
        let (service, _ledger) = service();
        let record = service
            .create_verification(
                AiAction::Prioritize,
                "original request",
                "original response",
                metadata(),
                PrivacyLevel::Full,
                &provider(),
                TIMEOUT,
            )
            .await
            .unwrap();

        service
            .verify_proof(&record, "original request", "original response", TIMEOUT)
            .await
            .unwrap();

        let result = service
            .verify_proof(&record, "altered request", "original response", TIMEOUT)
            .await;
        assert!(matches!(result, Err(TaskmintError::TamperDetected { .. })));
    }

    #[tokio::test]
    async fn revoked_proof_no_longer_verifies() {
        let (service, _ledger) = service();
        let record = service
            .create_verification(
                AiAction::Suggest,
                "req",
                "resp",
                metadata(),
                PrivacyLevel::HashOnly,
                &provider(),
                TIMEOUT,
            )
            .await
            .unwrap();

        service.revoke(&record, TIMEOUT).await.unwrap();
        let result = service.verify_proof(&record, "req", "resp", TIMEOUT).await;
        assert!(matches!(result, Err(TaskmintError::TamperDetected { .. })));
    }

    #[tokio::test]
    async fn slow_ledger_times_out() {
        let ledger = Arc::new(MockLedger::new());
        ledger.respond_after(Duration::from_secs(5)).await;
        let service = VerificationService::new(ledger, VerificationConfig::default());

        let result = service
            .create_verification(
                AiAction::Summarize,
                "req",
                "resp",
                metadata(),
                PrivacyLevel::HashOnly,
                &provider(),
                Duration::from_millis(20),
            )
            .await;
        assert!(matches!(result, Err(TaskmintError::Timeout { .. })));
    }

    #[tokio::test]
    async fn redacted_retention_truncates() {
        let ledger = Arc::new(MockLedger::new());
        let config = VerificationConfig {
            redacted_summary_chars: 5,
            ..Default::default()
        };
        let service = VerificationService::new(ledger, config);

        let record = service
            .create_verification(
                AiAction::Categorize,
                "a very long request body",
                "resp!",
                metadata(),
                PrivacyLevel::Redacted,
                &provider(),
                TIMEOUT,
            )
            .await
            .unwrap();

        match record.content {
            RetainedContent::Redacted {
                request_summary,
                response_summary,
            } => {
                assert_eq!(request_summary, "a ver…");
                assert_eq!(response_summary, "resp!");
            }
            other => panic!("expected redacted retention, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ledger_failure_surfaces_without_retry() {
        let (service, ledger) = service();
        ledger.fail_next().await;

        let result = service
            .create_verification(
                AiAction::Summarize,
                "req",
                "resp",
                metadata(),
                PrivacyLevel::HashOnly,
                &provider(),
                TIMEOUT,
            )
            .await;
        assert!(matches!(result, Err(TaskmintError::Ledger { .. })));
        // No retry happened: nothing was anchored.
        assert_eq!(ledger.anchored_count().await, 0);
    }
}
