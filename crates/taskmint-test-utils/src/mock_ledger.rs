// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock ledger adapter for deterministic testing.
//!
//! `MockLedger` implements [`LedgerAdapter`] with an in-memory proof table,
//! enabling fast, CI-runnable tests without an external ledger.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskmint_core::traits::ledger::{LedgerAdapter, LedgerProof, ProofStatus};
use taskmint_core::{ProviderId, TaskmintError};

/// An in-memory ledger that anchors proofs into a table.
///
/// Supports fault injection (`fail_next`) and artificial latency
/// (`respond_after`) so callers can exercise error and timeout paths.
pub struct MockLedger {
    proofs: Arc<Mutex<HashMap<String, (String, ProofStatus)>>>,
    fail_next: Arc<Mutex<bool>>,
    delay: Arc<Mutex<Option<Duration>>>,
    counter: Arc<Mutex<u64>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            proofs: Arc::new(Mutex::new(HashMap::new())),
            fail_next: Arc::new(Mutex::new(false)),
            delay: Arc::new(Mutex::new(None)),
            counter: Arc::new(Mutex::new(0)),
        }
    }

    /// Make the next call fail with a ledger error.
    pub async fn fail_next(&self) {
        *self.fail_next.lock().await = true;
    }

    /// Delay every subsequent call by `duration` before answering.
    pub async fn respond_after(&self, duration: Duration) {
        *self.delay.lock().await = Some(duration);
    }

    /// Number of proofs currently anchored.
    pub async fn anchored_count(&self) -> usize {
        self.proofs.lock().await.len()
    }

    async fn simulate(&self) -> Result<(), TaskmintError> {
        if let Some(delay) = *self.delay.lock().await {
            tokio::time::sleep(delay).await;
        }
        let mut fail = self.fail_next.lock().await;
        if *fail {
            *fail = false;
            return Err(TaskmintError::Ledger {
                message: "injected ledger failure".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerAdapter for MockLedger {
    async fn verify_credential(&self, provider: &ProviderId) -> Result<bool, TaskmintError> {
        self.simulate().await?;
        let proofs = self.proofs.lock().await;
        Ok(proofs.values().any(|(p, status)| p == provider.as_str() && *status == ProofStatus::Valid))
    }

    async fn check_verification_status(
        &self,
        proof_id: &str,
    ) -> Result<ProofStatus, TaskmintError> {
        self.simulate().await?;
        let proofs = self.proofs.lock().await;
        Ok(proofs
            .get(proof_id)
            .map(|(_, status)| status.clone())
            .unwrap_or(ProofStatus::Unknown))
    }

    async fn generate_credential_proof(
        &self,
        provider: &ProviderId,
        digest: &str,
    ) -> Result<LedgerProof, TaskmintError> {
        self.simulate().await?;
        let mut counter = self.counter.lock().await;
        *counter += 1;
        let proof_id = format!("proof-{:04}", *counter);
        drop(counter);

        self.proofs.lock().await.insert(
            proof_id.clone(),
            (provider.as_str().to_string(), ProofStatus::Valid),
        );
        Ok(LedgerProof {
            proof_id,
            digest: digest.to_string(),
        })
    }

    async fn revoke_verification(&self, proof_id: &str) -> Result<(), TaskmintError> {
        self.simulate().await?;
        let mut proofs = self.proofs.lock().await;
        match proofs.get_mut(proof_id) {
            Some((_, status)) => {
                *status = ProofStatus::Revoked;
                Ok(())
            }
            None => Err(TaskmintError::Ledger {
                message: format!("unknown proof id: {proof_id}"),
                source: None,
            }),
        }
    }
}
