// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger adapter trait for anchoring verification proofs.

use async_trait::async_trait;

use crate::error::TaskmintError;
use crate::types::ProviderId;

/// A proof as anchored on the external ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerProof {
    /// Ledger-assigned handle for the anchored proof.
    pub proof_id: String,
    /// Hex digest the ledger anchored.
    pub digest: String,
}

/// Current status of an anchored proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofStatus {
    /// Proof is anchored and its digest matches.
    Valid,
    /// Proof was explicitly revoked.
    Revoked,
    /// Ledger has no record of the proof.
    Unknown,
}

/// Adapter for the external tamper-evident ledger.
///
/// The ledger itself is out of scope; this trait is the seam between the
/// verification service and whatever anchors proofs. Implementations do
/// not retry internally and must honor caller-supplied timeouts.
#[async_trait]
pub trait LedgerAdapter: Send + Sync {
    /// Check whether a credential proof for the provider is anchored.
    async fn verify_credential(&self, provider: &ProviderId) -> Result<bool, TaskmintError>;

    /// Look up the current status of an anchored proof.
    async fn check_verification_status(&self, proof_id: &str)
        -> Result<ProofStatus, TaskmintError>;

    /// Anchor a digest for the provider and return the resulting proof.
    async fn generate_credential_proof(
        &self,
        provider: &ProviderId,
        digest: &str,
    ) -> Result<LedgerProof, TaskmintError>;

    /// Revoke an anchored proof.
    async fn revoke_verification(&self, proof_id: &str) -> Result<(), TaskmintError>;
}
