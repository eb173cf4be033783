// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level assembly of the Taskmint security layer.
//!
//! Hosts embedding Taskmint construct one [`SecurityContext`] per process
//! and inject it wherever credentials, permissions, threat scanning, or
//! verification are needed. There is no global state: every component is
//! owned by the context and test processes can hold several contexts side
//! by side without interference.

use std::path::Path;
use std::sync::Arc;

use taskmint_config::TaskmintConfig;
use taskmint_core::error::TaskmintError;
use taskmint_core::traits::{AuditSink, LedgerAdapter};
use taskmint_credentials::CredentialManager;
use taskmint_policy::PermissionManager;
use taskmint_threat::ThreatDetector;
use taskmint_vault::CredentialStore;
use taskmint_verify::VerificationService;
use tracing::info;

pub use taskmint_core::error::TaskmintError as Error;
pub use taskmint_validate as validation;
pub use taskmint_core::types::{
    AiAction, CredentialType, PermissionLevel, PrivacyLevel, ProviderId, ThreatCategory,
};

/// One process-wide security context.
///
/// Owns the credential manager, permission manager, threat detector, and
/// verification service, wired to a shared audit sink and an injected
/// ledger adapter.
pub struct SecurityContext {
    credentials: CredentialManager,
    permissions: PermissionManager,
    threat: ThreatDetector,
    verification: VerificationService,
}

impl SecurityContext {
    /// Initialize all components from `config`, opening (or creating) the
    /// credential store in its configured data directory.
    pub fn init(
        config: &TaskmintConfig,
        ledger: Arc<dyn LedgerAdapter>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, TaskmintError> {
        let store = CredentialStore::open(&config.vault)?;
        Ok(Self::assemble(config, store, ledger, audit))
    }

    /// Like [`SecurityContext::init`] but with an explicit store directory,
    /// overriding `vault.data_dir`. Used by tests and one-off tools.
    pub fn init_at(
        dir: &Path,
        config: &TaskmintConfig,
        ledger: Arc<dyn LedgerAdapter>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, TaskmintError> {
        let store = CredentialStore::open_at(dir, &config.vault)?;
        Ok(Self::assemble(config, store, ledger, audit))
    }

    fn assemble(
        config: &TaskmintConfig,
        store: CredentialStore,
        ledger: Arc<dyn LedgerAdapter>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let context = Self {
            credentials: CredentialManager::new(store, Arc::clone(&audit)),
            permissions: PermissionManager::new(config.permissions.clone(), audit),
            threat: ThreatDetector::new(&config.security),
            verification: VerificationService::new(ledger, config.verification.clone()),
        };
        info!("security context initialized");
        context
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    pub fn permissions(&self) -> &PermissionManager {
        &self.permissions
    }

    pub fn threat(&self) -> &ThreatDetector {
        &self.threat
    }

    pub fn verification(&self) -> &VerificationService {
        &self.verification
    }

    /// Tear the context down. Components hold no background tasks or open
    /// handles beyond the store's files, so this only marks the lifecycle
    /// boundary in the logs.
    pub fn shutdown(self) {
        info!("security context shut down");
    }
}
