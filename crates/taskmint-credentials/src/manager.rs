// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential business rules atop the encrypted store.
//!
//! Validation, usage tracking, environment fallback, rotation, and expiry.
//! Usage-counter updates are read-modify-write with last-write-wins across
//! processes; rotation and deletion hold an in-process per-provider lock so
//! concurrent sequences in one process cannot lose updates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use taskmint_core::{
    AuditEvent, AuditEventType, AuditSink, CredentialEndpoint, CredentialType, PermissionLevel,
    ProviderId, TaskmintError,
};
use taskmint_vault::{crypto, CredentialRecord, CredentialStore};

/// Optional metadata supplied when saving a credential.
#[derive(Debug, Clone, Default)]
pub struct CredentialExtra {
    pub credential_type: Option<CredentialType>,
    pub permission_level: Option<PermissionLevel>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Business rules atop [`CredentialStore`].
pub struct CredentialManager {
    store: CredentialStore,
    audit: Arc<dyn AuditSink>,
    /// Per-provider guards for rotate/delete sequences.
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl CredentialManager {
    pub fn new(store: CredentialStore, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            store,
            audit,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Persist a fresh credential record for `provider`.
    ///
    /// The record starts with `usage_count = 0` and `created_at = last_used
    /// = now`. Requesting the ADMIN tier through this path is an escalation
    /// attempt and is rejected.
    pub async fn save_credentials(
        &self,
        provider: &str,
        secret: SecretString,
        extra: Option<CredentialExtra>,
    ) -> Result<(), TaskmintError> {
        let provider = ProviderId::new(provider)?;
        if secret.expose_secret().is_empty() {
            return Err(TaskmintError::EmptySecret);
        }

        let mut record = CredentialRecord::new(provider.clone(), secret);
        if let Some(extra) = extra {
            if extra.permission_level == Some(PermissionLevel::Admin) {
                return Err(TaskmintError::PermissionEscalation {
                    provider: provider.to_string(),
                });
            }
            if let Some(credential_type) = extra.credential_type {
                record.credential_type = credential_type;
            }
            if let Some(level) = extra.permission_level {
                record.permission_level = level;
            }
            record.expires_at = extra.expires_at;
        }

        self.store
            .save(&record)
            .await
            .map_err(|e| TaskmintError::SaveFailed {
                provider: provider.to_string(),
                source: Box::new(e),
            })?;

        self.audit
            .record(AuditEvent::now(
                AuditEventType::CredentialSaved,
                Some(provider.clone()),
                format!("credential_type={}", record.credential_type),
            ))
            .await?;
        debug!(provider = %provider, "credentials saved");
        Ok(())
    }

    /// Load the record for `provider`, updating its usage statistics.
    ///
    /// An expired record behaves identically to an absent one.
    pub async fn get_credentials(&self, provider: &str) -> Result<CredentialRecord, TaskmintError> {
        let provider = ProviderId::new(provider)?;
        let mut record = match self.store.load(&provider).await {
            Ok(record) => record,
            Err(e @ TaskmintError::NotFound { .. }) => return Err(e),
            Err(e) => {
                return Err(TaskmintError::RetrieveFailed {
                    provider: provider.to_string(),
                    source: Box::new(e),
                })
            }
        };

        if record.is_expired(Utc::now()) {
            debug!(provider = %provider, "record expired, treating as absent");
            return Err(TaskmintError::NotFound {
                provider: provider.to_string(),
            });
        }

        record.usage_count += 1;
        record.last_used = Utc::now();
        self.store
            .save(&record)
            .await
            .map_err(|e| TaskmintError::RetrieveFailed {
                provider: provider.to_string(),
                source: Box::new(e),
            })?;

        self.audit
            .record(AuditEvent::now(
                AuditEventType::CredentialAccessed,
                Some(provider),
                format!("usage_count={}", record.usage_count),
            ))
            .await?;
        Ok(record)
    }

    /// Resolve a secret for `provider`, preferring the `${PROVIDER}_API_KEY`
    /// environment variable over the encrypted store.
    pub async fn get_credential_with_env_fallback(
        &self,
        provider: &str,
    ) -> Result<SecretString, TaskmintError> {
        let id = ProviderId::new(provider)?;
        if let Ok(value) = std::env::var(id.env_var()) {
            if !value.is_empty() {
                debug!(provider = %id, "credential resolved from environment");
                return Ok(SecretString::from(value));
            }
        }
        let record = self.get_credentials(provider).await?;
        Ok(record.secret)
    }

    /// Look up several providers at once, isolating per-item failures.
    pub async fn get_credentials_batch(
        &self,
        providers: &[&str],
    ) -> Vec<(String, Result<CredentialRecord, TaskmintError>)> {
        let mut results = Vec::with_capacity(providers.len());
        for provider in providers {
            let result = self.get_credentials(provider).await;
            results.push((provider.to_string(), result));
        }
        results
    }

    /// Remove credentials for `provider`, reporting whether any existed.
    pub async fn delete_credentials(&self, provider: &str) -> Result<bool, TaskmintError> {
        let provider = ProviderId::new(provider)?;
        let guard = self.provider_lock(&provider);
        let _held = guard.lock().await;

        let existed = self
            .store
            .delete(&provider)
            .await
            .map_err(|e| TaskmintError::DeleteFailed {
                provider: provider.to_string(),
                source: Box::new(e),
            })?;

        if existed {
            self.audit
                .record(AuditEvent::now(
                    AuditEventType::CredentialDeleted,
                    Some(provider),
                    "record removed",
                ))
                .await?;
        }
        Ok(existed)
    }

    /// Known provider ids. A missing or unparsable store index yields an
    /// empty list rather than an error.
    pub async fn list_providers(&self) -> Vec<ProviderId> {
        match self.store.list().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "provider index unreadable, returning empty list");
                Vec::new()
            }
        }
    }

    /// Replace the secret for `provider`, keeping the prior secret as
    /// `previous_key` and resetting usage statistics.
    ///
    /// An expired record behaves identically to an absent one.
    pub async fn rotate_credentials(
        &self,
        provider: &str,
        new_secret: SecretString,
    ) -> Result<(), TaskmintError> {
        let provider = ProviderId::new(provider)?;
        if new_secret.expose_secret().is_empty() {
            return Err(TaskmintError::EmptySecret);
        }

        let guard = self.provider_lock(&provider);
        let _held = guard.lock().await;

        let existing = self.store.load(&provider).await?;
        if existing.is_expired(Utc::now()) {
            debug!(provider = %provider, "record expired, treating as absent");
            return Err(TaskmintError::NotFound {
                provider: provider.to_string(),
            });
        }

        let now = Utc::now();
        let rotated = CredentialRecord {
            provider: provider.clone(),
            secret: new_secret,
            credential_type: existing.credential_type,
            permission_level: existing.permission_level,
            created_at: existing.created_at,
            last_used: now,
            usage_count: 0,
            expires_at: existing.expires_at,
            previous_key: Some(existing.secret),
            rotated_at: Some(now),
            // Any anchored proof covered the old secret.
            verification_proof: None,
        };

        self.store
            .save(&rotated)
            .await
            .map_err(|e| TaskmintError::SaveFailed {
                provider: provider.to_string(),
                source: Box::new(e),
            })?;

        self.audit
            .record(AuditEvent::now(
                AuditEventType::CredentialRotated,
                Some(provider.clone()),
                "secret rotated, usage reset",
            ))
            .await?;
        debug!(provider = %provider, "credentials rotated");
        Ok(())
    }

    /// Compare a re-presented secret against the stored one in constant
    /// time. Callers gate destructive flows (rotation, deletion) on this
    /// without ever reading the stored value out.
    ///
    /// Expired or absent records are `NotFound`; the usage counter is not
    /// touched.
    pub async fn verify_stored_secret(
        &self,
        provider: &str,
        candidate: &str,
    ) -> Result<bool, TaskmintError> {
        let provider = ProviderId::new(provider)?;
        let record = self.store.load(&provider).await?;
        if record.is_expired(Utc::now()) {
            return Err(TaskmintError::NotFound {
                provider: provider.to_string(),
            });
        }
        Ok(crypto::secrets_equal(
            record.secret.expose_secret().as_bytes(),
            candidate.as_bytes(),
        ))
    }

    /// Check a secret against the external validation endpoint, bounded by
    /// a caller-supplied timeout.
    ///
    /// This layer introduces no deliberate latency difference between valid
    /// and invalid secrets; the endpoint's answer is returned as-is.
    pub async fn validate_credentials(
        &self,
        provider: &str,
        secret: &str,
        endpoint: &dyn CredentialEndpoint,
        timeout: Duration,
    ) -> Result<bool, TaskmintError> {
        let provider = ProviderId::new(provider)?;
        if secret.is_empty() {
            return Err(TaskmintError::EmptySecret);
        }
        match tokio::time::timeout(timeout, endpoint.validate(&provider, secret)).await {
            Ok(result) => result,
            Err(_) => Err(TaskmintError::Timeout { duration: timeout }),
        }
    }

    fn provider_lock(&self, provider: &ProviderId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(provider.as_str().to_string())
            .or_default()
            .clone()
    }
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
