// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operation authorization against a provider's permission tier.
//!
//! Unknown providers are denied, every permission change and denial is
//! audited, and the ADMIN tier is unreachable through the update path.
//! ADMIN exists only for the process-init bootstrap seam.

use std::collections::HashMap;
use std::sync::Arc;

use strum::Display;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use taskmint_config::PermissionsConfig;
use taskmint_core::{AuditEvent, AuditEventType, AuditSink, PermissionLevel, ProviderId, TaskmintError};

/// Operations subject to permission checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    GetCredentials,
    ListProviders,
    SaveCredentials,
    UpdatePermissions,
    RotateCredentials,
    DeleteCredentials,
    CreateVerification,
}

impl Operation {
    /// Which configured minimum applies to this operation.
    fn minimum(self, config: &PermissionsConfig) -> PermissionLevel {
        match self {
            Operation::GetCredentials | Operation::ListProviders => config.read,
            Operation::SaveCredentials
            | Operation::UpdatePermissions
            | Operation::CreateVerification => config.write,
            Operation::RotateCredentials | Operation::DeleteCredentials => config.rotate,
        }
    }
}

/// Authorizes operations against per-provider permission tiers.
pub struct PermissionManager {
    levels: RwLock<HashMap<String, PermissionLevel>>,
    config: PermissionsConfig,
    audit: Arc<dyn AuditSink>,
}

impl PermissionManager {
    pub fn new(config: PermissionsConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            levels: RwLock::new(HashMap::new()),
            config,
            audit,
        }
    }

    /// Whether `provider` may perform `operation`. Unknown providers are
    /// denied.
    pub async fn check_permission(&self, provider: &ProviderId, operation: Operation) -> bool {
        let levels = self.levels.read().await;
        match levels.get(provider.as_str()) {
            Some(level) => *level >= operation.minimum(&self.config),
            None => false,
        }
    }

    /// Like [`check_permission`](Self::check_permission) but failing with
    /// [`TaskmintError::PermissionDenied`], with the denial audited.
    pub async fn verify_operation_permission(
        &self,
        provider: &ProviderId,
        operation: Operation,
    ) -> Result<(), TaskmintError> {
        if self.check_permission(provider, operation).await {
            return Ok(());
        }
        warn!(provider = %provider, operation = %operation, "operation denied");
        self.audit
            .record(AuditEvent::now(
                AuditEventType::PermissionDenied,
                Some(provider.clone()),
                format!("operation={operation}"),
            ))
            .await?;
        Err(TaskmintError::PermissionDenied {
            operation: operation.to_string(),
        })
    }

    /// Assign a new tier to `provider`.
    ///
    /// ADMIN is rejected unconditionally; it is reachable only through
    /// [`bootstrap_admin`](Self::bootstrap_admin) at process init.
    pub async fn update_permissions(
        &self,
        provider: &ProviderId,
        new_level: PermissionLevel,
    ) -> Result<(), TaskmintError> {
        if new_level == PermissionLevel::Admin {
            warn!(provider = %provider, "blocked attempt to assign admin tier");
            self.audit
                .record(AuditEvent::now(
                    AuditEventType::EscalationBlocked,
                    Some(provider.clone()),
                    "update_permissions attempted admin",
                ))
                .await?;
            return Err(TaskmintError::PermissionEscalation {
                provider: provider.to_string(),
            });
        }

        self.levels
            .write()
            .await
            .insert(provider.as_str().to_string(), new_level);
        self.audit
            .record(AuditEvent::now(
                AuditEventType::PermissionChanged,
                Some(provider.clone()),
                format!("new_level={new_level}"),
            ))
            .await?;
        debug!(provider = %provider, level = %new_level, "permissions updated");
        Ok(())
    }

    /// Out-of-band ADMIN bootstrap.
    ///
    /// Intended to be called exactly once during process initialization for
    /// the operator identity; it is deliberately separate from
    /// [`update_permissions`](Self::update_permissions) and never wired to
    /// request-driven paths.
    pub async fn bootstrap_admin(&self, provider: &ProviderId) -> Result<(), TaskmintError> {
        self.levels
            .write()
            .await
            .insert(provider.as_str().to_string(), PermissionLevel::Admin);
        self.audit
            .record(AuditEvent::now(
                AuditEventType::PermissionChanged,
                Some(provider.clone()),
                "admin bootstrap at process init",
            ))
            .await
    }

    /// The tier currently granted to `provider`, if any.
    pub async fn level_of(&self, provider: &ProviderId) -> Option<PermissionLevel> {
        self.levels.read().await.get(provider.as_str()).copied()
    }
}

impl std::fmt::Debug for PermissionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
