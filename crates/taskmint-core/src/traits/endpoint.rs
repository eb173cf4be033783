// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote credential validation endpoint trait.

use async_trait::async_trait;

use crate::error::TaskmintError;
use crate::types::ProviderId;

/// Adapter for the external endpoint that checks whether a secret is
/// currently accepted by its provider.
///
/// This layer must not introduce deliberate response-latency differences
/// between valid and invalid secrets; any local comparison against stored
/// material uses constant-time equality.
#[async_trait]
pub trait CredentialEndpoint: Send + Sync {
    /// Returns whether the provider currently accepts the secret.
    async fn validate(&self, provider: &ProviderId, secret: &str) -> Result<bool, TaskmintError>;
}
