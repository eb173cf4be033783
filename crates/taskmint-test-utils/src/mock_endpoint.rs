// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock credential validation endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskmint_core::{CredentialEndpoint, ProviderId, TaskmintError};

/// A validation endpoint that accepts pre-registered `(provider, secret)`
/// pairs and rejects everything else.
pub struct MockEndpoint {
    accepted: Arc<Mutex<HashMap<String, String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockEndpoint {
    pub fn new() -> Self {
        Self {
            accepted: Arc::new(Mutex::new(HashMap::new())),
            delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Register a secret the endpoint will accept for `provider`.
    pub async fn accept(&self, provider: &str, secret: &str) {
        self.accepted
            .lock()
            .await
            .insert(provider.to_string(), secret.to_string());
    }

    /// Delay every answer by `duration` (for timeout tests).
    pub async fn respond_after(&self, duration: Duration) {
        *self.delay.lock().await = Some(duration);
    }
}

impl Default for MockEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialEndpoint for MockEndpoint {
    async fn validate(&self, provider: &ProviderId, secret: &str) -> Result<bool, TaskmintError> {
        if let Some(delay) = *self.delay.lock().await {
            tokio::time::sleep(delay).await;
        }
        let accepted = self.accepted.lock().await;
        Ok(accepted.get(provider.as_str()).is_some_and(|s| s == secret))
    }
}
