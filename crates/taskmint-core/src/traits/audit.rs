// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit sink trait and the tracing-backed production sink.

use async_trait::async_trait;

use crate::error::TaskmintError;
use crate::types::AuditEvent;

/// Append-only sink for security-relevant events.
///
/// Every permission change and credential access is recorded. Sinks must
/// never be the reason an operation fails silently: record errors surface
/// to the caller.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one event to the sink.
    async fn record(&self, event: AuditEvent) -> Result<(), TaskmintError>;
}

/// Production sink that emits structured `tracing` events.
///
/// Detail strings are composed by callers and never contain secret values,
/// so they are safe to log verbatim.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), TaskmintError> {
        tracing::info!(
            target: "taskmint::audit",
            event_type = %event.event_type,
            provider = event.provider.as_ref().map(|p| p.as_str()),
            timestamp = %event.timestamp.to_rfc3339(),
            details = %event.details,
            "audit event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuditEventType, ProviderId};

    #[tokio::test]
    async fn tracing_sink_accepts_events() {
        let sink = TracingAuditSink;
        let event = AuditEvent::now(
            AuditEventType::CredentialAccessed,
            Some(ProviderId::new("openai").unwrap()),
            "usage_count=1",
        );
        sink.record(event).await.unwrap();
    }
}
