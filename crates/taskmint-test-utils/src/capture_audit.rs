// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capturing audit sink for asserting on emitted events.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskmint_core::{AuditEvent, AuditEventType, AuditSink, TaskmintError};

/// An audit sink that appends every event to an in-memory log.
#[derive(Default)]
pub struct CaptureAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl CaptureAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in order.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }

    /// Number of events with the given type.
    pub async fn count_of(&self, event_type: AuditEventType) -> usize {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }
}

#[async_trait]
impl AuditSink for CaptureAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), TaskmintError> {
        self.events.lock().await.push(event);
        Ok(())
    }
}
