// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Taskmint integration tests.
//!
//! Provides test doubles behind the production collaborator traits for
//! fast, deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockLedger`] - In-memory ledger adapter with fault/latency injection
//! - [`MockEndpoint`] - Credential validation endpoint with registered pairs
//! - [`CaptureAuditSink`] - Audit sink that records events for assertions

pub mod capture_audit;
pub mod mock_endpoint;
pub mod mock_ledger;

pub use capture_audit::CaptureAuditSink;
pub use mock_endpoint::MockEndpoint;
pub use mock_ledger::MockLedger;
