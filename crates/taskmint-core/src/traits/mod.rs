// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! One trait per external collaborator, each with a single production
//! implementation elsewhere and test doubles in `taskmint-test-utils`.
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod audit;
pub mod endpoint;
pub mod ledger;

pub use audit::{AuditSink, TracingAuditSink};
pub use endpoint::CredentialEndpoint;
pub use ledger::LedgerAdapter;
