// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tamper-evident verification records for AI operations.
//!
//! Request/response content is hashed with SHA-256, retained according to
//! the privacy level, and anchored on an external ledger through the
//! [`taskmint_core::LedgerAdapter`] seam.

pub mod record;
pub mod service;

pub use record::{RetainedContent, VerificationMetadata, VerificationRecord};
pub use service::{content_hash, VerificationService};
