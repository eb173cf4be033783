// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Taskmint security layer.
//!
//! This crate provides the error taxonomy, shared types, and collaborator
//! trait definitions used throughout the Taskmint workspace. The concrete
//! components (vault, credential manager, policy, validation, threat
//! detection, verification) live in sibling crates and depend on this one.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TaskmintError;
pub use traits::{AuditSink, CredentialEndpoint, LedgerAdapter, TracingAuditSink};
pub use types::{
    AiAction, AuditEvent, AuditEventType, CredentialType, PermissionLevel, PrivacyLevel,
    ProviderId, ThreatCategory,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_traits_are_object_safe() {
        // Each collaborator must be usable behind a dyn pointer so one
        // production impl and one test double can share call sites.
        fn _ledger(_: &dyn LedgerAdapter) {}
        fn _endpoint(_: &dyn CredentialEndpoint) {}
        fn _audit(_: &dyn AuditSink) {}
    }

    #[test]
    fn permission_level_never_defaults_to_admin() {
        // There is intentionally no Default impl for PermissionLevel;
        // callers must pick a tier explicitly. Admin stays out of every
        // serialized update path (see taskmint-policy).
        let levels = [
            PermissionLevel::ReadOnly,
            PermissionLevel::Restricted,
            PermissionLevel::Standard,
            PermissionLevel::Full,
            PermissionLevel::Admin,
        ];
        assert_eq!(levels.iter().max().unwrap(), &PermissionLevel::Admin);
    }
}
