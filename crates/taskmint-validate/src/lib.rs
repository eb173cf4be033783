// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative validation and defensive sanitization for the Taskmint
//! security layer.
//!
//! - [`rules`]: composable validation rules with fail-fast or collect-all
//!   reporting, canned rules, and JSON-object schema application.
//! - [`sanitize`]: the order-sensitive string sanitization pipeline.
//! - [`flags`]: command-flag presence/exclusivity and environment checks.

pub mod flags;
pub mod rules;
pub mod sanitize;

pub use flags::{validate_command_flags, validate_environment};
pub use rules::{
    combine_rules, conditional_rule, date_rule, email_rule, one_of_rule, validate,
    validate_object, wallet_address_rule, ErrorMode, FieldError, Rule, Schema, ValidationErrors,
};
pub use sanitize::{sanitize_optional, sanitize_string};
