// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative validation rule engine.
//!
//! Rules are pure, stateless predicates carrying an error code and message.
//! They compose by AND ([`combine_rules`]) and conditional gating
//! ([`conditional_rule`]), and run either fail-fast or collect-all.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;

use taskmint_core::TaskmintError;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// One or more validation failures, usable as an error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", self.render())]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn render(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {} ({})", e.field, e.message, e.code))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl From<ValidationErrors> for TaskmintError {
    fn from(errors: ValidationErrors) -> Self {
        TaskmintError::Validation(errors.to_string())
    }
}

/// How the engine reports failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Stop at the first failing rule (the default).
    #[default]
    FailFast,
    /// Run every rule and report all failures together.
    CollectAll,
}

/// A pure, stateless validation rule over values of type `T`.
#[derive(Clone)]
pub struct Rule<T: ?Sized> {
    test: Arc<dyn Fn(&T) -> bool + Send + Sync>,
    pub code: String,
    pub message: String,
}

impl<T: ?Sized> Rule<T> {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            test: Arc::new(test),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Apply the predicate.
    pub fn check(&self, value: &T) -> bool {
        (self.test)(value)
    }
}

impl<T: ?Sized> std::fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("code", &self.code).finish_non_exhaustive()
    }
}

/// Logical AND of sub-rules: passes only when every sub-rule passes. The
/// reported code and message come from the first failing sub-rule.
pub fn combine_rules<T: ?Sized + 'static>(rules: Vec<Rule<T>>) -> Rule<T> {
    let codes: Vec<String> = rules.iter().map(|r| r.code.clone()).collect();
    Rule {
        code: format!("all_of({})", codes.join(",")),
        message: "combined rule failed".to_string(),
        test: Arc::new(move |value: &T| rules.iter().all(|rule| rule.check(value))),
    }
}

/// Apply `rule` only when `predicate` holds; otherwise pass vacuously.
pub fn conditional_rule<T: ?Sized + 'static>(
    predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    rule: Rule<T>,
) -> Rule<T> {
    Rule {
        code: rule.code.clone(),
        message: rule.message.clone(),
        test: Arc::new(move |value: &T| !predicate(value) || rule.check(value)),
    }
}

/// Run `rules` against `value` in order.
///
/// In [`ErrorMode::FailFast`] the first failure is returned alone; in
/// [`ErrorMode::CollectAll`] every failure is accumulated. An empty rule
/// list passes any value.
pub fn validate<T: ?Sized>(
    value: &T,
    rules: &[Rule<T>],
    field: &str,
    mode: ErrorMode,
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    for rule in rules {
        if !rule.check(value) {
            errors.push(FieldError {
                field: field.to_string(),
                code: rule.code.clone(),
                message: rule.message.clone(),
            });
            if mode == ErrorMode::FailFast {
                break;
            }
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

/// Per-field rules for [`validate_object`].
pub type Schema = HashMap<String, Vec<Rule<Value>>>;

/// Apply `schema` to the fields of a JSON object.
///
/// Fields present in the data but absent from the schema pass
/// unconditionally. A schema field missing from the data is validated
/// against `Value::Null` so "required" rules can catch it.
pub fn validate_object(
    data: &Value,
    schema: &Schema,
    mode: ErrorMode,
) -> Result<(), ValidationErrors> {
    let object = data.as_object();
    let mut errors = Vec::new();
    for (field, rules) in schema {
        let value = object
            .and_then(|map| map.get(field))
            .unwrap_or(&Value::Null);
        match validate(value, rules, field, mode) {
            Ok(()) => {}
            Err(mut failure) => {
                errors.append(&mut failure.errors);
                if mode == ErrorMode::FailFast {
                    return Err(ValidationErrors { errors });
                }
            }
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static WALLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap());
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Canned rule: RFC-lite email shape.
pub fn email_rule() -> Rule<str> {
    Rule::new("invalid_email", "not a valid email address", |s: &str| {
        EMAIL_RE.is_match(s)
    })
}

/// Canned rule: wallet-style address, `0x` followed by 40 hex characters.
pub fn wallet_address_rule() -> Rule<str> {
    Rule::new("invalid_address", "not a valid wallet address", |s: &str| {
        WALLET_RE.is_match(s)
    })
}

/// Canned rule: value is one of an enumerated set (todo priorities, chain
/// networks, storage locations).
pub fn one_of_rule(code: impl Into<String>, allowed: &'static [&'static str]) -> Rule<str> {
    Rule::new(code, format!("expected one of: {}", allowed.join(", ")), move |s: &str| {
        allowed.contains(&s)
    })
}

/// Canned rule: zero-padded `YYYY-MM-DD` date.
pub fn date_rule() -> Rule<str> {
    Rule::new("invalid_date", "expected zero-padded YYYY-MM-DD", |s: &str| {
        DATE_RE.is_match(s)
    })
}
