// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-flag and environment validation.
//!
//! Flag maps come from whatever parsed the command line; this module only
//! checks presence and mutual exclusion. A flag explicitly set to `false`
//! counts as present; only an absent key is missing.

use std::collections::HashMap;

use serde_json::Value;

use crate::rules::{FieldError, ValidationErrors};

/// Validate required flags and exclusivity groups.
///
/// Fails with code `missing_flags` listing every absent required key, or
/// `conflicting_flags` when two or more flags in one exclusivity group are
/// truthy at the same time. Both kinds of failure are reported together.
pub fn validate_command_flags(
    flags: &HashMap<String, Value>,
    required: &[&str],
    exclusive_groups: &[&[&str]],
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    let missing: Vec<&str> = required
        .iter()
        .filter(|key| !flags.contains_key(**key))
        .copied()
        .collect();
    if !missing.is_empty() {
        errors.push(FieldError {
            field: "flags".to_string(),
            code: "missing_flags".to_string(),
            message: format!("missing required flags: {}", missing.join(", ")),
        });
    }

    for group in exclusive_groups {
        let truthy: Vec<&str> = group
            .iter()
            .filter(|key| flags.get(**key).is_some_and(is_truthy))
            .copied()
            .collect();
        if truthy.len() >= 2 {
            errors.push(FieldError {
                field: "flags".to_string(),
                code: "conflicting_flags".to_string(),
                message: format!("mutually exclusive flags set together: {}", truthy.join(", ")),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

/// Validate that every required environment variable is set, returning the
/// resolved environment with `defaults` merged in for keys the environment
/// does not define.
///
/// Fails with code `missing_env_vars` listing all missing required keys.
pub fn validate_environment(
    required: &[&str],
    defaults: &HashMap<String, String>,
) -> Result<HashMap<String, String>, ValidationErrors> {
    let mut resolved = HashMap::new();
    let mut missing = Vec::new();

    for key in required {
        match std::env::var(key) {
            Ok(value) => {
                resolved.insert(key.to_string(), value);
            }
            Err(_) => missing.push(*key),
        }
    }

    for (key, fallback) in defaults {
        match std::env::var(key) {
            Ok(value) => {
                resolved.insert(key.clone(), value);
            }
            // Defaults apply only to keys absent from the environment.
            Err(_) => {
                resolved.insert(key.clone(), fallback.clone());
            }
        }
    }

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(ValidationErrors {
            errors: vec![FieldError {
                field: "environment".to_string(),
                code: "missing_env_vars".to_string(),
                message: format!("missing environment variables: {}", missing.join(", ")),
            }],
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flags(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn false_counts_as_present() {
        let flags = flags(&[("verbose", json!(false))]);
        assert!(validate_command_flags(&flags, &["verbose"], &[]).is_ok());
    }

    #[test]
    fn all_missing_required_flags_are_listed() {
        let flags = flags(&[("other", json!(true))]);
        let err = validate_command_flags(&flags, &["network", "wallet"], &[]).unwrap_err();
        assert_eq!(err.errors[0].code, "missing_flags");
        assert!(err.errors[0].message.contains("network"));
        assert!(err.errors[0].message.contains("wallet"));
    }

    #[test]
    fn exclusive_group_rejects_two_truthy() {
        let both = flags(&[("verbose", json!(true)), ("quiet", json!(true))]);
        let err = validate_command_flags(&both, &[], &[&["verbose", "quiet"]]).unwrap_err();
        assert_eq!(err.errors[0].code, "conflicting_flags");

        let one = flags(&[("verbose", json!(true))]);
        assert!(validate_command_flags(&one, &[], &[&["verbose", "quiet"]]).is_ok());
    }

    #[test]
    fn falsy_flags_do_not_conflict() {
        let flags = flags(&[("verbose", json!(true)), ("quiet", json!(false))]);
        assert!(validate_command_flags(&flags, &[], &[&["verbose", "quiet"]]).is_ok());
    }

    #[test]
    fn missing_and_conflicting_report_together() {
        let flags = flags(&[("json", json!(true)), ("plain", json!("yes"))]);
        let err =
            validate_command_flags(&flags, &["output"], &[&["json", "plain"]]).unwrap_err();
        assert_eq!(err.errors.len(), 2);
    }

    #[test]
    fn environment_defaults_merge_only_when_absent() {
        // Process-global env: use key names no other test touches.
        unsafe { std::env::set_var("TASKMINT_FLAGS_TEST_SET", "from-env") };
        unsafe { std::env::remove_var("TASKMINT_FLAGS_TEST_UNSET") };

        let defaults: HashMap<String, String> = [
            ("TASKMINT_FLAGS_TEST_SET".to_string(), "default".to_string()),
            ("TASKMINT_FLAGS_TEST_UNSET".to_string(), "default".to_string()),
        ]
        .into();

        let resolved = validate_environment(&[], &defaults).unwrap();
        assert_eq!(resolved["TASKMINT_FLAGS_TEST_SET"], "from-env");
        assert_eq!(resolved["TASKMINT_FLAGS_TEST_UNSET"], "default");

        unsafe { std::env::remove_var("TASKMINT_FLAGS_TEST_SET") };
    }

    #[test]
    fn all_missing_env_vars_are_listed() {
        unsafe { std::env::remove_var("TASKMINT_FLAGS_TEST_A") };
        unsafe { std::env::remove_var("TASKMINT_FLAGS_TEST_B") };

        let err = validate_environment(
            &["TASKMINT_FLAGS_TEST_A", "TASKMINT_FLAGS_TEST_B"],
            &HashMap::new(),
        )
        .unwrap_err();
        assert_eq!(err.errors[0].code, "missing_env_vars");
        assert!(err.errors[0].message.contains("TASKMINT_FLAGS_TEST_A"));
        assert!(err.errors[0].message.contains("TASKMINT_FLAGS_TEST_B"));
    }
}
