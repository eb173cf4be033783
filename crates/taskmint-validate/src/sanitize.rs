// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Defensive string sanitization.
//!
//! The pipeline is order-sensitive: control characters are stripped before
//! tag removal so split tags cannot survive, and shell metacharacters are
//! escaped before whitespace collapsing so the collapse cannot merge an
//! escape with its target.

use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static ESCAPED_WS_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\\ )+").unwrap());

/// Characters that carry meaning to a shell and must be escaped.
const SHELL_META: &[char] = &[
    ';', '&', '|', '`', '$', '(', ')', '<', '>', '\\', '"', '\'', '*', '?', '~', '#', '[', ']',
    '{', '}', '!',
];

/// Sanitize untrusted input for safe display and downstream command use.
///
/// Steps, in order:
/// 1. strip control characters;
/// 2. remove HTML-tag markup;
/// 3. backslash-escape shell metacharacters and whitespace;
/// 4. collapse repeated whitespace.
///
/// Empty input returns an empty string; this function never fails.
pub fn sanitize_string(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    // 1. Control characters (including newlines and tabs) are dropped.
    let stripped: String = input.chars().filter(|c| !c.is_control()).collect();

    // 2. Tag markup is removed outright rather than entity-encoded.
    let untagged = HTML_TAG_RE.replace_all(&stripped, "");

    // 3. Escape shell metacharacters; whitespace becomes an escaped space.
    let mut escaped = String::with_capacity(untagged.len() * 2);
    for c in untagged.chars() {
        if c.is_whitespace() {
            escaped.push('\\');
            escaped.push(' ');
        } else if SHELL_META.contains(&c) {
            escaped.push('\\');
            escaped.push(c);
        } else {
            escaped.push(c);
        }
    }

    // 4. Runs of escaped whitespace collapse to a single escaped space.
    ESCAPED_WS_RUN_RE.replace_all(&escaped, r"\ ").into_owned()
}

/// [`sanitize_string`] over an optional input; absent input is empty.
pub fn sanitize_optional(input: Option<&str>) -> String {
    input.map(sanitize_string).unwrap_or_default()
}
