// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Taskmint security layer.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup with actionable error messages.

use serde::{Deserialize, Serialize};
use taskmint_core::PermissionLevel;

/// Top-level Taskmint configuration.
///
/// Loaded from TOML files with environment variable overrides. All sections
/// are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaskmintConfig {
    /// Encrypted credential store settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Threat scanning and payload limits.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Operation permission minimums.
    #[serde(default)]
    pub permissions: PermissionsConfig,

    /// Verification record settings.
    #[serde(default)]
    pub verification: VerificationConfig,
}

/// Encrypted credential store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Directory holding the store document and master key file.
    /// Defaults to `~/.local/share/taskmint` (XDG data dir) when empty.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// File name of the store document inside `data_dir`.
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// File name of the master key inside `data_dir`.
    #[serde(default = "default_key_file")]
    pub key_file: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            store_file: default_store_file(),
            key_file: default_key_file(),
        }
    }
}

fn default_store_file() -> String {
    "credentials.json".to_string()
}

fn default_key_file() -> String {
    "master.key".to_string()
}

/// Threat scanning and payload limit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Maximum payload size in bytes accepted by the threat scanner.
    #[serde(default = "default_max_scan_bytes")]
    pub max_scan_bytes: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_scan_bytes: default_max_scan_bytes(),
        }
    }
}

fn default_max_scan_bytes() -> usize {
    // 256 KiB bounds worst-case regex scanning cost.
    256 * 1024
}

/// Minimum permission levels per operation class.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionsConfig {
    /// Minimum tier for read operations.
    #[serde(default = "default_read_level")]
    pub read: PermissionLevel,

    /// Minimum tier for record mutations.
    #[serde(default = "default_write_level")]
    pub write: PermissionLevel,

    /// Minimum tier for rotation and deletion.
    #[serde(default = "default_rotate_level")]
    pub rotate: PermissionLevel,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            read: default_read_level(),
            write: default_write_level(),
            rotate: default_rotate_level(),
        }
    }
}

fn default_read_level() -> PermissionLevel {
    PermissionLevel::ReadOnly
}

fn default_write_level() -> PermissionLevel {
    PermissionLevel::Standard
}

fn default_rotate_level() -> PermissionLevel {
    PermissionLevel::Full
}

/// Verification record configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VerificationConfig {
    /// Freshness window in seconds for replay protection.
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,

    /// Maximum characters retained by redacted summaries.
    #[serde(default = "default_redacted_summary_chars")]
    pub redacted_summary_chars: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: default_freshness_window_secs(),
            redacted_summary_chars: default_redacted_summary_chars(),
        }
    }
}

fn default_freshness_window_secs() -> u64 {
    300
}

fn default_redacted_summary_chars() -> usize {
    120
}
