// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./taskmint.toml` > `~/.config/taskmint/taskmint.toml`
//! > `/etc/taskmint/taskmint.toml` with environment variable overrides via
//! the `TASKMINT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TaskmintConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/taskmint/taskmint.toml` (system-wide)
/// 3. `~/.config/taskmint/taskmint.toml` (user XDG config)
/// 4. `./taskmint.toml` (local directory)
/// 5. `TASKMINT_*` environment variables
pub fn load_config() -> Result<TaskmintConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaskmintConfig::default()))
        .merge(Toml::file("/etc/taskmint/taskmint.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("taskmint/taskmint.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("taskmint.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<TaskmintConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaskmintConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TaskmintConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaskmintConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TASKMINT_VAULT_STORE_FILE` must map to
/// `vault.store_file`, not `vault.store.file`.
fn env_provider() -> Env {
    Env::prefixed("TASKMINT_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("vault_", "vault.", 1)
            .replacen("security_", "security.", 1)
            .replacen("permissions_", "permissions.", 1)
            .replacen("verification_", "verification.", 1);
        mapped.into()
    })
}
