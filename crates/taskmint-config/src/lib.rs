// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Taskmint security layer.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides via the `TASKMINT_` prefix.
//!
//! # Usage
//!
//! ```no_run
//! use taskmint_config::load;
//!
//! let config = load().expect("configuration should load");
//! println!("store file: {}", config.vault.store_file);
//! ```

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    PermissionsConfig, SecurityConfig, TaskmintConfig, VaultConfig, VerificationConfig,
};

use taskmint_core::TaskmintError;

/// Load configuration from the XDG hierarchy, mapping figment failures into
/// the workspace error type.
pub fn load() -> Result<TaskmintConfig, TaskmintError> {
    let config = loader::load_config().map_err(|e| TaskmintError::Config(e.to_string()))?;
    tracing::debug!(store_file = %config.vault.store_file, "configuration loaded");
    Ok(config)
}
