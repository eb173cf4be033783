// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operation authorization for the Taskmint security layer.

pub mod permissions;

pub use permissions::{Operation, PermissionManager};
