// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-based threat detection for content flowing to and from external
//! AI providers.

pub mod detector;
pub mod patterns;

pub use detector::{Neutralized, ThreatDetector};
