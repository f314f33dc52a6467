// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Duration values read from `<sec>` / `<nanosec>` pairs.
//!
//! A QoS duration has four observable states and the rules depend on all
//! of them:
//!
//! | Source text                              | Value          |
//! |------------------------------------------|----------------|
//! | tag absent                               | `Unset`        |
//! | `<sec>0</sec>` (or no sub-fields)        | `Finite(0)`    |
//! | `<sec>1</sec><nanosec>5</nanosec>`       | `Finite(1e9+5)`|
//! | `DURATION_INFINITY` / `4294967295`       | `Infinite`     |

use serde::Serialize;
use std::fmt;

pub const NANOS_PER_SEC: u64 = 1_000_000_000;
pub const NANOS_PER_MILLI: u64 = 1_000_000;

/// Textual values meaning "infinite" (the second is the 32-bit all-ones
/// value some vendors write instead of the symbolic name).
pub const INFINITY_SENTINELS: [&str; 2] = ["DURATION_INFINITY", "4294967295"];

/// Tagged QoS duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QosDuration {
    /// Policy tag not present in the profile.
    #[default]
    Unset,
    /// Finite duration in nanoseconds (zero included).
    Finite(u64),
    /// Infinite duration.
    Infinite,
}

impl QosDuration {
    pub fn from_millis(ms: u64) -> Self {
        Self::Finite(ms.saturating_mul(NANOS_PER_MILLI))
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::Finite(secs.saturating_mul(NANOS_PER_SEC))
    }

    /// Tag present (finite, zero or infinite).
    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Policy actively enforced: finite and non-zero.
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Finite(ns) if ns > 0)
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// Nanoseconds when finite.
    pub fn finite_nanos(self) -> Option<u64> {
        match self {
            Self::Finite(ns) => Some(ns),
            _ => None,
        }
    }
}

impl fmt::Display for QosDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("unset"),
            Self::Infinite => f.write_str("infinite"),
            Self::Finite(ns) => write!(
                f,
                "{}s {}ns ({:.1} ms)",
                ns / NANOS_PER_SEC,
                ns % NANOS_PER_SEC,
                millis(*ns)
            ),
        }
    }
}

/// Nanoseconds as fractional milliseconds (for messages).
pub fn millis(ns: u64) -> f64 {
    ns as f64 / NANOS_PER_MILLI as f64
}

/// Nanoseconds as fractional seconds (for messages).
pub fn seconds(ns: u64) -> f64 {
    ns as f64 / NANOS_PER_SEC as f64
}

/// Check a sub-field against the infinity sentinels (case-insensitive).
pub fn is_infinity_sentinel(text: &str) -> bool {
    let text = text.trim();
    INFINITY_SENTINELS
        .iter()
        .any(|sentinel| text.eq_ignore_ascii_case(sentinel))
}

/// Parse one `<sec>` or `<nanosec>` value.
///
/// Empty text is 0, a sentinel is `None` (infinite), anything else is the
/// parsed integer. Unparsable text counts as 0.
pub fn parse_duration_field(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    if is_infinity_sentinel(text) {
        return None;
    }
    Some(text.parse::<u64>().unwrap_or(0))
}

/// Combine parsed sub-fields; either side infinite makes the whole infinite.
pub fn total_nanos(sec: Option<u64>, nanosec: Option<u64>) -> QosDuration {
    match (sec, nanosec) {
        (Some(sec), Some(nanosec)) => {
            QosDuration::Finite(sec.saturating_mul(NANOS_PER_SEC).saturating_add(nanosec))
        }
        _ => QosDuration::Infinite,
    }
}
