// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Timing context supplied once per evaluation.
//!
//! Capacity rules need the application's publish period and the network
//! round-trip time. Both are read-only for the lifetime of an evaluation
//! and passed explicitly to every single-profile rule.

use crate::duration::{NANOS_PER_MILLI, NANOS_PER_SEC};
use serde::Serialize;
use thiserror::Error;

/// Rejected timing input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimingError {
    #[error("publish period must be a positive number of milliseconds")]
    ZeroPublishPeriod,
    #[error("round-trip time must be a positive number of milliseconds")]
    ZeroRtt,
    #[error("expected {key}=<N>ms, got {value:?}")]
    Malformed { key: &'static str, value: String },
}

/// Publish period and round-trip time, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingContext {
    publish_period_ms: u64,
    rtt_ms: u64,
}

impl TimingContext {
    /// Build a context; both values must be positive.
    ///
    /// ```
    /// use hdds_qos_lint::TimingContext;
    ///
    /// let timing = TimingContext::new(40, 50).unwrap();
    /// assert_eq!(timing.required_depth(), 4); // ceil(50/40) + 2
    /// ```
    pub fn new(publish_period_ms: u64, rtt_ms: u64) -> Result<Self, TimingError> {
        if publish_period_ms == 0 {
            return Err(TimingError::ZeroPublishPeriod);
        }
        if rtt_ms == 0 {
            return Err(TimingError::ZeroRtt);
        }
        Ok(Self {
            publish_period_ms,
            rtt_ms,
        })
    }

    pub fn publish_period_ms(&self) -> u64 {
        self.publish_period_ms
    }

    pub fn rtt_ms(&self) -> u64 {
        self.rtt_ms
    }

    pub fn publish_period_ns(&self) -> u64 {
        self.publish_period_ms.saturating_mul(NANOS_PER_MILLI)
    }

    pub fn rtt_ns(&self) -> u64 {
        self.rtt_ms.saturating_mul(NANOS_PER_MILLI)
    }

    /// Samples per second.
    pub fn publish_rate_hz(&self) -> f64 {
        1000.0 / self.publish_period_ms as f64
    }

    /// Samples that must stay buffered while a NACK round trip completes:
    /// `ceil(rtt / publish_period) + 2`.
    pub fn required_depth(&self) -> u64 {
        self.rtt_ms.div_ceil(self.publish_period_ms).saturating_add(2)
    }

    /// Samples published during `duration_ns`: `ceil(duration * rate)`.
    pub fn samples_within(&self, duration_ns: u64) -> u64 {
        duration_ns.div_ceil(self.publish_period_ns())
    }

    /// Nanoseconds covered by `samples` consecutive publications.
    pub fn span_of(&self, samples: u64) -> u64 {
        samples.saturating_mul(self.publish_period_ns())
    }

    /// Human-readable derivation of [`required_depth`](Self::required_depth).
    pub(crate) fn depth_formula(&self) -> String {
        format!(
            "ceil(RTT / PP) + 2 = ceil({:.3}s / {:.3}s) + 2 = {}",
            self.rtt_ms as f64 / 1000.0,
            self.publish_period_ms as f64 / 1000.0,
            self.required_depth()
        )
    }
}

/// Parse a `key=<N>ms` argument into milliseconds.
///
/// The unit is case-insensitive and may be preceded by whitespace
/// (`rtt=50ms`, `rtt=50 MS`). Zero is accepted here and rejected by
/// [`TimingContext::new`].
pub fn parse_millis_arg(key: &'static str, arg: &str) -> Result<u64, TimingError> {
    let malformed = || TimingError::Malformed {
        key,
        value: arg.to_string(),
    };
    let value = arg
        .strip_prefix(key)
        .and_then(|rest| rest.strip_prefix('='))
        .ok_or_else(malformed)?
        .trim()
        .to_ascii_lowercase();
    let digits = value.strip_suffix("ms").ok_or_else(malformed)?.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    digits.parse().map_err(|_| malformed())
}

/// Seconds as `f64` for a millisecond count.
pub(crate) fn ms_as_secs(ms: u64) -> f64 {
    ms as f64 * NANOS_PER_MILLI as f64 / NANOS_PER_SEC as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero() {
        assert_eq!(
            TimingContext::new(0, 50),
            Err(TimingError::ZeroPublishPeriod)
        );
        assert_eq!(TimingContext::new(40, 0), Err(TimingError::ZeroRtt));
    }

    #[test]
    fn test_required_depth() {
        let timing = TimingContext::new(40, 50).unwrap();
        assert_eq!(timing.required_depth(), 4);

        let timing = TimingContext::new(50, 50).unwrap();
        assert_eq!(timing.required_depth(), 3);

        let timing = TimingContext::new(10, 95).unwrap();
        assert_eq!(timing.required_depth(), 12);
    }

    #[test]
    fn test_required_depth_saturates() {
        let rtt = parse_millis_arg("rtt", "rtt=18446744073709551615ms").unwrap();
        assert_eq!(rtt, u64::MAX);

        let timing = TimingContext::new(1, rtt).unwrap();
        assert_eq!(timing.required_depth(), u64::MAX);
        assert_eq!(timing.rtt_ns(), u64::MAX);
        assert!(timing.depth_formula().ends_with(&format!("= {}", u64::MAX)));
    }

    #[test]
    fn test_samples_within() {
        let timing = TimingContext::new(100, 50).unwrap();
        assert_eq!(timing.samples_within(1_000_000_000), 10);
        assert_eq!(timing.samples_within(1_050_000_000), 11);
        assert_eq!(timing.samples_within(0), 0);
        assert_eq!(timing.span_of(3), 300_000_000);
    }

    #[test]
    fn test_rate_and_conversions() {
        let timing = TimingContext::new(40, 50).unwrap();
        assert!((timing.publish_rate_hz() - 25.0).abs() < 1e-9);
        assert_eq!(timing.rtt_ns(), 50_000_000);
        assert_eq!(timing.publish_period_ns(), 40_000_000);
        assert!((ms_as_secs(1500) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_millis_arg() {
        assert_eq!(parse_millis_arg("rtt", "rtt=50ms"), Ok(50));
        assert_eq!(parse_millis_arg("rtt", "rtt= 50 MS"), Ok(50));
        assert_eq!(parse_millis_arg("publish_period", "publish_period=40ms"), Ok(40));
        assert_eq!(parse_millis_arg("rtt", "rtt=0ms"), Ok(0));
        for bad in ["rtt=50", "rtt=ms", "rtt=-5ms", "rtt=5.5ms", "period=50ms", "rtt50ms"] {
            assert_eq!(
                parse_millis_arg("rtt", bad),
                Err(TimingError::Malformed {
                    key: "rtt",
                    value: bad.to_string()
                }),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_depth_formula_mentions_result() {
        let timing = TimingContext::new(40, 50).unwrap();
        assert_eq!(
            timing.depth_formula(),
            "ceil(RTT / PP) + 2 = ceil(0.050s / 0.040s) + 2 = 4"
        );
    }
}
