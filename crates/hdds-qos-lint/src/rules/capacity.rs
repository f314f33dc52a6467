// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Buffer sizing against the timing context.
//!
//! Two thresholds drive these rules:
//!
//! - retransmission window: `ceil(rtt / publish_period) + 2` samples must
//!   stay buffered for a NACK round trip to succeed;
//! - lifespan window: `ceil(lifespan / publish_period)` samples are alive
//!   at any instant.
//!
//! Under- and over-provisioning are separate rules; both may be enabled.

use crate::duration::seconds;
use crate::profile::Profile;
use crate::timing::{ms_as_secs, TimingContext};

/// Finite lifespan in nanoseconds, if any.
fn lifespan_ns(profile: &Profile) -> Option<u64> {
    profile.durations().lifespan.finite_nanos()
}

/// History depth compared with the lifespan window, in both directions.
pub(super) fn history_vs_lifespan(profile: &Profile, timing: &TimingContext) -> Option<String> {
    let depth = profile.qos().history_depth()?;
    let lifespan = lifespan_ns(profile)?;
    let required = timing.samples_within(lifespan);
    let lifespan_s = seconds(lifespan);
    let rate = timing.publish_rate_hz();

    if depth < required {
        Some(format!(
            "Invalid QoS: history depth={depth} is too small for lifespan={lifespan_s:.3}s at {rate:.1} Hz.\n\
             Recommendation: increase history depth to at least {required} to retain samples during lifespan."
        ))
    } else if depth > required {
        Some(format!(
            "Invalid QoS: history depth={depth} exceeds what's needed for lifespan={lifespan_s:.3}s at {rate:.1} Hz.\n\
             Recommendation: reduce history depth to {required} to conserve memory."
        ))
    } else {
        None
    }
}

/// `min(depth, max_samples)` must hold every sample alive within the lifespan.
pub(super) fn buffer_capacity_vs_lifespan(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    let depth = qos.history_depth()?;
    let max_samples = qos.max_samples()?;
    let lifespan = lifespan_ns(profile)?;
    let required = timing.samples_within(lifespan);
    let capacity = depth.min(max_samples);

    if capacity < required {
        return Some(format!(
            "Invalid QoS: buffer capacity = min(history={depth}, max_samples={max_samples}) = {capacity} is too small.\n\
             Lifespan = {:.3}s at {:.1} Hz requires ≥ {required} samples.\n\
             Recommendation: increase history or max_samples to avoid overwriting samples before lifespan ends.",
            seconds(lifespan),
            timing.publish_rate_hz()
        ));
    }
    None
}

pub(super) fn reliable_keep_last_too_shallow(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if !(qos.is_reliable() && qos.is_keep_last()) {
        return None;
    }
    let depth = qos.history_depth()?;
    if depth < timing.required_depth() {
        return Some(format!(
            "Invalid QoS: RELIABLE + KEEP_LAST({depth}) is too shallow.\n\
             Required depth ≥ {}.\n\
             Samples may be dropped before NACK retransmission is possible.\n\
             Recommendation: increase history depth to at least this value.",
            timing.depth_formula()
        ));
    }
    None
}

pub(super) fn reliable_keep_all_too_small(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if !(qos.is_reliable() && qos.is_keep_all()) {
        return None;
    }
    let per_instance = qos.max_samples_per_instance()?;
    if per_instance < timing.required_depth() {
        return Some(format!(
            "Invalid QoS: RELIABLE + KEEP_ALL + max_samples_per_instance = {per_instance} is too small.\n\
             Required ≥ {}.\n\
             This setting may cause loss of samples before retransmission is completed.\n\
             Recommendation: increase max_samples_per_instance to at least this value.",
            timing.depth_formula()
        ));
    }
    None
}

pub(super) fn durable_keep_all_too_small(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if !(qos.is_durable() && qos.is_keep_all()) {
        return None;
    }
    let per_instance = qos.max_samples_per_instance()?;
    if per_instance < timing.required_depth() {
        return Some(format!(
            "Invalid QoS: DURABILITY.kind = {}, KEEP_ALL, but max_samples_per_instance = {per_instance} is too small.\n\
             Required ≥ {}.\n\
             This may cause durable samples to be dropped before late-joiners arrive or NACKs are processed.\n\
             Recommendation: increase max_samples_per_instance to at least this value.",
            qos.durability,
            timing.depth_formula()
        ));
    }
    None
}

pub(super) fn durable_keep_last_too_shallow(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if !(qos.is_durable() && qos.is_keep_last()) {
        return None;
    }
    let depth = qos.history_depth()?;
    if depth < timing.required_depth() {
        return Some(format!(
            "Invalid QoS: DURABILITY.kind = {}, KEEP_LAST({depth}) is too small.\n\
             Required depth ≥ {}.\n\
             Durable samples may be lost before late-joiners or retransmission.\n\
             Recommendation: increase history depth to at least this value.",
            qos.durability,
            timing.depth_formula()
        ));
    }
    None
}

pub(super) fn durable_keep_all_too_large(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if !(qos.is_durable() && qos.is_keep_all()) {
        return None;
    }
    let per_instance = qos.max_samples_per_instance()?;
    let required = timing.required_depth();
    if per_instance > required {
        return Some(format!(
            "Invalid QoS: KEEP_ALL + DURABILITY enabled, but max_samples_per_instance = {per_instance} is too large.\n\
             Only {} samples needed.\n\
             Recommendation: reduce max_samples_per_instance to save memory.",
            timing.depth_formula()
        ));
    }
    None
}

pub(super) fn durable_keep_last_too_deep(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if !(qos.is_durable() && qos.is_keep_last()) {
        return None;
    }
    let depth = qos.history_depth()?;
    let required = timing.required_depth();
    if depth > required {
        return Some(format!(
            "Invalid QoS: DURABILITY={} + KEEP_LAST({depth}) is too deep.\n\
             Only {} needed.\n\
             Recommendation: reduce history depth to ≤ {required} to save memory.",
            qos.durability,
            timing.depth_formula()
        ));
    }
    None
}

/// KEEP_ALL cannot hold `lifespan / publish_period` samples per instance.
pub(super) fn lifespan_exceeds_per_instance(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if !qos.is_keep_all() {
        return None;
    }
    let per_instance = qos.max_samples_per_instance()?;
    let lifespan = lifespan_ns(profile)?;
    let allowed = timing.span_of(per_instance);
    if lifespan > allowed {
        let lifespan_s = seconds(lifespan);
        return Some(format!(
            "Invalid QoS: KEEP_ALL with max_samples_per_instance = {per_instance} cannot store samples for lifespan = {lifespan_s:.3}s.\n\
             Lifespan > max_samples_per_instance × publish_period = {per_instance} × {:.3}s = {:.3}s.\n\
             This causes valid samples to be discarded early.\n\
             Recommendation: increase max_samples_per_instance or reduce lifespan.",
            ms_as_secs(timing.publish_period_ms()),
            seconds(allowed)
        ));
    }
    None
}

/// KEEP_LAST overwrites samples that are still alive.
pub(super) fn keep_last_lifespan_overflow(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if !qos.is_keep_last() {
        return None;
    }
    let depth = qos.history_depth()?;
    let lifespan = lifespan_ns(profile)?;
    let window = timing.span_of(depth);
    if lifespan > window {
        return Some(format!(
            "Invalid QoS: KEEP_LAST(depth={depth}) × publish_period({:.3}s) = {:.3}s < lifespan = {:.3}s.\n\
             Samples may be overwritten before they expire.\n\
             Recommendation: reduce lifespan or increase history depth.",
            ms_as_secs(timing.publish_period_ms()),
            seconds(window),
            seconds(lifespan)
        ));
    }
    None
}
