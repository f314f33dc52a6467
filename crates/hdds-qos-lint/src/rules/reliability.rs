// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Policies that silently depend on RELIABLE delivery.

use crate::duration::millis;
use crate::kinds::LivelinessKind;
use crate::profile::Profile;
use crate::timing::TimingContext;

/// Lost samples under BEST_EFFORT look like deadline misses.
pub(super) fn deadline_with_best_effort(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    if profile.durations().deadline.is_enabled() && profile.qos().is_best_effort() {
        return Some(
            "DEADLINE + BEST_EFFORT may cause false deadline misses due to packet loss.\n\
             Recommendation: use RELIABLE for accurate detection."
                .to_string(),
        );
    }
    None
}

pub(super) fn autodispose_with_best_effort(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if qos.is_best_effort() && qos.autodispose_enabled() {
        return Some(
            "WRITER_DATA_LIFECYCLE may be ineffective under BEST_EFFORT.\n\
             Dispose/unregister messages can be lost.\n\
             Recommendation: use RELIABLE when relying on autodispose_unregistered_instances."
                .to_string(),
        );
    }
    None
}

/// Samples expiring before a retransmission round trip.
pub(super) fn lifespan_short_for_reliability(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    if !profile.qos().is_reliable() {
        return None;
    }
    let lifespan = profile.durations().lifespan;
    let lifespan_ns = lifespan.finite_nanos()?;
    if lifespan_ns < timing.rtt_ns() {
        return Some(format!(
            "Invalid QoS: RELIABLE set but LIFESPAN duration < RTT.\n\
             LIFESPAN = {lifespan} < RTT = {:.1} ms.\n\
             This causes samples to expire before retransmission can occur.\n\
             Recommendation: set lifespan ≥ RTT when using RELIABLE.",
            millis(timing.rtt_ns())
        ));
    }
    None
}

/// Lost liveliness assertions read as WRITER_NOT_ALIVE.
pub(super) fn best_effort_manual_by_topic(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if qos.liveliness_kind() == Some(LivelinessKind::ManualByTopic) && qos.is_best_effort() {
        return Some(
            "Invalid QoS: MANUAL_BY_TOPIC liveliness requires reliable communication.\n\
             Using BEST_EFFORT may cause liveliness assertions to be lost,\n\
             resulting in false WRITER_NOT_ALIVE detection.\n\
             Recommendation: use RELIABLE reliability_kind with MANUAL_BY_TOPIC liveliness."
                .to_string(),
        );
    }
    None
}
