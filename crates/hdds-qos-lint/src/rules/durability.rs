// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Durability coupling rules (reliability, lifecycle, lifespan).

use crate::duration::millis;
use crate::profile::Profile;
use crate::timing::TimingContext;

/// Non-volatile durability without RELIABLE reliability.
pub(super) fn needs_reliable(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if qos.is_durable() && !qos.is_reliable() {
        return Some(
            "Invalid QoS: durability_kind is TRANSIENT_LOCAL/TRANSIENT/PERSISTENT \
             but reliability_kind is not RELIABLE.\n\
             Recommendation: use reliability_kind = RELIABLE with non-volatile durability."
                .to_string(),
        );
    }
    None
}

/// BY_SOURCE_TIMESTAMP ordering without RELIABLE or with volatile durability.
pub(super) fn dest_order_needs_reliable_durable(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if qos.is_by_source_timestamp() && (!qos.is_reliable() || qos.is_volatile()) {
        return Some(
            "Invalid QoS: destination_order_kind = BY_SOURCE_TIMESTAMP requires \
             reliability_kind = RELIABLE and durability_kind ≠ VOLATILE.\n\
             Recommendation: set reliability_kind = RELIABLE and choose \
             durability_kind = TRANSIENT_LOCAL (or higher) for stable ordering."
                .to_string(),
        );
    }
    None
}

/// Enabled deadline on a durable profile: replayed samples reset the timer.
pub(super) fn deadline_vs_durability(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    if profile.durations().deadline.is_enabled() && profile.qos().is_durable() {
        return Some(
            "QoS warning: durable samples may arrive late and reset the DEADLINE \
             timer, potentially masking real timing violations.\n\
             Recommendation: use VOLATILE durability when DEADLINE is critical, \
             or relax / disable DEADLINE to tolerate replayed samples."
                .to_string(),
        );
    }
    None
}

/// Durable KEEP_LAST with depth <= 1.
pub(super) fn keep_last_single_sample(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if !(qos.is_durable() && qos.is_keep_last()) {
        return None;
    }
    match qos.history_depth() {
        Some(depth) if depth <= 1 => Some(
            "Invalid QoS: TRANSIENT/PERSISTENT durability with KEEP_LAST(1) \
             retains only one sample, negating durable delivery.\n\
             Recommendation: set history depth > 1 or use KEEP_ALL."
                .to_string(),
        ),
        _ => None,
    }
}

/// Durable KEEP_ALL whose `max_samples` is the unlimited marker.
pub(super) fn keep_all_unbounded(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    const UNLIMITED: [&str; 2] = ["2147483647", "0"];

    let qos = profile.qos();
    if qos.is_durable() && qos.is_keep_all() && UNLIMITED.contains(&qos.max_samples.as_str()) {
        return Some(
            "Warning: KEEP_ALL + TRANSIENT/PERSISTENT durability with unlimited \
             max_samples may cause uncontrolled storage growth.\n\
             Recommendation: set a finite max_samples or switch to KEEP_LAST."
                .to_string(),
        );
    }
    None
}

pub(super) fn autodispose_vs_durability(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if qos.autodispose_enabled() && qos.is_durable() {
        return Some(
            "Warning: Writer disposes are stored in durable cache; late joiners \
             will receive DISPOSED instance state.\n\
             Recommendation: set autodispose_unregistered_instances = FALSE, or \
             use VOLATILE durability when dispose persistence is not desired."
                .to_string(),
        );
    }
    None
}

/// Entities created disabled on a volatile profile miss everything
/// published before `enable()`. Absent durability counts as VOLATILE.
pub(super) fn autoenable_vs_volatile(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if qos.autoenable_disabled() && qos.is_volatile() {
        return Some(
            "QoS warning: autoenable_created_entities=false while durability_kind=VOLATILE.\n\
             Late-enabled DataReaders will MISS all samples published before enable().\n\
             Recommendation: set autoenable_created_entities=true, or switch to \
             TRANSIENT_LOCAL (or higher) durability to retain data for late joiners."
                .to_string(),
        );
    }
    None
}

pub(super) fn autopurge_disposed_vs_durability(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if qos.is_durable() && qos.autopurge_disposed_delay_sec == "0" {
        return Some(
            "Invalid QoS: DURABILITY.kind ≥ TRANSIENT_LOCAL and autopurge_disposed_samples_delay = 0.\n\
             This setting causes DISPOSED samples to be purged immediately, \
             negating the durability.\n\
             Recommendation: set autopurge_disposed_samples_delay > 0 \
             to allow late-joiners to observe disposed instances."
                .to_string(),
        );
    }
    None
}

/// Durable samples expiring before one round trip completes.
pub(super) fn lifespan_short_for_durability(
    profile: &Profile,
    timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if !qos.is_durable() {
        return None;
    }
    let lifespan = profile.durations().lifespan;
    let lifespan_ns = lifespan.finite_nanos()?;
    if lifespan_ns < timing.rtt_ns() {
        return Some(format!(
            "Invalid QoS: DURABILITY.kind = {} with LIFESPAN duration < RTT.\n\
             LIFESPAN: {lifespan} < RTT ({:.1} ms).\n\
             This setting may cause samples to expire before they are delivered to late-joiners.\n\
             Recommendation: set lifespan ≥ RTT, or relax durability if replay is not required.",
            qos.durability,
            millis(timing.rtt_ns())
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> TimingContext {
        TimingContext::new(40, 50).unwrap()
    }

    fn profile(reliability: &str, durability: &str) -> Profile {
        Profile::parse(format!(
            "<reliability><kind>{reliability}</kind></reliability>\
             <durability><kind>{durability}</kind></durability>"
        ))
    }

    #[test]
    fn test_needs_reliable() {
        assert!(needs_reliable(&profile("BEST_EFFORT", "TRANSIENT_LOCAL"), &timing()).is_some());
        assert!(needs_reliable(&profile("", "PERSISTENT"), &timing()).is_some());
        assert!(needs_reliable(&profile("RELIABLE", "TRANSIENT"), &timing()).is_none());
        assert!(needs_reliable(&profile("BEST_EFFORT", "VOLATILE"), &timing()).is_none());
        assert!(needs_reliable(&profile("BEST_EFFORT", ""), &timing()).is_none());
    }

    #[test]
    fn test_deadline_vs_durability_needs_positive_deadline() {
        let zero = Profile::parse(
            "<durability><kind>TRANSIENT_LOCAL</kind></durability>\
             <deadline><period><sec>0</sec><nanosec>0</nanosec></period></deadline>",
        );
        assert!(deadline_vs_durability(&zero, &timing()).is_none());

        let enabled = Profile::parse(
            "<durability><kind>TRANSIENT_LOCAL</kind></durability>\
             <deadline><period><nanosec>100</nanosec></period></deadline>",
        );
        assert!(deadline_vs_durability(&enabled, &timing()).is_some());
    }

    #[test]
    fn test_autoenable_vs_volatile_defaults_to_volatile() {
        let implicit = Profile::parse(
            "<entity_factory><autoenable_created_entities>false</autoenable_created_entities></entity_factory>",
        );
        assert!(autoenable_vs_volatile(&implicit, &timing()).is_some());

        let durable = Profile::parse(
            "<autoenable_created_entities>FALSE</autoenable_created_entities>\
             <durability><kind>TRANSIENT_LOCAL</kind></durability>",
        );
        assert!(autoenable_vs_volatile(&durable, &timing()).is_none());
    }

    #[test]
    fn test_keep_last_single_sample_requires_depth() {
        let no_depth = Profile::parse(
            "<durability><kind>TRANSIENT_LOCAL</kind></durability>\
             <historyQos><kind>KEEP_LAST</kind></historyQos>",
        );
        assert!(keep_last_single_sample(&no_depth, &timing()).is_none());

        let one = Profile::parse(
            "<durability><kind>TRANSIENT_LOCAL</kind></durability>\
             <historyQos><kind>KEEP_LAST</kind><depth>1</depth></historyQos>",
        );
        assert!(keep_last_single_sample(&one, &timing()).is_some());
    }

    #[test]
    fn test_lifespan_short_for_durability() {
        let short = Profile::parse(
            "<durability><kind>TRANSIENT_LOCAL</kind></durability>\
             <lifespan><duration><nanosec>10000000</nanosec></duration></lifespan>",
        );
        let msg = lifespan_short_for_durability(&short, &timing()).unwrap();
        assert!(msg.contains("TRANSIENT_LOCAL"));
        assert!(msg.contains("RTT (50.0 ms)"));

        let infinite = Profile::parse(
            "<durability><kind>TRANSIENT_LOCAL</kind></durability>\
             <lifespan><duration><sec>DURATION_INFINITY</sec></duration></lifespan>",
        );
        assert!(lifespan_short_for_durability(&infinite, &timing()).is_none());
    }

    #[test]
    fn test_autopurge_disposed_zero() {
        let p = Profile::parse(
            "<durability><kind>TRANSIENT</kind></durability>\
             <readerDataLifecycle><autopurge_disposed_samples_delay><sec>0</sec>\
             </autopurge_disposed_samples_delay></readerDataLifecycle>",
        );
        assert!(autopurge_disposed_vs_durability(&p, &timing()).is_some());
    }
}
