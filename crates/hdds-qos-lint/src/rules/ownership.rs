// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! EXCLUSIVE ownership rules.
//!
//! Ownership hands over only when the current owner is seen as stale
//! (deadline miss or liveliness loss), so every rule here checks that
//! staleness detection is possible and is not triggered by ordinary jitter.

use crate::duration::millis;
use crate::profile::Profile;
use crate::timing::TimingContext;

/// Durable replay from a previous owner under EXCLUSIVE ownership.
pub(super) fn durable_replay(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if qos.is_durable() && qos.is_exclusive() {
        return Some(
            "Error: Durable retransmission of outdated samples from previous owner may cause \
             memory/network waste and delay new owner's schedule.\n\
             Recommendation: use durability_kind = VOLATILE for ownership_kind = EXCLUSIVE."
                .to_string(),
        );
    }
    None
}

pub(super) fn best_effort_deadline(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if profile.durations().deadline.is_enabled() && qos.is_best_effort() && qos.is_exclusive() {
        return Some(
            "EXCLUSIVE + BEST_EFFORT may cause false DEADLINE misses and invalid ownership transitions.\n\
             Recommendation: use RELIABLE for stable EXCLUSIVE ownership."
                .to_string(),
        );
    }
    None
}

/// Any enabled deadline under EXCLUSIVE ownership.
pub(super) fn with_deadline(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    if profile.qos().is_exclusive() && profile.durations().deadline.is_enabled() {
        return Some(
            "Invalid QoS: In EXCLUSIVE ownership mode, a DEADLINE miss may trigger \
             automatic ownership transfer to another writer.\n\
             Recommendation: disable DEADLINE (period = 0 or INFINITE) when using \
             EXCLUSIVE ownership, or switch to SHARED ownership if DEADLINE must remain enabled."
                .to_string(),
        );
    }
    None
}

pub(super) fn best_effort(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if qos.is_best_effort() && qos.is_exclusive() {
        return Some(
            "BEST_EFFORT reliability is incompatible with EXCLUSIVE ownership.\n\
             Recommendation: use RELIABLE reliability_kind or switch ownership_kind to SHARED."
                .to_string(),
        );
    }
    None
}

pub(super) fn autodispose(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if qos.autodispose_enabled() && qos.is_exclusive() {
        return Some(
            "Invalid QoS: autodispose_unregistered_instances = TRUE with EXCLUSIVE ownership.\n\
             When the exclusive Writer unregisters, its instance is disposed immediately, \
             preventing smooth ownership handover.\n\
             Recommendation: set autodispose_unregistered_instances = FALSE to allow new \
             exclusive Writers to take over without premature instance disposal."
                .to_string(),
        );
    }
    None
}

/// Infinite lease: the owner is never declared dead.
pub(super) fn lease_infinite(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    if profile.qos().is_exclusive() && profile.durations().lease_duration.is_infinite() {
        return Some(
            "Invalid QoS: EXCLUSIVE ownership with infinite lease_duration.\n\
             The Writer may never be considered 'dead', preventing ownership transfer.\n\
             Recommendation: set a finite lease_duration (e.g., 1s) to enable liveliness loss detection."
                .to_string(),
        );
    }
    None
}

/// Deadline shorter than two publish periods hands ownership over on jitter.
pub(super) fn deadline_too_short(profile: &Profile, timing: &TimingContext) -> Option<String> {
    if !profile.qos().is_exclusive() {
        return None;
    }
    let deadline = profile.durations().deadline;
    if !deadline.is_enabled() {
        return None;
    }
    let deadline_ns = deadline.finite_nanos()?;
    let minimum = timing.publish_period_ns().saturating_mul(2);
    if deadline_ns < minimum {
        let pp = timing.publish_period_ms();
        return Some(format!(
            "Invalid QoS: EXCLUSIVE ownership with DEADLINE period < 2×publish_period.\n\
             DEADLINE = {:.1} ms, publish_period = {pp} ms → required ≥ {} ms.\n\
             This may cause false ownership transfer due to minor publish delays.\n\
             Recommendation: increase DEADLINE period to ≥ 2×publish_period.",
            millis(deadline_ns),
            pp.saturating_mul(2)
        ));
    }
    None
}

/// Lease shorter than two publish periods; only with an explicit liveliness kind.
pub(super) fn lease_too_short(profile: &Profile, timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if !qos.is_exclusive() || qos.liveliness.is_empty() {
        return None;
    }
    let lease_ns = profile.durations().lease_duration.finite_nanos()?;
    let minimum = timing.publish_period_ns().saturating_mul(2);
    if lease_ns < minimum {
        let pp = timing.publish_period_ms();
        return Some(format!(
            "Invalid QoS: EXCLUSIVE ownership with liveliness lease_duration < 2×publish_period.\n\
             lease_duration = {:.1} ms, publish_period = {pp} ms → required ≥ {} ms.\n\
             This may cause false Writer death detection and unwanted ownership transfer.\n\
             Recommendation: increase lease_duration to ≥ 2×publish_period.",
            millis(lease_ns),
            pp.saturating_mul(2)
        ));
    }
    None
}

/// Infinite deadline: staleness is never detected.
pub(super) fn deadline_infinite(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    if profile.qos().is_exclusive() && profile.durations().deadline.is_infinite() {
        return Some(
            "Invalid QoS: EXCLUSIVE ownership with DEADLINE = ∞.\n\
             The system cannot detect Writer staleness, preventing ownership handover.\n\
             Recommendation: set a finite DEADLINE period (e.g., 1s) to allow handover if Writer becomes inactive."
                .to_string(),
        );
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> TimingContext {
        TimingContext::new(40, 50).unwrap()
    }

    fn exclusive(extra: &str) -> Profile {
        Profile::parse(format!(
            "<ownership><kind>EXCLUSIVE</kind></ownership>{extra}"
        ))
    }

    #[test]
    fn test_infinite_deadline_and_lease() {
        let p = exclusive("<deadline><period><sec>DURATION_INFINITY</sec></period></deadline>");
        assert!(deadline_infinite(&p, &timing()).is_some());
        assert!(deadline_too_short(&p, &timing()).is_none());
        assert!(with_deadline(&p, &timing()).is_none());

        let p = exclusive(
            "<liveliness><kind>AUTOMATIC</kind><lease_duration><sec>4294967295</sec>\
             <nanosec>4294967295</nanosec></lease_duration></liveliness>",
        );
        assert!(lease_infinite(&p, &timing()).is_some());
        assert!(lease_too_short(&p, &timing()).is_none());
    }

    #[test]
    fn test_shared_ownership_is_ignored() {
        let p = Profile::parse(
            "<ownership><kind>SHARED</kind></ownership>\
             <deadline><period><sec>DURATION_INFINITY</sec></period></deadline>",
        );
        assert!(deadline_infinite(&p, &timing()).is_none());
    }

    #[test]
    fn test_deadline_too_short() {
        let p = exclusive("<deadline><period><nanosec>50000000</nanosec></period></deadline>");
        let msg = deadline_too_short(&p, &timing()).unwrap();
        assert!(msg.contains("DEADLINE = 50.0 ms, publish_period = 40 ms → required ≥ 80 ms"));

        let p = exclusive("<deadline><period><nanosec>80000000</nanosec></period></deadline>");
        assert!(deadline_too_short(&p, &timing()).is_none());
    }

    #[test]
    fn test_lease_too_short_needs_kind() {
        let no_kind = exclusive(
            "<liveliness><lease_duration><nanosec>1000</nanosec></lease_duration></liveliness>",
        );
        assert!(lease_too_short(&no_kind, &timing()).is_none());

        let with_kind = exclusive(
            "<liveliness><kind>MANUAL_BY_PARTICIPANT</kind>\
             <lease_duration><nanosec>1000</nanosec></lease_duration></liveliness>",
        );
        assert!(lease_too_short(&with_kind, &timing()).is_some());
    }

    #[test]
    fn test_best_effort_deadline() {
        let p = exclusive(
            "<reliability><kind>BEST_EFFORT</kind></reliability>\
             <deadline><period><sec>1</sec></period></deadline>",
        );
        assert!(best_effort_deadline(&p, &timing()).is_some());
        assert!(best_effort(&p, &timing()).is_some());
    }
}
