// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ordering between deadline, lifespan and liveliness timers of one profile.

use crate::duration::millis;
use crate::kinds::LivelinessKind;
use crate::profile::Profile;
use crate::timing::TimingContext;

/// Lease expiring before the deadline stops the deadline timer early.
pub(super) fn lease_vs_deadline(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let durations = profile.durations();
    let deadline_ns = durations.deadline.finite_nanos()?;
    let lease_ns = durations.lease_duration.finite_nanos()?;
    if lease_ns < deadline_ns {
        return Some(format!(
            "lease_duration < deadline_period: DEADLINE timer may stop prematurely, \
             hiding real-time deadline violations.\n\
             lease_duration  : {}\n\
             deadline_period : {}\n\
             Recommendation  : set lease_duration ≥ deadline_period or relax the DEADLINE QoS.",
            durations.lease_duration, durations.deadline
        ));
    }
    None
}

/// Samples expiring before the deadline timer can observe them.
pub(super) fn lifespan_vs_deadline(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let durations = profile.durations();
    let deadline_ns = durations.deadline.finite_nanos()?;
    let lifespan_ns = durations.lifespan.finite_nanos()?;
    if lifespan_ns < deadline_ns {
        return Some(format!(
            "Invalid QoS: LIFESPAN duration is shorter than DEADLINE period.\n\
             LIFESPAN : {}\n\
             DEADLINE: {}\n\
             Recommendation: set lifespan ≥ deadline to ensure samples remain valid \
             until the deadline timer expires.",
            durations.lifespan, durations.deadline
        ));
    }
    None
}

/// AUTOMATIC / MANUAL_BY_PARTICIPANT lease must outlast the announcement
/// period. Infinite announcement periods are not checked.
pub(super) fn announcement_vs_lease(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    match profile.qos().liveliness_kind() {
        Some(LivelinessKind::Automatic | LivelinessKind::ManualByParticipant) => {}
        _ => return None,
    }
    let durations = profile.durations();
    let lease_ns = durations.lease_duration.finite_nanos()?;
    let announcement_ns = durations.announcement_period.finite_nanos()?;
    if lease_ns <= announcement_ns {
        return Some(format!(
            "Invalid QoS: liveliness lease_duration {} ≤ announcement_period {}.\n\
             Recommendation: set lease_duration > announcement_period.",
            durations.lease_duration, durations.announcement_period
        ));
    }
    None
}

/// MANUAL_BY_TOPIC liveliness with any named partition.
pub(super) fn manual_by_topic_partition(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if qos.liveliness_kind() != Some(LivelinessKind::ManualByTopic) {
        return None;
    }
    if qos.partition_list.iter().any(|name| !name.trim().is_empty()) {
        return Some(
            "Invalid QoS: LIVELINESS.kind = MANUAL_BY_TOPIC with non-empty PARTITION.\n\
             Manual-by-topic requires the Writer to assert liveliness per partition, \
             which may cause unexpected liveliness loss in unused partitions.\n\
             Recommendation: use AUTOMATIC or MANUAL_BY_PARTICIPANT, or remove partition."
                .to_string(),
        );
    }
    None
}

/// No-writer purge can never trigger when writer loss is never detected.
pub(super) fn nowriter_purge_vs_infinite_lease(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    let durations = profile.durations();
    if !durations.nowriter_purge_delay.is_enabled() || !durations.lease_duration.is_infinite() {
        return None;
    }
    let delay_ns = durations.nowriter_purge_delay.finite_nanos()?;
    Some(format!(
        "Invalid QoS: Reader wants to purge samples after Writer disappearance \
         (autopurge_nowriter_samples_delay = {:.1} ms), \
         but liveliness lease_duration is infinite.\n\
         → DDS can never detect Writer loss.\n\
         Recommendation: set a finite lease_duration to enable liveliness loss detection.",
        millis(delay_ns)
    ))
}
