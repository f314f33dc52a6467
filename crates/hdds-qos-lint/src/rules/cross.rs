// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Writer vs reader compatibility (Request vs Offered).
//!
//! Ranked kinds are compatible when `writer >= reader`. A missing or
//! unknown kind ranks as the weakest level of its taxonomy; messages show
//! the profile value, or the default name when the profile has none.

use crate::duration::{seconds, QosDuration};
use crate::kinds::{DestinationOrderKind, DurabilityKind, LivelinessKind, OwnershipKind, ReliabilityKind};
use crate::profile::Profile;
use std::collections::BTreeSet;

/// Profile value, or `default` when absent.
fn shown<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

fn secs(duration: QosDuration) -> String {
    match duration.finite_nanos() {
        Some(ns) => format!("{:.3}s", seconds(ns)),
        None => duration.to_string(),
    }
}

/// Partition sets of both sides, or `None` when they intersect.
fn disjoint_partitions<'a>(
    writer: &'a Profile,
    reader: &'a Profile,
) -> Option<(BTreeSet<&'a str>, BTreeSet<&'a str>)> {
    let w = writer.qos().partition_set();
    let r = reader.qos().partition_set();
    if w.is_disjoint(&r) {
        Some((w, r))
    } else {
        None
    }
}

fn partition_lines(writer: &BTreeSet<&str>, reader: &BTreeSet<&str>) -> String {
    format!("Writer partitions : {writer:?}\nReader partitions : {reader:?}")
}

/// Reader BY_SOURCE_TIMESTAMP needs a BY_SOURCE_TIMESTAMP writer.
pub(super) fn destination_order(writer: &Profile, reader: &Profile) -> Option<String> {
    let default = DestinationOrderKind::ByReceptionTimestamp.as_str();
    let w = shown(&writer.qos().destination_order, default);
    let r = shown(&reader.qos().destination_order, default);
    if w == DestinationOrderKind::ByReceptionTimestamp.as_str()
        && r == DestinationOrderKind::BySourceTimestamp.as_str()
    {
        return Some(
            "Incompatible destination_order_kind: Writer='BY_RECEPTION_TIMESTAMP', \
             Reader='BY_SOURCE_TIMESTAMP'.\n\
             Reader expects stricter BY_SOURCE_TIMESTAMP ordering than Writer provides.\n\
             Recommendation: set writer destination_order_kind = BY_SOURCE_TIMESTAMP, \
             or relax reader requirement to BY_RECEPTION_TIMESTAMP."
                .to_string(),
        );
    }
    None
}

pub(super) fn ownership(writer: &Profile, reader: &Profile) -> Option<String> {
    let exclusive = OwnershipKind::Exclusive.as_str();
    if reader.qos().ownership == exclusive && writer.qos().ownership != exclusive {
        return Some(
            "Reader requests EXCLUSIVE ownership but Writer is not EXCLUSIVE.\n\
             Data-instance hand-over rules will not be honoured.\n\
             Recommendation: set writer ownership_kind to EXCLUSIVE to match \
             the reader, or change reader to SHARED."
                .to_string(),
        );
    }
    None
}

pub(super) fn reliability(writer: &Profile, reader: &Profile) -> Option<String> {
    let w = writer.qos().reliability_kind().unwrap_or_default();
    let r = reader.qos().reliability_kind().unwrap_or_default();
    if w < r {
        let default = ReliabilityKind::default().as_str();
        return Some(format!(
            "Incompatible reliability_kind: Writer='{}', Reader='{}'.\n\
             Reader expects RELIABLE delivery but Writer is BEST_EFFORT.\n\
             Recommendation: set writer reliability_kind = RELIABLE, \
             or relax reader requirement to BEST_EFFORT.",
            shown(&writer.qos().reliability, default),
            shown(&reader.qos().reliability, default)
        ));
    }
    None
}

pub(super) fn durability(writer: &Profile, reader: &Profile) -> Option<String> {
    let w = writer.qos().durability_kind().unwrap_or_default();
    let r = reader.qos().durability_kind().unwrap_or_default();
    if w < r {
        let default = DurabilityKind::default().as_str();
        let reader_kind = shown(&reader.qos().durability, default);
        return Some(format!(
            "Incompatible durability_kind: Writer='{}', Reader='{reader_kind}'.\n\
             Reader expects stronger durability than Writer provides.\n\
             Recommendation: raise writer durability_kind \
             to at least '{reader_kind}', or lower reader requirement.",
            shown(&writer.qos().durability, default)
        ));
    }
    None
}

/// Writer must promise a period no longer than the reader requests.
///
/// An absent reader deadline accepts anything; a zero or infinite reader
/// period sets no bound.
pub(super) fn deadline_period(writer: &Profile, reader: &Profile) -> Option<String> {
    let w = writer.durations().deadline;
    let r = reader.durations().deadline;

    let limit_ns = match r {
        QosDuration::Unset => return None,
        QosDuration::Infinite | QosDuration::Finite(0) => None,
        QosDuration::Finite(ns) => Some(ns),
    };
    if !w.is_set() {
        return Some(
            "Incompatible DEADLINE: Reader specifies a DEADLINE period but Writer has none.\n\
             Recommendation: add a DEADLINE period to the Writer that is ≤ Reader's requirement \
             or remove DEADLINE from the Reader."
                .to_string(),
        );
    }
    let limit_ns = limit_ns?;
    let exceeds = match w {
        QosDuration::Infinite => true,
        QosDuration::Finite(ns) => ns > limit_ns,
        QosDuration::Unset => false,
    };
    if exceeds {
        return Some(format!(
            "Incompatible DEADLINE periods: Writer={} > Reader={}.\n\
             Recommendation: shorten Writer DEADLINE period or relax Reader requirement.",
            secs(w),
            secs(r)
        ));
    }
    None
}

/// Kind ranking first, then lease: writer lease must not exceed the reader's.
pub(super) fn liveliness(writer: &Profile, reader: &Profile) -> Option<String> {
    let w_kind = writer.qos().liveliness_kind().unwrap_or_default();
    let r_kind = reader.qos().liveliness_kind().unwrap_or_default();
    if w_kind < r_kind {
        let default = LivelinessKind::default().as_str();
        let reader_kind = shown(&reader.qos().liveliness, default);
        return Some(format!(
            "Incompatible liveliness_kind: Writer='{}', Reader='{reader_kind}'.\n\
             Reader expects stricter liveliness than Writer provides.\n\
             Recommendation: raise writer liveliness_kind to '{reader_kind}' \
             or lower reader requirement.",
            shown(&writer.qos().liveliness, default)
        ));
    }

    let w = writer.durations().lease_duration;
    let r = reader.durations().lease_duration;
    if !r.is_set() {
        return None;
    }
    if !w.is_set() {
        return Some(
            "Incompatible liveliness lease_duration: Reader specifies a lease_duration \
             but Writer has none."
                .to_string(),
        );
    }
    let exceeds = match (w, r) {
        (QosDuration::Finite(w_ns), QosDuration::Finite(r_ns)) => w_ns > r_ns,
        (QosDuration::Infinite, QosDuration::Finite(_)) => true,
        _ => false,
    };
    if exceeds {
        return Some(format!(
            "Incompatible liveliness lease_duration: Writer={} > Reader={}.\n\
             Recommendation: shorten writer lease_duration or relax reader requirement.",
            secs(w),
            secs(r)
        ));
    }
    None
}

/// Writer keeps instances registered while the reader never purges them.
pub(super) fn nowriter_autodispose(writer: &Profile, reader: &Profile) -> Option<String> {
    if !writer.qos().autodispose_disabled() {
        return None;
    }
    let delay = reader.durations().nowriter_purge_delay;
    if matches!(delay, QosDuration::Infinite | QosDuration::Finite(0)) {
        return Some(
            "Invalid QoS: autodispose_unregistered_instances=FALSE in the Writer \
             while Reader autopurge_nowriter_samples_delay is INFINITE/0.\n\
             Samples may never be purged when all writers disappear, causing \
             unbounded memory growth.\n\
             Recommendation: enable autodispose_unregistered_instances in the Writer \
             or set a finite autopurge_nowriter_samples_delay in the Reader."
                .to_string(),
        );
    }
    None
}

/// Partition and user_data together form the key ACL ignore filters match on.
pub(super) fn partition_userdata_key(writer: &Profile, reader: &Profile) -> Option<String> {
    let w = (&writer.qos().partition_list, &writer.qos().user_data);
    let r = (&reader.qos().partition_list, &reader.qos().user_data);
    if w != r {
        return Some(format!(
            "Partition or user_data change alters publication key; \
             ACL ignore_*() filters may mismatch, causing unintended allow or block.\n\
             Writer key : ({:?}, {:?})\n\
             Reader key : ({:?}, {:?})\n\
             Recommendation: configure identical partition & user_data, or \
             update ACL rules accordingly.",
            w.0, w.1, r.0, r.1
        ));
    }
    None
}

pub(super) fn partition_overlap(writer: &Profile, reader: &Profile) -> Option<String> {
    let (w, r) = disjoint_partitions(writer, reader)?;
    Some(format!(
        "No matching partition names between Writer and Reader; data exchange will not occur.\n\
         {}\n\
         Recommendation: configure at least one identical <partition><name> string on both sides.",
        partition_lines(&w, &r)
    ))
}

/// Durable writer in partitions the reader never joins: late joiners start empty.
pub(super) fn durable_partition_miss(writer: &Profile, reader: &Profile) -> Option<String> {
    if !writer.qos().is_durable() {
        return None;
    }
    let (w, r) = disjoint_partitions(writer, reader)?;
    Some(format!(
        "Durable samples are retransmitted only to Readers in the same partition. \
         Writer partitions and Reader partitions share no common name, \
         so late-joiner will start with an empty cache.\n\
         {}\n\
         Recommendation: configure at least one identical partition name \
         or use VOLATILE durability if replay is not required.",
        partition_lines(&w, &r)
    ))
}

pub(super) fn deadline_partition_reset(writer: &Profile, reader: &Profile) -> Option<String> {
    if !reader.durations().deadline.is_enabled() {
        return None;
    }
    let (w, r) = disjoint_partitions(writer, reader)?;
    Some(format!(
        "Partition mismatch causes the Reader to perceive the Writer as a 'new' instance, \
         resetting the DEADLINE timer. Miss detection may be masked or delayed.\n\
         {}\n\
         Recommendation: share at least one partition or disable DEADLINE \
         if Writer mobility across partitions is expected.",
        partition_lines(&w, &r)
    ))
}

/// Kind ranking and finite lease ordering, reported together.
pub(super) fn liveliness_incompatibility(writer: &Profile, reader: &Profile) -> Option<String> {
    let mut findings = Vec::new();

    let w_kind = writer.qos().liveliness_kind().unwrap_or_default();
    let r_kind = reader.qos().liveliness_kind().unwrap_or_default();
    if w_kind < r_kind {
        let default = LivelinessKind::default().as_str();
        findings.push(format!(
            "LIVELINESS.kind mismatch: Writer='{}' < Reader='{}'.\n\
             Recommendation: increase Writer's liveliness kind to match or exceed Reader's requirement.",
            shown(&writer.qos().liveliness, default),
            shown(&reader.qos().liveliness, default)
        ));
    }

    if let (Some(w_ns), Some(r_ns)) = (
        writer.durations().lease_duration.finite_nanos(),
        reader.durations().lease_duration.finite_nanos(),
    ) {
        if w_ns > r_ns {
            findings.push(format!(
                "LIVELINESS.lease_duration mismatch: Writer={:.3}s > Reader={:.3}s.\n\
                 Writer refreshes liveliness less frequently than Reader expects.\n\
                 Recommendation: set Writer lease_duration ≤ Reader lease_duration.",
                seconds(w_ns),
                seconds(r_ns)
            ));
        }
    }

    if findings.is_empty() {
        None
    } else {
        Some(format!("Invalid QoS:\n{}", findings.join("\n")))
    }
}
