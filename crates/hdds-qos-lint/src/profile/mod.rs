// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Normalized view of one writer or reader QoS profile.
//!
//! A [`Profile`] is built once from raw text and never mutated. It carries
//! the raw text, the string-valued [`QosRecord`] and the five duration
//! policies the rules compare against each other.

mod extract;

use crate::duration::QosDuration;
use crate::kinds::{
    DestinationOrderKind, DurabilityKind, HistoryKind, LivelinessKind, OwnershipKind,
    ReliabilityKind,
};
use serde::Serialize;
use std::collections::BTreeSet;

/// Attribute record of one profile.
///
/// Kind values are trimmed and uppercased, counts are digit-only strings.
/// A field absent from the text is the empty string, never an error; rules
/// read "empty" as "no assertion".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct QosRecord {
    pub reliability: String,
    pub durability: String,
    pub ownership: String,
    /// History kind.
    pub history: String,
    pub history_depth: String,
    pub destination_order: String,
    pub max_samples: String,
    pub max_instances: String,
    pub max_samples_per_instance: String,
    /// `writerDataLifecycle/autodispose_unregistered_instances`.
    pub autodispose: String,
    /// `autoenable_created_entities`.
    pub autoenable: String,
    /// Liveliness kind.
    pub liveliness: String,
    pub nowriter_purge_sec: String,
    pub nowriter_purge_nsec: String,
    pub autopurge_disposed_delay_sec: String,
    pub user_data: String,
    /// Partition names in document order; `[""]` for the default partition.
    pub partition_list: Vec<String>,
}

fn count(value: &str) -> Option<u64> {
    if value.is_empty() {
        return None;
    }
    // Digit-only by construction; overflow saturates.
    Some(value.parse::<u64>().unwrap_or(u64::MAX))
}

impl QosRecord {
    pub fn reliability_kind(&self) -> Option<ReliabilityKind> {
        ReliabilityKind::parse(&self.reliability)
    }

    pub fn durability_kind(&self) -> Option<DurabilityKind> {
        DurabilityKind::parse(&self.durability)
    }

    pub fn history_kind(&self) -> Option<HistoryKind> {
        HistoryKind::parse(&self.history)
    }

    pub fn ownership_kind(&self) -> Option<OwnershipKind> {
        OwnershipKind::parse(&self.ownership)
    }

    pub fn destination_order_kind(&self) -> Option<DestinationOrderKind> {
        DestinationOrderKind::parse(&self.destination_order)
    }

    pub fn liveliness_kind(&self) -> Option<LivelinessKind> {
        LivelinessKind::parse(&self.liveliness)
    }

    /// TRANSIENT_LOCAL, TRANSIENT or PERSISTENT durability.
    pub fn is_durable(&self) -> bool {
        self.durability_kind().is_some_and(DurabilityKind::is_durable)
    }

    /// VOLATILE, or no durability kind at all (VOLATILE is the default).
    pub fn is_volatile(&self) -> bool {
        self.durability.is_empty()
            || self.durability_kind() == Some(DurabilityKind::Volatile)
    }

    pub fn is_reliable(&self) -> bool {
        self.reliability_kind() == Some(ReliabilityKind::Reliable)
    }

    /// Reliability explicitly BEST_EFFORT (an absent kind does not count).
    pub fn is_best_effort(&self) -> bool {
        self.reliability_kind() == Some(ReliabilityKind::BestEffort)
    }

    pub fn is_exclusive(&self) -> bool {
        self.ownership_kind() == Some(OwnershipKind::Exclusive)
    }

    pub fn is_keep_last(&self) -> bool {
        self.history_kind() == Some(HistoryKind::KeepLast)
    }

    pub fn is_keep_all(&self) -> bool {
        self.history_kind() == Some(HistoryKind::KeepAll)
    }

    pub fn is_by_source_timestamp(&self) -> bool {
        self.destination_order_kind() == Some(DestinationOrderKind::BySourceTimestamp)
    }

    pub fn autodispose_enabled(&self) -> bool {
        self.autodispose == "TRUE"
    }

    pub fn autodispose_disabled(&self) -> bool {
        self.autodispose == "FALSE"
    }

    pub fn autoenable_disabled(&self) -> bool {
        self.autoenable == "FALSE"
    }

    pub fn history_depth(&self) -> Option<u64> {
        count(&self.history_depth)
    }

    pub fn max_samples(&self) -> Option<u64> {
        count(&self.max_samples)
    }

    pub fn max_instances(&self) -> Option<u64> {
        count(&self.max_instances)
    }

    pub fn max_samples_per_instance(&self) -> Option<u64> {
        count(&self.max_samples_per_instance)
    }

    /// Partition names as a set (duplicates collapse).
    pub fn partition_set(&self) -> BTreeSet<&str> {
        self.partition_list.iter().map(String::as_str).collect()
    }
}

/// Duration policies of one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PolicyDurations {
    /// `deadline/period`.
    pub deadline: QosDuration,
    /// `liveliness/lease_duration`.
    pub lease_duration: QosDuration,
    /// `liveliness/announcement_period`.
    pub announcement_period: QosDuration,
    /// `lifespan/duration`.
    pub lifespan: QosDuration,
    /// `readerDataLifecycle/autopurge_nowriter_samples_delay`.
    pub nowriter_purge_delay: QosDuration,
}

/// One parsed profile side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    raw: String,
    qos: QosRecord,
    durations: PolicyDurations,
}

impl Profile {
    /// Scan `raw` for every known field. Never fails.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let qos = extract::record(&raw);
        let durations = extract::durations(&raw);
        Self {
            raw,
            qos,
            durations,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn qos(&self) -> &QosRecord {
        &self.qos
    }

    pub fn durations(&self) -> &PolicyDurations {
        &self.durations
    }
}

impl From<&str> for Profile {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let profile = Profile::parse(
            "<reliability><kind>RELIABLE</kind></reliability>\
             <durability><kind>TRANSIENT</kind></durability>\
             <historyQos><kind>KEEP_ALL</kind></historyQos>\
             <resourceLimitsQos><max_samples_per_instance>8</max_samples_per_instance></resourceLimitsQos>",
        );
        let qos = profile.qos();
        assert!(qos.is_reliable());
        assert!(!qos.is_best_effort());
        assert!(qos.is_durable());
        assert!(qos.is_keep_all());
        assert_eq!(qos.max_samples_per_instance(), Some(8));
        assert_eq!(qos.history_depth(), None);
        assert_eq!(qos.max_samples(), None);
    }

    #[test]
    fn test_unknown_kind_is_not_durable() {
        let profile = Profile::parse("<durability><kind>SOMETIMES</kind></durability>");
        assert_eq!(profile.qos().durability, "SOMETIMES");
        assert_eq!(profile.qos().durability_kind(), None);
        assert!(!profile.qos().is_durable());
    }

    #[test]
    fn test_absent_reliability_is_not_best_effort() {
        let profile = Profile::parse("");
        assert!(!profile.qos().is_best_effort());
        assert!(!profile.qos().is_reliable());
    }

    #[test]
    fn test_partition_set_default() {
        let profile = Profile::parse("<durability><kind>VOLATILE</kind></durability>");
        assert_eq!(profile.qos().partition_set(), BTreeSet::from([""]));
    }

    #[test]
    fn test_parse_keeps_raw() {
        let raw = "<deadline><period><sec>1</sec></period></deadline>";
        let profile = Profile::from(raw);
        assert_eq!(profile.raw(), raw);
        assert_eq!(profile.durations().deadline, QosDuration::from_secs(1));
    }

    #[test]
    fn test_count_saturates() {
        let profile = Profile::parse(
            "<historyQos><kind>KEEP_LAST</kind><depth>99999999999999999999999</depth></historyQos>",
        );
        assert_eq!(profile.qos().history_depth(), Some(u64::MAX));
    }
}
