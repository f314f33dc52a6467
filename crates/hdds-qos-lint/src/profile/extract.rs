// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tag probing over raw profile text.
//!
//! Profiles are not parsed as XML documents: malformed or partial files
//! still yield whatever known fields can be found. Every pattern is
//! case-insensitive, spans line breaks and keeps only the FIRST match in
//! the text, so a profile with repeated blocks resolves to the earliest one.

use super::{PolicyDurations, QosRecord};
use crate::duration::{is_infinity_sentinel, parse_duration_field, total_nanos, QosDuration};
use regex::Regex;
use std::sync::OnceLock;

/// `<sec>` / `<nanosec>` pair directly following an opening tag.
const SEC_NANOSEC: &str = r"(?:[^<]*?<\s*sec\s*>([^<]*)</\s*sec\s*>)?(?:[^<]*?<\s*nanosec\s*>([^<]*)</\s*nanosec\s*>)?";

struct Patterns {
    reliability: Regex,
    durability: Regex,
    history: Regex,
    history_depth: Regex,
    ownership: Regex,
    destination_order: Regex,
    max_samples: Regex,
    max_instances: Regex,
    max_samples_per_instance: Regex,
    autodispose: Regex,
    autoenable: Regex,
    liveliness: Regex,
    autopurge_disposed_delay_sec: Regex,
    user_data: Regex,
    deadline: Regex,
    lease_duration: Regex,
    announcement_period: Regex,
    nowriter_delay: Regex,
    lifespan_block: Regex,
    sec: Regex,
    nanosec: Regex,
    partition_block: Regex,
    partition_name: Regex,
}

fn compile(pattern: &str) -> Regex {
    // Every pattern is built from literals in this module.
    Regex::new(pattern).expect("QoS field pattern must compile")
}

fn kind_in(block: &str) -> Regex {
    compile(&format!(
        r"(?is)<\s*{block}\s*>.*?<\s*kind\s*>\s*(\w+)\s*</\s*kind\s*>.*?</\s*{block}\s*>"
    ))
}

fn count_in(block: &str, field: &str) -> Regex {
    compile(&format!(
        r"(?is)<\s*{block}\s*>.*?<\s*{field}\s*>\s*(\d+)\s*</\s*{field}\s*>"
    ))
}

fn duration_under(prefix: &str) -> Regex {
    compile(&format!(r"(?is){prefix}{SEC_NANOSEC}"))
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        reliability: kind_in("reliability"),
        durability: kind_in("durability(?:Qos)?"),
        history: kind_in("historyQos"),
        history_depth: count_in("historyQos", "depth"),
        ownership: kind_in("ownership"),
        destination_order: kind_in("destinationOrder"),
        max_samples: count_in("resourceLimitsQos", "max_samples"),
        max_instances: count_in("resourceLimitsQos", "max_instances"),
        max_samples_per_instance: count_in("resourceLimitsQos", "max_samples_per_instance"),
        autodispose: compile(
            r"(?is)<\s*writerDataLifecycle\s*>.*?<\s*autodispose_unregistered_instances\s*>\s*(\w+)\s*</\s*autodispose_unregistered_instances\s*>.*?</\s*writerDataLifecycle\s*>",
        ),
        autoenable: compile(
            r"(?is)<\s*autoenable_created_entities\s*>\s*(\w+)\s*</\s*autoenable_created_entities\s*>",
        ),
        liveliness: kind_in("liveliness"),
        autopurge_disposed_delay_sec: compile(
            r"(?is)<\s*readerDataLifecycle\s*>.*?<\s*autopurge_disposed_samples_delay\s*>.*?<\s*sec\s*>\s*(\d+)\s*</\s*sec\s*>",
        ),
        user_data: compile(r"(?is)<\s*userData\s*>.*?<\s*value\s*>([^<]+)</\s*value\s*>"),
        deadline: duration_under(r"<\s*deadline\s*>[^<]*?<\s*period\s*>"),
        lease_duration: duration_under(r"<\s*liveliness\s*>.*?<\s*lease_duration\s*>"),
        announcement_period: duration_under(r"<\s*liveliness\s*>.*?<\s*announcement_period\s*>"),
        nowriter_delay: duration_under(
            r"<\s*readerDataLifecycle\s*>.*?<\s*autopurge_nowriter_samples_delay\s*>",
        ),
        lifespan_block: compile(r"(?is)<\s*lifespan\s*>.*?</\s*lifespan\s*>"),
        sec: compile(r"(?is)<\s*sec\s*>([^<]*)</\s*sec\s*>"),
        nanosec: compile(r"(?is)<\s*nanosec\s*>([^<]*)</\s*nanosec\s*>"),
        partition_block: compile(r"(?is)<\s*partition\s*>.*?</\s*partition\s*>"),
        partition_name: compile(r"(?is)<\s*name\s*>([^<]+)</\s*name\s*>"),
    })
}

/// First capture of the first match, or `None`.
fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn upper(re: &Regex, text: &str) -> String {
    first_capture(re, text)
        .map(|value| value.trim().to_ascii_uppercase())
        .unwrap_or_default()
}

fn digits(value: &str) -> String {
    let value = value.trim();
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        value.to_string()
    } else {
        String::new()
    }
}

fn count(re: &Regex, text: &str) -> String {
    first_capture(re, text).map(digits).unwrap_or_default()
}

/// Build the attribute record. Total: absent fields are empty strings.
pub(super) fn record(raw: &str) -> QosRecord {
    let p = patterns();
    let (nowriter_sec, nowriter_nsec) = p
        .nowriter_delay
        .captures(raw)
        .map(|caps| {
            (
                caps.get(1).map(|m| digits(m.as_str())).unwrap_or_default(),
                caps.get(2).map(|m| digits(m.as_str())).unwrap_or_default(),
            )
        })
        .unwrap_or_default();

    QosRecord {
        reliability: upper(&p.reliability, raw),
        durability: upper(&p.durability, raw),
        ownership: upper(&p.ownership, raw),
        history: upper(&p.history, raw),
        history_depth: count(&p.history_depth, raw),
        destination_order: upper(&p.destination_order, raw),
        max_samples: count(&p.max_samples, raw),
        max_instances: count(&p.max_instances, raw),
        max_samples_per_instance: count(&p.max_samples_per_instance, raw),
        autodispose: upper(&p.autodispose, raw),
        autoenable: upper(&p.autoenable, raw),
        liveliness: upper(&p.liveliness, raw),
        nowriter_purge_sec: nowriter_sec,
        nowriter_purge_nsec: nowriter_nsec,
        autopurge_disposed_delay_sec: count(&p.autopurge_disposed_delay_sec, raw),
        user_data: upper(&p.user_data, raw),
        partition_list: partition_list(raw),
    }
}

/// Duration policies of one profile.
pub(super) fn durations(raw: &str) -> PolicyDurations {
    let p = patterns();
    PolicyDurations {
        deadline: duration(&p.deadline, raw, false),
        lease_duration: duration(&p.lease_duration, raw, false),
        announcement_period: duration(&p.announcement_period, raw, false),
        lifespan: lifespan(raw),
        nowriter_purge_delay: duration(&p.nowriter_delay, raw, true),
    }
}

/// Sub-field text that is neither a number nor an infinity sentinel.
fn unreadable(field: Option<&str>) -> bool {
    field.is_some_and(|text| {
        let text = text.trim();
        !text.is_empty() && !is_infinity_sentinel(text) && text.parse::<u64>().is_err()
    })
}

/// Read one duration. With `needs_field`, a tag holding neither `<sec>`
/// nor `<nanosec>`, or holding unreadable text, stays `Unset` instead of
/// reading as zero.
fn duration(re: &Regex, raw: &str, needs_field: bool) -> QosDuration {
    let Some(caps) = re.captures(raw) else {
        return QosDuration::Unset;
    };
    let sec = caps.get(1).map(|m| m.as_str());
    let nanosec = caps.get(2).map(|m| m.as_str());
    let absent = sec.is_none() && nanosec.is_none();
    if needs_field && (absent || unreadable(sec) || unreadable(nanosec)) {
        return QosDuration::Unset;
    }
    total_nanos(
        parse_duration_field(sec.unwrap_or_default()),
        parse_duration_field(nanosec.unwrap_or_default()),
    )
}

/// Lifespan sub-fields are searched inside the first lifespan block only.
fn lifespan(raw: &str) -> QosDuration {
    let p = patterns();
    let Some(block) = p.lifespan_block.find(raw) else {
        return QosDuration::Unset;
    };
    let block = block.as_str();
    let sec = first_capture(&p.sec, block);
    let nanosec = first_capture(&p.nanosec, block);
    if sec.is_none() && nanosec.is_none() {
        return QosDuration::Unset;
    }
    total_nanos(
        parse_duration_field(sec.unwrap_or_default()),
        parse_duration_field(nanosec.unwrap_or_default()),
    )
}

/// Partition names of the first partition block; `[""]` (the default
/// partition) when there is no block or it names nothing.
fn partition_list(raw: &str) -> Vec<String> {
    let p = patterns();
    let names: Vec<String> = p
        .partition_block
        .find(raw)
        .map(|block| {
            p.partition_name
                .captures_iter(block.as_str())
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    if names.is_empty() {
        vec![String::new()]
    } else {
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FASTDDS_WRITER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<profiles xmlns="http://www.eprosima.com/XMLSchemas/fastRTPS_Profiles">
  <data_writer profile_name="sensor_writer">
    <topic>
      <historyQos>
        <kind>KEEP_LAST</kind>
        <depth>5</depth>
      </historyQos>
      <resourceLimitsQos>
        <max_samples>100</max_samples>
        <max_instances>10</max_instances>
        <max_samples_per_instance>10</max_samples_per_instance>
      </resourceLimitsQos>
    </topic>
    <qos>
      <reliability><kind>RELIABLE</kind></reliability>
      <durability><kind>TRANSIENT_LOCAL</kind></durability>
      <ownership><kind>exclusive</kind></ownership>
      <destinationOrder><kind>BY_SOURCE_TIMESTAMP</kind></destinationOrder>
      <liveliness>
        <kind>AUTOMATIC</kind>
        <lease_duration><sec>2</sec><nanosec>500</nanosec></lease_duration>
        <announcement_period><sec>DURATION_INFINITY</sec></announcement_period>
      </liveliness>
      <deadline><period><sec>0</sec><nanosec>100000000</nanosec></period></deadline>
      <lifespan><duration><sec>1</sec></duration></lifespan>
      <writerDataLifecycle>
        <autodispose_unregistered_instances>true</autodispose_unregistered_instances>
      </writerDataLifecycle>
      <partition><names><name>robot_1</name><name> arm </name></names></partition>
      <userData><value>abc</value></userData>
    </qos>
  </data_writer>
</profiles>"#;

    #[test]
    fn test_record_from_fastdds_profile() {
        let qos = record(FASTDDS_WRITER);
        assert_eq!(qos.reliability, "RELIABLE");
        assert_eq!(qos.durability, "TRANSIENT_LOCAL");
        assert_eq!(qos.ownership, "EXCLUSIVE");
        assert_eq!(qos.history, "KEEP_LAST");
        assert_eq!(qos.history_depth, "5");
        assert_eq!(qos.destination_order, "BY_SOURCE_TIMESTAMP");
        assert_eq!(qos.max_samples, "100");
        assert_eq!(qos.max_instances, "10");
        assert_eq!(qos.max_samples_per_instance, "10");
        assert_eq!(qos.autodispose, "TRUE");
        assert_eq!(qos.liveliness, "AUTOMATIC");
        assert_eq!(qos.user_data, "ABC");
        assert_eq!(qos.autoenable, "");
        assert_eq!(qos.partition_list, vec!["robot_1", "arm"]);
    }

    #[test]
    fn test_durations_from_fastdds_profile() {
        let d = durations(FASTDDS_WRITER);
        assert_eq!(d.deadline, QosDuration::Finite(100_000_000));
        assert_eq!(d.lease_duration, QosDuration::Finite(2_000_000_500));
        assert_eq!(d.announcement_period, QosDuration::Infinite);
        assert_eq!(d.lifespan, QosDuration::from_secs(1));
        assert_eq!(d.nowriter_purge_delay, QosDuration::Unset);
    }

    #[test]
    fn test_empty_text_is_all_absent() {
        let qos = record("");
        assert_eq!(qos.reliability, "");
        assert_eq!(qos.history_depth, "");
        assert_eq!(qos.partition_list, vec![String::new()]);

        let d = durations("");
        assert_eq!(d, PolicyDurations::default());
    }

    #[test]
    fn test_first_match_wins() {
        let raw = "<reliability><kind>BEST_EFFORT</kind></reliability>\
                   <reliability><kind>RELIABLE</kind></reliability>";
        assert_eq!(record(raw).reliability, "BEST_EFFORT");
    }

    #[test]
    fn test_case_insensitive_and_multiline() {
        let raw = "<RELIABILITY>\n  <Kind>\n reliable\n </Kind>\n</RELIABILITY>";
        assert_eq!(record(raw).reliability, "RELIABLE");
    }

    #[test]
    fn test_durability_qos_spelling() {
        let raw = "<durabilityQos><kind>PERSISTENT</kind></durabilityQos>";
        assert_eq!(record(raw).durability, "PERSISTENT");
    }

    #[test]
    fn test_non_digit_count_is_empty() {
        let raw = "<historyQos><kind>KEEP_LAST</kind><depth>-1</depth></historyQos>";
        let qos = record(raw);
        assert_eq!(qos.history, "KEEP_LAST");
        assert_eq!(qos.history_depth, "");
    }

    #[test]
    fn test_max_samples_does_not_match_per_instance() {
        let raw = "<resourceLimitsQos><max_samples_per_instance>4</max_samples_per_instance>\
                   </resourceLimitsQos>";
        let qos = record(raw);
        assert_eq!(qos.max_samples, "");
        assert_eq!(qos.max_samples_per_instance, "4");
    }

    #[test]
    fn test_deadline_tag_without_fields_is_zero() {
        let raw = "<deadline><period></period></deadline>";
        assert_eq!(durations(raw).deadline, QosDuration::Finite(0));
    }

    #[test]
    fn test_deadline_sentinels() {
        let raw = "<deadline><period><sec>4294967295</sec><nanosec>0</nanosec></period></deadline>";
        assert_eq!(durations(raw).deadline, QosDuration::Infinite);

        let raw = "<deadline><period><sec>DURATION_INFINITY</sec></period></deadline>";
        assert_eq!(durations(raw).deadline, QosDuration::Infinite);
    }

    #[test]
    fn test_lifespan_confined_to_block() {
        let raw = "<lifespan></lifespan><deadline><period><sec>3</sec></period></deadline>";
        assert_eq!(durations(raw).lifespan, QosDuration::Unset);

        let raw = "<lifespan><duration><nanosec>250000000</nanosec></duration></lifespan>";
        assert_eq!(durations(raw).lifespan, QosDuration::Finite(250_000_000));
    }

    #[test]
    fn test_nowriter_delay() {
        let raw = "<readerDataLifecycle><autopurge_nowriter_samples_delay>\
                   <sec>DURATION_INFINITY</sec></autopurge_nowriter_samples_delay>\
                   </readerDataLifecycle>";
        assert_eq!(durations(raw).nowriter_purge_delay, QosDuration::Infinite);
        let qos = record(raw);
        assert_eq!(qos.nowriter_purge_sec, "");
        assert_eq!(qos.nowriter_purge_nsec, "");

        let raw = "<readerDataLifecycle><autopurge_nowriter_samples_delay>\
                   <sec>2</sec><nanosec>0</nanosec></autopurge_nowriter_samples_delay>\
                   </readerDataLifecycle>";
        assert_eq!(durations(raw).nowriter_purge_delay, QosDuration::from_secs(2));
        assert_eq!(record(raw).nowriter_purge_sec, "2");

        let raw = "<readerDataLifecycle><autopurge_nowriter_samples_delay>\
                   </autopurge_nowriter_samples_delay></readerDataLifecycle>";
        assert_eq!(durations(raw).nowriter_purge_delay, QosDuration::Unset);

        let raw = "<readerDataLifecycle><autopurge_nowriter_samples_delay>\
                   <sec>abc</sec><nanosec>0</nanosec></autopurge_nowriter_samples_delay>\
                   </readerDataLifecycle>";
        assert_eq!(durations(raw).nowriter_purge_delay, QosDuration::Unset);
        assert_eq!(record(raw).nowriter_purge_sec, "");
    }

    #[test]
    fn test_autopurge_disposed_delay() {
        let raw = "<readerDataLifecycle><autopurge_disposed_samples_delay>\
                   <sec>0</sec></autopurge_disposed_samples_delay></readerDataLifecycle>";
        assert_eq!(record(raw).autopurge_disposed_delay_sec, "0");
    }

    #[test]
    fn test_partition_block_without_names_is_default() {
        assert_eq!(partition_list("<partition></partition>"), vec![String::new()]);
        assert_eq!(
            partition_list("<partition><names><name>a</name></names></partition><partition><names><name>b</name></names></partition>"),
            vec!["a"]
        );
    }
}
