// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! History / resource-limits consistency and destination-order buffering.

use crate::profile::Profile;
use crate::timing::TimingContext;

/// KEEP_LAST depth times instances must fit in `max_samples`.
pub(super) fn keep_last_sample_budget(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if !qos.is_keep_last() {
        return None;
    }
    let depth = qos.history_depth()?;
    let max_samples = qos.max_samples()?;
    let instances = qos.max_instances()?;
    if max_samples < depth.saturating_mul(instances) {
        return Some(format!(
            "KEEP_LAST({depth}) with {instances} instances exceeds max_samples ({max_samples}).\n\
             Recommendation: set max_samples ≥ depth×instances, or switch to KEEP_ALL."
        ));
    }
    None
}

/// KEEP_LAST needs a positive depth.
pub(super) fn keep_last_depth_positive(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if !qos.is_keep_last() {
        return None;
    }
    match qos.history_depth() {
        None => Some(
            "KEEP_LAST requires a positive depth, but depth is missing or not numeric.".to_string(),
        ),
        Some(0) => Some(
            "Invalid QoS: KEEP_LAST requires depth > 0 but depth is 0.\n\
             Recommendation: set <historyQos><depth> to a positive integer (e.g. 1, 2 …)."
                .to_string(),
        ),
        Some(_) => None,
    }
}

/// KEEP_LAST depth above `max_samples_per_instance`, or KEEP_ALL that may
/// store nothing per instance.
pub(super) fn history_vs_max_per_instance(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    let per_instance = qos.max_samples_per_instance()?;

    if qos.is_keep_last() {
        let depth = qos.history_depth()?;
        if depth > per_instance {
            return Some(format!(
                "Invalid QoS: KEEP_LAST depth={depth} exceeds max_samples_per_instance={per_instance}.\n\
                 Recommendation: increase max_samples_per_instance or reduce history depth."
            ));
        }
    } else if qos.is_keep_all() && per_instance == 0 {
        return Some(
            "Invalid QoS: KEEP_ALL with max_samples_per_instance=0 stores no samples at all.\n\
             Recommendation: set max_samples_per_instance to a positive value."
                .to_string(),
        );
    }
    None
}

pub(super) fn max_samples_vs_per_instance(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    let max_samples = qos.max_samples()?;
    let per_instance = qos.max_samples_per_instance()?;
    if max_samples < per_instance {
        return Some(format!(
            "Invalid QoS: max_samples ({max_samples}) is less than \
             max_samples_per_instance ({per_instance}).\n\
             This setting prevents even a single instance from storing the expected number of samples.\n\
             Recommendation: increase max_samples ≥ max_samples_per_instance."
        ));
    }
    None
}

/// BY_SOURCE_TIMESTAMP has no reordering room with depth <= 1.
pub(super) fn dest_order_vs_depth(profile: &Profile, _timing: &TimingContext) -> Option<String> {
    let qos = profile.qos();
    if !qos.is_by_source_timestamp() {
        return None;
    }
    if qos.history_depth()? <= 1 {
        return Some(
            "BY_SOURCE_TIMESTAMP with history depth ≤ 1 may drop out-of-order samples \
             due to lack of reordering buffer.\n\
             Recommendation: increase history depth to at least 2 when using BY_SOURCE_TIMESTAMP."
                .to_string(),
        );
    }
    None
}

pub(super) fn dest_order_keep_all_single_slot(
    profile: &Profile,
    _timing: &TimingContext,
) -> Option<String> {
    let qos = profile.qos();
    if qos.is_by_source_timestamp() && qos.is_keep_all() && qos.max_samples_per_instance == "1" {
        return Some(
            "Invalid QoS: BY_SOURCE_TIMESTAMP + KEEP_ALL + max_samples_per_instance = 1 \
             does not provide sufficient buffer to reorder samples.\n\
             Recommendation: increase max_samples_per_instance > 1 \
             or switch to destination_order = BY_RECEPTION_TIMESTAMP."
                .to_string(),
        );
    }
    None
}
