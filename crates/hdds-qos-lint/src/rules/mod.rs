// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Rule descriptors and the shipped rule set.
//!
//! A rule is a pure function plus metadata. Whether it runs, and at which
//! severity it reports, belongs to the [`RuleSet`], not to the function:
//! the set can be reconfigured (see [`RuleOverrides`]) without touching
//! rule logic.
//!
//! Single-profile rules run once per side, in list order. Cross-profile
//! rules run once per writer/reader pair, after both sides.

mod capacity;
mod cross;
mod durability;
mod history;
mod ownership;
mod reliability;
mod timers;

use crate::config::{RuleConfigError, RuleOverrides};
use crate::diagnostic::Severity;
use crate::profile::Profile;
use crate::timing::TimingContext;
use serde::Serialize;
use std::fmt;

/// Check over one profile side. Returns the finding message, if any.
pub type SingleCheck = fn(&Profile, &TimingContext) -> Option<String>;

/// Check over a (writer, reader) pair.
pub type CrossCheck = fn(&Profile, &Profile) -> Option<String>;

/// One rule: id, reporting severity, enabled flag and check function.
#[derive(Clone, Copy)]
pub struct RuleDescriptor<F> {
    pub id: &'static str,
    pub severity: Severity,
    pub enabled: bool,
    pub check: F,
}

pub type SingleRule = RuleDescriptor<SingleCheck>;
pub type CrossRule = RuleDescriptor<CrossCheck>;

impl<F> fmt::Debug for RuleDescriptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl<F> RuleDescriptor<F> {
    pub const fn new(id: &'static str, severity: Severity, enabled: bool, check: F) -> Self {
        Self {
            id,
            severity,
            enabled,
            check,
        }
    }
}

/// Which list a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Single,
    Cross,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Single => f.write_str("single"),
            RuleKind::Cross => f.write_str("cross"),
        }
    }
}

/// Metadata of one rule, for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleEntry {
    pub id: &'static str,
    pub kind: RuleKind,
    pub severity: Severity,
    pub enabled: bool,
}

const ON: bool = true;
const OFF: bool = false;

fn single_rule(id: &'static str, severity: Severity, enabled: bool, check: SingleCheck) -> SingleRule {
    RuleDescriptor::new(id, severity, enabled, check)
}

fn cross_rule(id: &'static str, severity: Severity, enabled: bool, check: CrossCheck) -> CrossRule {
    RuleDescriptor::new(id, severity, enabled, check)
}

fn builtin_single() -> Vec<SingleRule> {
    use Severity::{Conditional, Critical, Incidental, Warn};

    vec![
        single_rule("durability_needs_reliable", Critical, ON, durability::needs_reliable),
        single_rule("durability_exclusive", Warn, OFF, ownership::durable_replay),
        single_rule("dest_order_needs_reliable_durable", Warn, OFF, durability::dest_order_needs_reliable_durable),
        single_rule("deadline_vs_durability", Incidental, ON, durability::deadline_vs_durability),
        single_rule("keep_last_sample_budget", Warn, OFF, history::keep_last_sample_budget),
        single_rule("durable_keep_last_single_sample", Warn, OFF, durability::keep_last_single_sample),
        single_rule("durable_keep_all_unbounded", Warn, OFF, durability::keep_all_unbounded),
        single_rule("autodispose_vs_durability", Warn, OFF, durability::autodispose_vs_durability),
        single_rule("lease_vs_deadline", Conditional, ON, timers::lease_vs_deadline),
        single_rule("deadline_with_best_effort", Warn, OFF, reliability::deadline_with_best_effort),
        single_rule("exclusive_best_effort_deadline", Conditional, ON, ownership::best_effort_deadline),
        single_rule("autodispose_with_best_effort", Conditional, ON, reliability::autodispose_with_best_effort),
        single_rule("lifespan_vs_deadline", Critical, ON, timers::lifespan_vs_deadline),
        single_rule("history_vs_lifespan", Warn, OFF, capacity::history_vs_lifespan),
        single_rule("exclusive_with_deadline", Warn, OFF, ownership::with_deadline),
        single_rule("buffer_capacity_vs_lifespan", Warn, OFF, capacity::buffer_capacity_vs_lifespan),
        single_rule("dest_order_vs_depth", Conditional, ON, history::dest_order_vs_depth),
        single_rule("keep_last_depth_positive", Warn, OFF, history::keep_last_depth_positive),
        single_rule("history_vs_max_per_instance", Critical, ON, history::history_vs_max_per_instance),
        single_rule("best_effort_exclusive", Warn, OFF, ownership::best_effort),
        single_rule("announcement_vs_lease", Warn, OFF, timers::announcement_vs_lease),
        single_rule("autoenable_vs_volatile", Incidental, ON, durability::autoenable_vs_volatile),
        single_rule("max_samples_vs_per_instance", Critical, ON, history::max_samples_vs_per_instance),
        single_rule("dest_order_keep_all_single_slot", Conditional, ON, history::dest_order_keep_all_single_slot),
        single_rule("autopurge_disposed_vs_durability", Incidental, ON, durability::autopurge_disposed_vs_durability),
        single_rule("manual_by_topic_partition", Incidental, ON, timers::manual_by_topic_partition),
        single_rule("autodispose_with_exclusive", Incidental, ON, ownership::autodispose),
        single_rule("lifespan_short_for_durability", Conditional, ON, durability::lifespan_short_for_durability),
        single_rule("exclusive_lease_infinite", Conditional, ON, ownership::lease_infinite),
        single_rule("nowriter_purge_vs_infinite_lease", Conditional, ON, timers::nowriter_purge_vs_infinite_lease),
        single_rule("reliable_keep_last_too_shallow", Conditional, ON, capacity::reliable_keep_last_too_shallow),
        single_rule("reliable_keep_all_too_small", Conditional, ON, capacity::reliable_keep_all_too_small),
        single_rule("lifespan_short_for_reliability", Conditional, ON, reliability::lifespan_short_for_reliability),
        single_rule("best_effort_manual_by_topic", Conditional, ON, reliability::best_effort_manual_by_topic),
        single_rule("deadline_short_for_exclusive", Conditional, ON, ownership::deadline_too_short),
        single_rule("lease_short_for_exclusive", Conditional, ON, ownership::lease_too_short),
        single_rule("durable_keep_all_too_small", Conditional, ON, capacity::durable_keep_all_too_small),
        single_rule("durable_keep_last_too_shallow", Conditional, ON, capacity::durable_keep_last_too_shallow),
        single_rule("durable_keep_all_too_large", Conditional, ON, capacity::durable_keep_all_too_large),
        single_rule("durable_keep_last_too_deep", Conditional, ON, capacity::durable_keep_last_too_deep),
        single_rule("exclusive_deadline_infinite", Conditional, ON, ownership::deadline_infinite),
        single_rule("lifespan_exceeds_per_instance", Conditional, ON, capacity::lifespan_exceeds_per_instance),
        single_rule("keep_last_lifespan_overflow", Conditional, ON, capacity::keep_last_lifespan_overflow),
    ]
}

fn builtin_cross() -> Vec<CrossRule> {
    use Severity::{Conditional, Critical, Incidental, Warn};

    vec![
        cross_rule("destination_order_compat", Critical, ON, cross::destination_order),
        cross_rule("ownership_compat", Critical, ON, cross::ownership),
        cross_rule("reliability_compat", Critical, ON, cross::reliability),
        cross_rule("durability_compat", Critical, ON, cross::durability),
        cross_rule("deadline_period_compat", Critical, ON, cross::deadline_period),
        cross_rule("liveliness_compat", Warn, OFF, cross::liveliness),
        cross_rule("nowriter_autodispose", Conditional, ON, cross::nowriter_autodispose),
        cross_rule("partition_userdata_key", Warn, OFF, cross::partition_userdata_key),
        cross_rule("partition_overlap", Critical, ON, cross::partition_overlap),
        cross_rule("durable_partition_miss", Incidental, ON, cross::durable_partition_miss),
        cross_rule("deadline_partition_reset", Incidental, ON, cross::deadline_partition_reset),
        cross_rule("liveliness_incompatibility", Critical, ON, cross::liveliness_incompatibility),
    ]
}

/// Ordered single-profile and cross-profile rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    single: Vec<SingleRule>,
    cross: Vec<CrossRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleSet {
    /// The shipped rule list, disabled entries included.
    pub fn builtin() -> Self {
        Self {
            single: builtin_single(),
            cross: builtin_cross(),
        }
    }

    /// A custom list. Ids should be unique across both lists.
    pub fn from_rules(single: Vec<SingleRule>, cross: Vec<CrossRule>) -> Self {
        Self { single, cross }
    }

    pub fn single(&self) -> &[SingleRule] {
        &self.single
    }

    pub fn cross(&self) -> &[CrossRule] {
        &self.cross
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entry(id).is_some()
    }

    /// Metadata for one rule id.
    pub fn entry(&self, id: &str) -> Option<RuleEntry> {
        self.entries().find(|entry| entry.id == id)
    }

    /// Metadata of every rule: single rules first, then cross rules.
    pub fn entries(&self) -> impl Iterator<Item = RuleEntry> + '_ {
        let single = self.single.iter().map(|r| RuleEntry {
            id: r.id,
            kind: RuleKind::Single,
            severity: r.severity,
            enabled: r.enabled,
        });
        let cross = self.cross.iter().map(|r| RuleEntry {
            id: r.id,
            kind: RuleKind::Cross,
            severity: r.severity,
            enabled: r.enabled,
        });
        single.chain(cross)
    }

    /// Enabled single-profile rules in order.
    pub fn active_single(&self) -> impl Iterator<Item = &SingleRule> {
        self.single.iter().filter(|r| r.enabled)
    }

    /// Enabled cross-profile rules in order.
    pub fn active_cross(&self) -> impl Iterator<Item = &CrossRule> {
        self.cross.iter().filter(|r| r.enabled)
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<(), RuleConfigError> {
        self.update(id, |enabled_flag, _| *enabled_flag = enabled)
    }

    pub fn set_severity(&mut self, id: &str, severity: Severity) -> Result<(), RuleConfigError> {
        self.update(id, |_, severity_slot| *severity_slot = severity)
    }

    /// Apply every override; stops at the first unknown id.
    pub fn apply(&mut self, overrides: &RuleOverrides) -> Result<(), RuleConfigError> {
        for (id, rule) in &overrides.rules {
            if let Some(enabled) = rule.enabled {
                self.set_enabled(id, enabled)?;
                log::info!("[QOS-LINT] rule {id} enabled={enabled}");
            }
            if let Some(severity) = rule.severity {
                self.set_severity(id, severity)?;
                log::info!("[QOS-LINT] rule {id} severity={severity}");
            }
            if rule.enabled.is_none() && rule.severity.is_none() && !self.contains(id) {
                return Err(RuleConfigError::UnknownRule(id.clone()));
            }
        }
        Ok(())
    }

    fn update(
        &mut self,
        id: &str,
        apply: impl FnOnce(&mut bool, &mut Severity),
    ) -> Result<(), RuleConfigError> {
        if let Some(rule) = self.single.iter_mut().find(|r| r.id == id) {
            apply(&mut rule.enabled, &mut rule.severity);
            return Ok(());
        }
        if let Some(rule) = self.cross.iter_mut().find(|r| r.id == id) {
            apply(&mut rule.enabled, &mut rule.severity);
            return Ok(());
        }
        Err(RuleConfigError::UnknownRule(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_shape() {
        let rules = RuleSet::builtin();
        assert_eq!(rules.single().len(), 43);
        assert_eq!(rules.cross().len(), 12);
        assert_eq!(rules.active_single().count(), 30);
        assert_eq!(rules.active_cross().count(), 10);
    }

    #[test]
    fn test_ids_unique() {
        let rules = RuleSet::builtin();
        let ids: HashSet<_> = rules.entries().map(|e| e.id).collect();
        assert_eq!(ids.len(), rules.entries().count());
    }

    #[test]
    fn test_disabled_rules_carry_warn() {
        for entry in RuleSet::builtin().entries().filter(|e| !e.enabled) {
            assert_eq!(entry.severity, Severity::Warn, "{}", entry.id);
        }
    }

    #[test]
    fn test_first_rule_order() {
        let rules = RuleSet::builtin();
        assert_eq!(rules.single()[0].id, "durability_needs_reliable");
        assert_eq!(rules.cross()[0].id, "destination_order_compat");
        assert_eq!(
            rules.cross().last().map(|r| r.id),
            Some("liveliness_incompatibility")
        );
    }

    #[test]
    fn test_set_enabled_and_severity() {
        let mut rules = RuleSet::builtin();
        rules.set_enabled("durability_exclusive", true).unwrap();
        rules
            .set_severity("partition_overlap", Severity::Conditional)
            .unwrap();

        let entry = rules.entry("durability_exclusive").unwrap();
        assert!(entry.enabled);
        assert_eq!(entry.kind, RuleKind::Single);

        let entry = rules.entry("partition_overlap").unwrap();
        assert_eq!(entry.severity, Severity::Conditional);
        assert_eq!(entry.kind, RuleKind::Cross);
    }

    #[test]
    fn test_unknown_rule() {
        let mut rules = RuleSet::builtin();
        let err = rules.set_enabled("no_such_rule", true).unwrap_err();
        assert!(matches!(err, RuleConfigError::UnknownRule(id) if id == "no_such_rule"));
    }
}
