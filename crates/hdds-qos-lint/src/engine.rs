// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Evaluation of a writer/reader profile pair.
//!
//! Order is fixed and reproducible: enabled single-profile rules over the
//! writer, the same rules over the reader, then enabled cross-profile rules
//! once. Rules never short-circuit each other; every enabled rule runs.

use crate::diagnostic::{Diagnostic, Report, Scope};
use crate::profile::Profile;
use crate::rules::RuleSet;
use crate::timing::TimingContext;

/// Runs a [`RuleSet`] over profile pairs.
#[derive(Debug, Clone, Default)]
pub struct Linter {
    rules: RuleSet,
}

impl Linter {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate already-parsed profiles.
    pub fn evaluate(&self, writer: &Profile, reader: &Profile, timing: &TimingContext) -> Report {
        log::debug!(
            "[QOS-LINT] evaluate pp={}ms rtt={}ms required_depth={}",
            timing.publish_period_ms(),
            timing.rtt_ms(),
            timing.required_depth()
        );

        let mut report = Report::default();

        for (scope, profile) in [(Scope::Writer, writer), (Scope::Reader, reader)] {
            for rule in self.rules.active_single() {
                if let Some(message) = (rule.check)(profile, timing) {
                    log::debug!("[QOS-LINT] {} fired on {scope} ({})", rule.id, rule.severity);
                    report.push(Diagnostic {
                        rule: rule.id,
                        severity: rule.severity,
                        scope,
                        message,
                    });
                }
            }
        }

        for rule in self.rules.active_cross() {
            if let Some(message) = (rule.check)(writer, reader) {
                log::debug!("[QOS-LINT] {} fired on writer/reader ({})", rule.id, rule.severity);
                report.push(Diagnostic {
                    rule: rule.id,
                    severity: rule.severity,
                    scope: Scope::Cross,
                    message,
                });
            }
        }

        log::debug!(
            "[QOS-LINT] evaluation done: {} finding(s), highest={:?}",
            report.len(),
            report.highest_severity()
        );
        report
    }

    /// Parse both raw texts and evaluate them.
    pub fn check_xml(&self, writer_xml: &str, reader_xml: &str, timing: &TimingContext) -> Report {
        let writer = Profile::parse(writer_xml);
        let reader = Profile::parse(reader_xml);
        self.evaluate(&writer, &reader, timing)
    }
}

/// Evaluate a raw profile pair with the shipped rule set.
///
/// ```
/// use hdds_qos_lint::{evaluate, Severity, TimingContext};
///
/// let writer = "<durability><kind>TRANSIENT_LOCAL</kind></durability>";
/// let reader = "<reliability><kind>BEST_EFFORT</kind></reliability>";
/// let timing = TimingContext::new(40, 50).unwrap();
///
/// let report = evaluate(writer, reader, &timing);
/// assert!(report.fired("durability_needs_reliable"));
/// assert_eq!(report.highest_severity(), Some(Severity::Critical));
/// ```
pub fn evaluate(writer_xml: &str, reader_xml: &str, timing: &TimingContext) -> Report {
    Linter::default().check_xml(writer_xml, reader_xml, timing)
}
