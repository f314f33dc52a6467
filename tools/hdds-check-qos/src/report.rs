// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Report rendering for the terminal and for machines.

use colored::{ColoredString, Colorize};
use hdds_qos_lint::{Diagnostic, Report, RuleSet, Severity};

pub const ALL_SATISFIED: &str = "All QoS constraints satisfied.";

fn severity_tag(severity: Severity) -> ColoredString {
    let tag = format!("[{severity}]");
    match severity {
        Severity::Critical => tag.red().bold(),
        Severity::Conditional => tag.yellow(),
        Severity::Incidental => tag.magenta(),
        Severity::Warn => tag.white(),
    }
}

fn render_diagnostic(diagnostic: &Diagnostic) -> String {
    let severity = severity_tag(diagnostic.severity);
    match diagnostic.scope.tag() {
        Some(side) => format!(
            "{severity} {} {}",
            format!("[{side}]").blue(),
            diagnostic.message
        ),
        None => format!("{severity} {}", diagnostic.message),
    }
}

/// `[SEVERITY] [SIDE] message` per finding, blank line between findings.
pub fn render_text(report: &Report) -> String {
    if report.is_clean() {
        return format!("{}\n", ALL_SATISFIED.green());
    }
    let mut out = String::new();
    for (idx, diagnostic) in report.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&render_diagnostic(diagnostic));
        out.push('\n');
    }
    out
}

pub fn render_json(report: &Report) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Effective rule table for `--list-rules`.
pub fn render_rules(rules: &RuleSet) -> String {
    let mut out = format!(
        "{:<36} {:<6} {:<12} {}\n",
        "RULE", "KIND", "SEVERITY", "ENABLED"
    );
    for entry in rules.entries() {
        let enabled = if entry.enabled { "yes" } else { "no" };
        out.push_str(&format!(
            "{:<36} {:<6} {:<12} {enabled}\n",
            entry.id,
            entry.kind.to_string(),
            entry.severity.as_str()
        ));
    }
    out
}
