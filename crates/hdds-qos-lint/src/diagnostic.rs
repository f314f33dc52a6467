// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Severity-tagged findings and the ordered report that collects them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding severity, weakest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory; only reachable through rules enabled by configuration.
    Warn,
    /// Surprising behavior in some deployments.
    Incidental,
    /// Breaks under the given timing or load conditions.
    Conditional,
    /// Invalid or incompatible; data will not flow as configured.
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Warn,
        Severity::Incidental,
        Severity::Conditional,
        Severity::Critical,
    ];

    /// Uppercase tag used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warn => "WARN",
            Severity::Incidental => "INCIDENTAL",
            Severity::Conditional => "CONDITIONAL",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Parse a severity name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Writer,
    Reader,
    /// Writer/reader compatibility.
    Cross,
}

impl Scope {
    /// Report tag: `PUB` / `SUB`, none for cross findings.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            Scope::Writer => Some("PUB"),
            Scope::Reader => Some("SUB"),
            Scope::Cross => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Writer => f.write_str("writer"),
            Scope::Reader => f.write_str("reader"),
            Scope::Cross => f.write_str("cross"),
        }
    }
}

/// One finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Id of the rule that produced it.
    pub rule: &'static str,
    pub severity: Severity,
    pub scope: Scope,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope.tag() {
            Some(side) => write!(f, "[{}] [{side}] {}", self.severity, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Findings in evaluation order: writer rules, reader rules, then cross rules.
///
/// Append-only while the engine runs; read-only once returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// No findings at all.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of findings with exactly `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.iter().filter(|d| d.severity == severity).count()
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.iter().map(|d| d.severity).max()
    }

    pub fn for_scope(&self, scope: Scope) -> impl Iterator<Item = &Diagnostic> {
        self.iter().filter(move |d| d.scope == scope)
    }

    /// Whether a rule with this id produced a finding.
    pub fn fired(&self, rule: &str) -> bool {
        self.iter().any(|d| d.rule == rule)
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Report {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}
