// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Rule-set configuration.
//!
//! Overrides are loaded from YAML and applied on top of the shipped list:
//!
//! ```yaml
//! rules:
//!   durability_exclusive: { enabled: true }
//!   deadline_vs_durability: { severity: conditional }
//!   partition_overlap: { enabled: false }
//! ```

use crate::diagnostic::Severity;
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum RuleConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown rule id: {0}")]
    UnknownRule(String),
}

/// Override for one rule. Absent fields keep the shipped value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// Rule overrides keyed by rule id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleOverrides {
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOverride>,
}

impl RuleOverrides {
    /// Parse overrides from YAML text. An empty document means no overrides.
    pub fn from_yaml(yaml: &str) -> Result<Self, RuleConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load overrides from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RuleConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Reject ids the given rule set does not know.
    pub fn validate(&self, rules: &RuleSet) -> Result<(), RuleConfigError> {
        match self.rules.keys().find(|id| !rules.contains(id)) {
            Some(id) => Err(RuleConfigError::UnknownRule(id.clone())),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RuleSet {
    /// Shipped rules with the overrides of a YAML file applied.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RuleConfigError> {
        let overrides = RuleOverrides::from_file(path)?;
        let mut rules = Self::builtin();
        overrides.validate(&rules)?;
        rules.apply(&overrides)?;
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_overrides() {
        let yaml = r#"
rules:
  durability_exclusive: { enabled: true }
  deadline_vs_durability:
    severity: conditional
"#;
        let overrides = RuleOverrides::from_yaml(yaml).unwrap();
        assert_eq!(overrides.rules.len(), 2);
        assert_eq!(
            overrides.rules["durability_exclusive"],
            RuleOverride {
                enabled: Some(true),
                severity: None
            }
        );
        assert_eq!(
            overrides.rules["deadline_vs_durability"].severity,
            Some(Severity::Conditional)
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(RuleOverrides::from_yaml("").unwrap().is_empty());
        assert!(RuleOverrides::from_yaml("rules: {}").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_field_and_severity_rejected() {
        let err = RuleOverrides::from_yaml("rules:\n  partition_overlap: { enable: false }\n");
        assert!(matches!(err, Err(RuleConfigError::Yaml(_))));

        let err = RuleOverrides::from_yaml("rules:\n  partition_overlap: { severity: fatal }\n");
        assert!(matches!(err, Err(RuleConfigError::Yaml(_))));
    }

    #[test]
    fn test_apply_overrides() {
        let overrides = RuleOverrides::from_yaml(
            "rules:\n  durability_exclusive: { enabled: true, severity: critical }\n  partition_overlap: { enabled: false }\n",
        )
        .unwrap();
        let mut rules = RuleSet::builtin();
        rules.apply(&overrides).unwrap();

        let entry = rules.entry("durability_exclusive").unwrap();
        assert!(entry.enabled);
        assert_eq!(entry.severity, Severity::Critical);
        assert!(!rules.entry("partition_overlap").unwrap().enabled);
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let overrides = RuleOverrides::from_yaml("rules:\n  nope: {}\n").unwrap();
        let rules = RuleSet::builtin();
        assert!(matches!(
            overrides.validate(&rules),
            Err(RuleConfigError::UnknownRule(id)) if id == "nope"
        ));
        let mut rules = rules;
        assert!(rules.apply(&overrides).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rules:\n  liveliness_compat: {{ enabled: true }}").unwrap();
        let rules = RuleSet::from_file(file.path()).unwrap();
        assert!(rules.entry("liveliness_compat").unwrap().enabled);
    }

    #[test]
    fn test_missing_file() {
        let err = RuleOverrides::from_file("/nonexistent/rules.yaml").unwrap_err();
        assert!(matches!(err, RuleConfigError::Io(_)));
    }
}
