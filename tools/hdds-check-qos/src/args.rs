// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use clap::{Parser, ValueEnum};
use hdds_qos_lint::{parse_millis_arg, Severity, TimingError};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hdds-check-qos")]
#[command(about = "Check a writer/reader pair of QoS profiles for invalid or incompatible settings")]
#[command(version)]
pub struct Cli {
    /// Writer (publisher side) profile
    #[arg(value_name = "WRITER_XML", required_unless_present = "list_rules")]
    pub writer: Option<PathBuf>,

    /// Reader (subscriber side) profile
    #[arg(value_name = "READER_XML", required_unless_present = "list_rules")]
    pub reader: Option<PathBuf>,

    /// Publish period, e.g. publish_period=40ms
    #[arg(
        value_name = "PUBLISH_PERIOD",
        value_parser = publish_period,
        required_unless_present = "list_rules"
    )]
    pub publish_period_ms: Option<u64>,

    /// Round-trip time, e.g. rtt=50ms
    #[arg(
        value_name = "RTT",
        value_parser = rtt,
        required_unless_present = "list_rules"
    )]
    pub rtt_ms: Option<u64>,

    /// YAML file enabling, disabling or re-grading rules
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Print the effective rule table and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Exit with status 1 when a finding reaches this severity
    #[arg(long, value_enum, default_value = "none")]
    pub fail_on: FailOn,

    /// Debug logging from the rule engine (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

fn publish_period(arg: &str) -> Result<u64, TimingError> {
    parse_millis_arg("publish_period", arg)
}

fn rtt(arg: &str) -> Result<u64, TimingError> {
    parse_millis_arg("rtt", arg)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Lowest severity that turns the exit status into a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// Never fail on findings
    #[value(name = "none")]
    Never,
    Warn,
    Incidental,
    Conditional,
    Critical,
}

impl FailOn {
    pub fn threshold(self) -> Option<Severity> {
        match self {
            FailOn::Never => None,
            FailOn::Warn => Some(Severity::Warn),
            FailOn::Incidental => Some(Severity::Incidental),
            FailOn::Conditional => Some(Severity::Conditional),
            FailOn::Critical => Some(Severity::Critical),
        }
    }

    /// Whether the highest reported severity reaches the threshold.
    pub fn is_met(self, highest: Option<Severity>) -> bool {
        match (self.threshold(), highest) {
            (Some(threshold), Some(highest)) => highest >= threshold,
            _ => false,
        }
    }
}
