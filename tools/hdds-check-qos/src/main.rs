// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

mod args;
mod report;

use anyhow::Context;
use args::{Cli, Format};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use hdds_qos_lint::{Linter, Profile, RuleSet, TimingContext};
use std::path::Path;
use std::process::ExitCode;

/// Exit status for unreadable inputs and configuration errors (clap uses 2 too).
const EXIT_INPUT_ERROR: u8 = 2;
const EXIT_FINDINGS: u8 = 1;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(EXIT_INPUT_ERROR)
        }
    }
}

/// Logs go to stderr; stdout carries the report only.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,hdds_qos_lint=debug,hdds_check_qos=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let rules = load_rules(cli.rules.as_deref())?;

    if cli.list_rules {
        print!("{}", report::render_rules(&rules));
        return Ok(ExitCode::SUCCESS);
    }

    let (Some(writer_path), Some(reader_path), Some(publish_period_ms), Some(rtt_ms)) = (
        cli.writer.as_deref(),
        cli.reader.as_deref(),
        cli.publish_period_ms,
        cli.rtt_ms,
    ) else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "WRITER_XML, READER_XML, publish_period=<N>ms and rtt=<N>ms are required",
            )
            .exit();
    };

    let timing = TimingContext::new(publish_period_ms, rtt_ms)
        .unwrap_or_else(|e| Cli::command().error(ErrorKind::ValueValidation, e).exit());

    let writer = load_profile(writer_path, "writer")?;
    let reader = load_profile(reader_path, "reader")?;

    let report = Linter::new(rules).evaluate(&writer, &reader, &timing);
    match cli.format {
        Format::Text => print!("{}", report::render_text(&report)),
        Format::Json => println!("{}", report::render_json(&report)?),
    }

    if cli.fail_on.is_met(report.highest_severity()) {
        log::debug!(
            "[QOS-LINT] highest severity {:?} meets --fail-on {:?}",
            report.highest_severity(),
            cli.fail_on
        );
        return Ok(ExitCode::from(EXIT_FINDINGS));
    }
    Ok(ExitCode::SUCCESS)
}

fn load_rules(path: Option<&Path>) -> anyhow::Result<RuleSet> {
    match path {
        Some(path) => RuleSet::from_file(path)
            .with_context(|| format!("failed to load rule overrides from {}", path.display())),
        None => Ok(RuleSet::default()),
    }
}

fn load_profile(path: &Path, side: &str) -> anyhow::Result<Profile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {side} profile {}", path.display()))?;
    log::debug!("[QOS-LINT] loaded {side} profile {} ({} bytes)", path.display(), raw.len());
    Ok(Profile::parse(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_profile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<reliability><kind>RELIABLE</kind></reliability>").unwrap();
        let profile = load_profile(file.path(), "writer").unwrap();
        assert!(profile.qos().is_reliable());
    }

    #[test]
    fn test_missing_profile_names_path() {
        let err = load_profile(Path::new("/nonexistent/writer.xml"), "writer").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("failed to read writer profile /nonexistent/writer.xml"));
    }

    #[test]
    fn test_load_rules() {
        assert_eq!(
            load_rules(None).unwrap().active_single().count(),
            RuleSet::builtin().active_single().count()
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rules:\n  partition_overlap: {{ enabled: false }}").unwrap();
        let rules = load_rules(Some(file.path())).unwrap();
        assert!(!rules.entry("partition_overlap").unwrap().enabled);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "rules:\n  not_a_rule: {{ enabled: true }}").unwrap();
        let err = load_rules(Some(bad.path())).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown rule id: not_a_rule"));
    }
}
