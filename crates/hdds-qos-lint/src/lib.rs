// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HDDS QoS Profile Linter
//!
//! Static checks over a writer/reader pair of QoS profiles, before any
//! participant is started.
//!
//! # Features
//!
//! - **Profile scanning**: known QoS fields are pulled out of raw profile
//!   text (Fast DDS style XML); malformed documents are scanned, not rejected
//! - **Single-profile rules**: invariants each side must satisfy on its own,
//!   some sized against the publish period and round-trip time
//! - **Cross-profile rules**: Request vs Offered compatibility and partition
//!   overlap between writer and reader
//! - **Configurable rule set**: rules are data; enable, disable or re-grade
//!   them from YAML
//!
//! # Example
//!
//! ```rust
//! use hdds_qos_lint::{Linter, Profile, Scope, TimingContext};
//!
//! let writer = Profile::parse(
//!     "<reliability><kind>RELIABLE</kind></reliability>\
//!      <historyQos><kind>KEEP_LAST</kind><depth>3</depth></historyQos>",
//! );
//! let reader = Profile::parse("<reliability><kind>RELIABLE</kind></reliability>");
//! let timing = TimingContext::new(40, 50)?;
//!
//! let report = Linter::default().evaluate(&writer, &reader, &timing);
//! let shallow: Vec<_> = report.for_scope(Scope::Writer).map(|d| d.rule).collect();
//! assert_eq!(shallow, ["reliable_keep_last_too_shallow"]);
//! # Ok::<(), hdds_qos_lint::TimingError>(())
//! ```

pub mod config;
pub mod diagnostic;
pub mod duration;
mod engine;
pub mod kinds;
pub mod profile;
pub mod rules;
mod timing;

pub use config::{RuleConfigError, RuleOverride, RuleOverrides};
pub use diagnostic::{Diagnostic, Report, Scope, Severity};
pub use duration::QosDuration;
pub use engine::{evaluate, Linter};
pub use profile::{PolicyDurations, Profile, QosRecord};
pub use rules::{CrossRule, RuleDescriptor, RuleEntry, RuleKind, RuleSet, SingleRule};
pub use timing::{parse_millis_arg, TimingContext, TimingError};
