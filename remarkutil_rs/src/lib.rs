//! # remarkutil
//!
//! Summarize and compare compiler optimization remarks.
//!
//! Remarks are the structured diagnostics an optimizing compiler emits per
//! decision ("inlined", "not vectorized", ...). This crate reads remark
//! streams and answers two questions:
//!
//! - **Count** - how many remarks (or how much of a numeric argument) fall
//!   into each source file / function / the whole input
//! - **Diff** - which remarks changed between two compilations, matched by
//!   debug location
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,no_run
//! use remarkutil::config::CountConfig;
//! use remarkutil::counter::count_remarks;
//!
//! let yaml = std::fs::read_to_string("build/foo.opt.yaml").unwrap();
//! let report = count_remarks(&CountConfig::default(), &yaml).unwrap();
//! for row in &report.rows {
//!     println!("{} {:?}", row.group, row.values);
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! remarkutil count foo.opt.yaml --group-by function
//! remarkutil count foo.opt.yaml --count-by key --rkeys '^Num'
//! remarkutil diff old.opt.yaml new.opt.yaml --only-show-common-remarks
//! remarkutil diff old.opt.yaml new.opt.yaml --report-style json -o diff.json
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Remark data model: [`Remark`], [`Argument`], [`RemarkType`].
pub mod remark;

/// Remark stream readers.
///
/// - [`parser::YamlRemarkParser`] - multi-document YAML (`--- !Missed ...`)
/// - [`parser::JsonLinesParser`] - one JSON remark per line
pub mod parser;

/// Literal / regex matching and the remark [`Filter`].
pub mod filter;

/// Grouping keys for counting reports.
pub mod group;

/// Existence and keyed-sum counters.
pub mod counter;

/// Location-bucketed remark diffing.
pub mod diff;

// ============================================================================
// Ambient
// ============================================================================

pub mod cli;
pub mod colors;
pub mod config;
pub mod error;
pub mod io;

/// CSV, human and JSON report writers.
pub mod report;

// ============================================================================
// Re-exports
// ============================================================================

pub use counter::{CountBy, CountReport, Counter, KeyCounter, RemarkCounter, count_remarks};
pub use diff::{DebugLocation, DiffAtLocation, DiffAtRemark, DiffOptions, diff_remarks};
pub use error::{RemarkError, Result};
pub use filter::{Filter, Matcher};
pub use group::GroupBy;
pub use remark::{Argument, Remark, RemarkType, SourceLocation};
