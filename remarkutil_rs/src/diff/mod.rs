//! Location-based remark diff.
//!
//! Both streams are bucketed by [`DebugLocation`]. At each location:
//! 1. remarks with a structurally equal counterpart in the other stream are
//!    dropped as unchanged;
//! 2. the remaining remarks of A are paired greedily with the first unmatched
//!    remark of B that shares their header (name, function, pass);
//! 3. whatever is still unmatched is reported as only-in-A / only-in-B, and
//!    each pair gets a positional argument diff.
//!
//! The pairing in step 2 is first-match, not an optimal assignment. With
//! several same-header candidates the result depends on stream order.

mod location;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::DiffConfig;
use crate::error::Result;
use crate::filter::Filter;
use crate::parser::create_parser;
use crate::remark::{Argument, Remark, RemarkType};

pub use location::{DebugLocation, RemarkBuckets};

/// Switches controlling what ends up in a diff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Drop remarks that exist in only one stream.
    pub only_common: bool,
    /// Report only remarks unique to one stream; skip same-header pairs.
    pub only_different: bool,
    /// Keep same-header pairs only when their types differ.
    pub type_diff_only: bool,
    /// Keep same-header pairs only when types agree and arguments differ.
    pub arg_diff_only: bool,
    /// Compare argument debug locations too.
    pub strict_arg_compare: bool,
    /// Include unchanged arguments in reports.
    pub verbose: bool,
}

impl DiffOptions {
    fn keeps(&self, pair: &DiffAtRemark) -> bool {
        if !self.type_diff_only && !self.arg_diff_only {
            return true;
        }
        (self.type_diff_only && pair.type_diff.is_some())
            || (self.arg_diff_only && pair.type_diff.is_none() && pair.has_arg_diff())
    }
}

/// Differences between two remarks sharing a header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffAtRemark {
    /// The remark from stream A; its header identifies the pair.
    pub base: Remark,
    /// `(type in A, type in B)` when the outcome changed.
    pub type_diff: Option<(RemarkType, RemarkType)>,
    pub common_args: Vec<Argument>,
    pub only_a_args: Vec<Argument>,
    pub only_b_args: Vec<Argument>,
}

impl DiffAtRemark {
    /// Compares arguments by position. Unequal arguments at the same index
    /// land on both sides; the tail of the longer list goes to its own side.
    pub fn compute(a: &Remark, b: &Remark, strict: bool) -> Self {
        let mut diff = Self {
            base: a.clone(),
            type_diff: (a.remark_type != b.remark_type).then_some((a.remark_type, b.remark_type)),
            common_args: Vec::new(),
            only_a_args: Vec::new(),
            only_b_args: Vec::new(),
        };

        for (arg_a, arg_b) in a.args.iter().zip(&b.args) {
            if arg_a.same_as(arg_b, strict) {
                diff.common_args.push(arg_a.clone());
            } else {
                diff.only_a_args.push(arg_a.clone());
                diff.only_b_args.push(arg_b.clone());
            }
        }

        let shared = a.args.len().min(b.args.len());
        diff.only_a_args.extend_from_slice(&a.args[shared..]);
        diff.only_b_args.extend_from_slice(&b.args[shared..]);
        diff
    }

    pub fn has_arg_diff(&self) -> bool {
        !self.only_a_args.is_empty() || !self.only_b_args.is_empty()
    }
}

/// Diff result for one location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffAtLocation {
    pub location: DebugLocation,
    pub only_a: Vec<Remark>,
    pub only_b: Vec<Remark>,
    pub same_header: Vec<DiffAtRemark>,
}

impl DiffAtLocation {
    pub fn is_empty(&self) -> bool {
        self.only_a.is_empty() && self.only_b.is_empty() && self.same_header.is_empty()
    }
}

/// Diffs the remarks found at a single location in streams A and B.
pub fn diff_at_location(
    location: &DebugLocation,
    remarks_a: &[Remark],
    remarks_b: &[Remark],
    options: &DiffOptions,
) -> DiffAtLocation {
    let strict = options.strict_arg_compare;
    let mut found_a = vec![false; remarks_a.len()];
    let mut found_b = vec![false; remarks_b.len()];

    for (i, ra) in remarks_a.iter().enumerate() {
        for (j, rb) in remarks_b.iter().enumerate() {
            if ra.same_as(rb, strict) {
                found_a[i] = true;
                found_b[j] = true;
            }
        }
    }

    let mut pairs = Vec::new();
    for (i, ra) in remarks_a.iter().enumerate() {
        if found_a[i] {
            continue;
        }
        let candidate = remarks_b
            .iter()
            .enumerate()
            .position(|(j, rb)| !found_b[j] && ra.has_same_header(rb));
        if let Some(j) = candidate {
            found_a[i] = true;
            found_b[j] = true;
            pairs.push((i, j));
        }
    }

    let mut diff = DiffAtLocation {
        location: location.clone(),
        ..Default::default()
    };
    if !options.only_common {
        diff.only_a = unmatched(remarks_a, &found_a);
        diff.only_b = unmatched(remarks_b, &found_b);
    }
    if options.only_different {
        return diff;
    }

    diff.same_header = pairs
        .into_iter()
        .map(|(i, j)| DiffAtRemark::compute(&remarks_a[i], &remarks_b[j], strict))
        .filter(|pair| options.keeps(pair))
        .collect();
    diff
}

fn unmatched(remarks: &[Remark], found: &[bool]) -> Vec<Remark> {
    remarks
        .iter()
        .zip(found)
        .filter(|(_, found)| !**found)
        .map(|(remark, _)| remark.clone())
        .collect()
}

/// Diffs every location present in either stream: A's locations in
/// first-seen order, then locations only B has. Empty results are kept.
pub fn compute_diff(
    a: &RemarkBuckets,
    b: &RemarkBuckets,
    options: &DiffOptions,
) -> Vec<DiffAtLocation> {
    a.locations()
        .chain(b.locations().filter(|loc| !a.contains(loc)))
        .map(|loc| diff_at_location(loc, a.get(loc), b.get(loc), options))
        .collect()
}

/// Parses, filters and diffs two remark buffers.
///
/// Both streams are read completely before any comparison; a parse error in
/// either one aborts the diff.
pub fn diff_remarks(config: &DiffConfig, buffer_a: &str, buffer_b: &str) -> Result<Vec<DiffAtLocation>> {
    let filter = Filter::new(&config.filter)?;
    let a = RemarkBuckets::from_source(create_parser(config.format, buffer_a), &filter)?;
    let b = RemarkBuckets::from_source(create_parser(config.format, buffer_b), &filter)?;
    if a.is_empty() != b.is_empty() {
        warn!(
            empty_side = if a.is_empty() { "A" } else { "B" },
            "one remark stream has no remarks after filtering"
        );
    }
    let diff = compute_diff(&a, &b, &config.options);
    debug!(
        remarks_a = a.remark_count(),
        remarks_b = b.remark_count(),
        locations_a = a.len(),
        locations_b = b.len(),
        locations = diff.len(),
        changed = diff.iter().filter(|d| !d.is_empty()).count(),
        "diff finished"
    );
    Ok(diff)
}
