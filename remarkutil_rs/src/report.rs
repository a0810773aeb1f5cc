//! Report writers.
//!
//! Count reports are written as CSV or JSON; diff reports as a human-readable
//! listing or as a versioned JSON document. Writers only format data that the
//! counters and the diff engine already computed.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::colors::Painter;
use crate::counter::CountReport;
use crate::diff::{DebugLocation, DiffAtLocation, DiffAtRemark, DiffOptions};
use crate::remark::{Argument, Remark, RemarkType};

/// Version of the JSON diff document layout.
pub const DIFF_SCHEMA_VERSION: u32 = 1;

const LOCATION_SEPARATOR: &str = "----------";
const SECTION_END: &str = "=====";
const ONLY_A_TITLE: &str = "Only at A >>>>";
const ONLY_B_TITLE: &str = "Only at B <<<<";
const SAME_HEADER_TITLE: &str = "--- Has the same header ---";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CountStyle {
    #[default]
    Csv,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DiffStyle {
    #[default]
    Human,
    Json,
}

// ============================================================================
// Count reports
// ============================================================================

pub fn write_count<W: Write>(out: &mut W, report: &CountReport, style: CountStyle) -> io::Result<()> {
    match style {
        CountStyle::Csv => write_count_csv(out, report),
        CountStyle::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)
        }
    }
}

/// Header `<group column>,<columns...>`, then one line per group.
pub fn write_count_csv<W: Write>(out: &mut W, report: &CountReport) -> io::Result<()> {
    let header: Vec<String> = std::iter::once(report.group_by.as_str())
        .chain(report.columns.iter().map(String::as_str))
        .map(csv_field)
        .collect();
    writeln!(out, "{}", header.join(","))?;

    for row in &report.rows {
        write!(out, "{}", csv_field(&row.group))?;
        for value in &row.values {
            write!(out, ",{value}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ============================================================================
// Human diff
// ============================================================================

/// Writes every non-empty location as a block:
///
/// ```text
/// ----------
/// f.c:foo Ln 10 Col 1
/// Only at A >>>>
/// ...
/// =====
/// Only at B <<<<
/// ...
/// =====
/// --- Has the same header ---
/// ...
/// ```
pub fn write_diff_human<W: Write>(
    out: &mut W,
    diffs: &[DiffAtLocation],
    options: &DiffOptions,
    painter: Painter,
) -> io::Result<()> {
    let printer = HumanPrinter { options, painter };
    for diff in diffs.iter().filter(|d| !d.is_empty()) {
        printer.location(out, diff)?;
    }
    Ok(())
}

struct HumanPrinter<'a> {
    options: &'a DiffOptions,
    painter: Painter,
}

impl HumanPrinter<'_> {
    fn location<W: Write>(&self, out: &mut W, diff: &DiffAtLocation) -> io::Result<()> {
        writeln!(out, "{}", self.painter.dim(LOCATION_SEPARATOR))?;
        writeln!(out, "{}", self.painter.location(&diff.location.to_string()))?;

        if !diff.only_a.is_empty() {
            writeln!(out, "{}", self.painter.only_a(ONLY_A_TITLE))?;
            self.remarks(out, &diff.only_a)?;
            writeln!(out, "{SECTION_END}")?;
        }
        if !diff.only_b.is_empty() {
            writeln!(out, "{}", self.painter.only_b(ONLY_B_TITLE))?;
            self.remarks(out, &diff.only_b)?;
            writeln!(out, "{SECTION_END}")?;
        }
        if !diff.same_header.is_empty() {
            writeln!(out, "{}", self.painter.header(SAME_HEADER_TITLE))?;
            for pair in &diff.same_header {
                self.pair(out, pair)?;
            }
        }
        Ok(())
    }

    fn remarks<W: Write>(&self, out: &mut W, remarks: &[Remark]) -> io::Result<()> {
        for (idx, remark) in remarks.iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }
            self.remark_header(out, remark)?;
            writeln!(out, "Type: {}", remark.remark_type)?;
            if !remark.args.is_empty() {
                writeln!(out, "Args:")?;
                for arg in &remark.args {
                    writeln!(out, "\t{}", self.arg(arg))?;
                }
            }
        }
        Ok(())
    }

    fn remark_header<W: Write>(&self, out: &mut W, remark: &Remark) -> io::Result<()> {
        writeln!(out, "Name: {}", remark.remark_name)?;
        writeln!(out, "FunctionName: {}", remark.function_name)?;
        writeln!(out, "PassName: {}", remark.pass_name)
    }

    fn pair<W: Write>(&self, out: &mut W, pair: &DiffAtRemark) -> io::Result<()> {
        self.remark_header(out, &pair.base)?;
        if let Some((type_a, type_b)) = pair.type_diff {
            writeln!(out, "{}", self.painter.only_a(ONLY_A_TITLE))?;
            writeln!(out, "Type: {}", self.painter.changed(type_a.as_str()))?;
            writeln!(out, "{SECTION_END}")?;
            writeln!(out, "{}", self.painter.only_b(ONLY_B_TITLE))?;
            writeln!(out, "Type: {}", self.painter.changed(type_b.as_str()))?;
            writeln!(out, "{SECTION_END}")?;
        }
        if !pair.only_a_args.is_empty() {
            writeln!(out, "{}", self.painter.only_a(ONLY_A_TITLE))?;
            for arg in &pair.only_a_args {
                writeln!(out, "{}", self.arg(arg))?;
            }
            writeln!(out, "{SECTION_END}")?;
        }
        if !pair.only_b_args.is_empty() {
            writeln!(out, "{}", self.painter.only_b(ONLY_B_TITLE))?;
            for arg in &pair.only_b_args {
                writeln!(out, "{}", self.arg(arg))?;
            }
            writeln!(out, "{SECTION_END}")?;
        }
        if self.options.verbose {
            for arg in &pair.common_args {
                writeln!(out, "{}", self.arg(arg))?;
            }
        }
        Ok(())
    }

    fn arg(&self, arg: &Argument) -> String {
        match (&arg.location, self.options.strict_arg_compare) {
            (Some(loc), true) => format!("{}: {} ({loc})", arg.key, arg.value),
            _ => format!("{}: {}", arg.key, arg.value),
        }
    }
}

// ============================================================================
// JSON diff
// ============================================================================

#[derive(Serialize)]
struct DiffDocument<'a> {
    version: u32,
    files: DiffFiles<'a>,
    diff: Vec<LocationJson<'a>>,
}

#[derive(Serialize)]
struct DiffFiles<'a> {
    a: &'a str,
    b: &'a str,
}

#[derive(Serialize)]
struct LocationJson<'a> {
    location: &'a DebugLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    only_a: Option<Vec<RemarkJson<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    only_b: Option<Vec<RemarkJson<'a>>>,
    same_header: Vec<PairJson<'a>>,
}

#[derive(Serialize)]
struct RemarkJson<'a> {
    name: &'a str,
    function: &'a str,
    pass: &'a str,
    #[serde(rename = "type")]
    remark_type: RemarkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<&'a [Argument]>,
}

#[derive(Serialize)]
struct TypeDiffJson {
    a: RemarkType,
    b: RemarkType,
}

#[derive(Serialize)]
struct PairJson<'a> {
    name: &'a str,
    function: &'a str,
    pass: &'a str,
    /// Present when both sides agree on the type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    remark_type: Option<RemarkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_diff: Option<TypeDiffJson>,
    args_only_a: &'a [Argument],
    args_only_b: &'a [Argument],
    #[serde(skip_serializing_if = "Option::is_none")]
    args_in_both: Option<&'a [Argument]>,
}

impl<'a> RemarkJson<'a> {
    fn new(remark: &'a Remark, verbose: bool) -> Self {
        Self {
            name: &remark.remark_name,
            function: &remark.function_name,
            pass: &remark.pass_name,
            remark_type: remark.remark_type,
            args: verbose.then_some(remark.args.as_slice()),
        }
    }
}

impl<'a> PairJson<'a> {
    fn new(pair: &'a DiffAtRemark, verbose: bool) -> Self {
        Self {
            name: &pair.base.remark_name,
            function: &pair.base.function_name,
            pass: &pair.base.pass_name,
            remark_type: pair.type_diff.is_none().then_some(pair.base.remark_type),
            type_diff: pair.type_diff.map(|(a, b)| TypeDiffJson { a, b }),
            args_only_a: &pair.only_a_args,
            args_only_b: &pair.only_b_args,
            args_in_both: verbose.then_some(pair.common_args.as_slice()),
        }
    }
}

fn remarks_json(remarks: &[Remark], verbose: bool) -> Vec<RemarkJson<'_>> {
    remarks.iter().map(|r| RemarkJson::new(r, verbose)).collect()
}

/// Writes the versioned JSON diff document. Empty locations are omitted.
pub fn write_diff_json<W: Write>(
    out: &mut W,
    diffs: &[DiffAtLocation],
    options: &DiffOptions,
    file_a: &str,
    file_b: &str,
) -> io::Result<()> {
    let verbose = options.verbose;
    let document = DiffDocument {
        version: DIFF_SCHEMA_VERSION,
        files: DiffFiles { a: file_a, b: file_b },
        diff: diffs
            .iter()
            .filter(|d| !d.is_empty())
            .map(|d| LocationJson {
                location: &d.location,
                only_a: (!options.only_common).then(|| remarks_json(&d.only_a, verbose)),
                only_b: (!options.only_common).then(|| remarks_json(&d.only_b, verbose)),
                same_header: d.same_header.iter().map(|p| PairJson::new(p, verbose)).collect(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CountRow;
    use crate::diff::diff_at_location;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).expect("write to vec");
        String::from_utf8(buf).expect("utf8 output")
    }

    fn sample_count() -> CountReport {
        CountReport {
            group_by: "Source".into(),
            columns: vec!["Count".into()],
            rows: vec![
                CountRow {
                    group: "a.c".into(),
                    values: vec![3],
                },
                CountRow {
                    group: "dir,with,commas/b.c".into(),
                    values: vec![1],
                },
            ],
        }
    }

    fn type_change() -> Vec<DiffAtLocation> {
        let a = Remark::new(RemarkType::Missed, "inline", "Inline", "foo")
            .at("f.c", 10, 1)
            .arg("reason", "too-big");
        let mut b = a.clone();
        b.remark_type = RemarkType::Passed;
        vec![diff_at_location(
            &DebugLocation::of(&a),
            &[a],
            &[b],
            &DiffOptions::default(),
        )]
    }

    #[test]
    fn test_count_csv() {
        let out = render(|buf| write_count(buf, &sample_count(), CountStyle::Csv));
        assert_eq!(out, "Source,Count\na.c,3\n\"dir,with,commas/b.c\",1\n");
    }

    #[test]
    fn test_count_json() {
        let out = render(|buf| write_count(buf, &sample_count(), CountStyle::Json));
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["group_by"], "Source");
        assert_eq!(value["rows"][0]["values"][0], 3);
    }

    #[test]
    fn test_human_type_change() {
        let options = DiffOptions::default();
        let out = render(|buf| write_diff_human(buf, &type_change(), &options, Painter::plain()));
        let expected = "\
----------
f.c:foo Ln 10 Col 1
--- Has the same header ---
Name: Inline
FunctionName: foo
PassName: inline
Only at A >>>>
Type: Missed
=====
Only at B <<<<
Type: Passed
=====
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_human_same_type_pair_prints_only_arg_changes() {
        let a = Remark::new(RemarkType::Analysis, "asm-printer", "InstructionCount", "bar")
            .at("b.c", 10, 0)
            .arg("NumInstructions", "42");
        let b = Remark::new(RemarkType::Analysis, "asm-printer", "InstructionCount", "bar")
            .at("b.c", 10, 0)
            .arg("NumInstructions", "40");
        let diff = vec![diff_at_location(
            &DebugLocation::of(&a),
            &[a],
            &[b],
            &DiffOptions::default(),
        )];
        let out = render(|buf| write_diff_human(buf, &diff, &DiffOptions::default(), Painter::plain()));
        let expected = "\
----------
b.c:bar Ln 10 Col 0
--- Has the same header ---
Name: InstructionCount
FunctionName: bar
PassName: asm-printer
Only at A >>>>
NumInstructions: 42
=====
Only at B <<<<
NumInstructions: 40
=====
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_human_verbose_lists_common_args() {
        let options = DiffOptions {
            verbose: true,
            ..Default::default()
        };
        let out = render(|buf| write_diff_human(buf, &type_change(), &options, Painter::plain()));
        assert!(out.ends_with("=====\nreason: too-big\n"));
    }

    #[test]
    fn test_human_skips_empty_locations() {
        let empty = vec![DiffAtLocation::default()];
        let out = render(|buf| {
            write_diff_human(buf, &empty, &DiffOptions::default(), Painter::plain())
        });
        assert!(out.is_empty());
    }

    #[test]
    fn test_human_only_sections() {
        let only = Remark::new(RemarkType::Passed, "licm", "Hoisted", "foo")
            .at("f.c", 2, 3)
            .arg("Inst", "load");
        let diff = vec![diff_at_location(
            &DebugLocation::of(&only),
            &[only.clone(), only.clone()],
            &[],
            &DiffOptions::default(),
        )];
        let out = render(|buf| write_diff_human(buf, &diff, &DiffOptions::default(), Painter::plain()));
        assert!(out.contains("Only at A >>>>\nName: Hoisted\n"));
        assert!(out.contains("Args:\n\tInst: load\n\nName: Hoisted"));
        assert!(!out.contains("Only at B"));
    }

    #[test]
    fn test_json_document_shape() {
        let options = DiffOptions::default();
        let out = render(|buf| write_diff_json(buf, &type_change(), &options, "a.yaml", "b.yaml"));
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["version"], 1);
        assert_eq!(value["files"]["a"], "a.yaml");
        let loc = &value["diff"][0];
        assert_eq!(loc["location"]["file"], "f.c");
        assert_eq!(loc["location"]["line"], 10);
        assert_eq!(loc["only_a"].as_array().map(Vec::len), Some(0));
        let pair = &loc["same_header"][0];
        assert_eq!(pair["type_diff"]["a"], "Missed");
        assert_eq!(pair["type_diff"]["b"], "Passed");
        assert!(pair.get("type").is_none());
        assert!(pair.get("args_in_both").is_none());
    }

    #[test]
    fn test_json_only_common_omits_unique_lists() {
        let options = DiffOptions {
            only_common: true,
            verbose: true,
            ..Default::default()
        };
        let out = render(|buf| write_diff_json(buf, &type_change(), &options, "a", "b"));
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        let loc = &value["diff"][0];
        assert!(loc.get("only_a").is_none());
        assert_eq!(loc["same_header"][0]["args_in_both"][0]["key"], "reason");
    }
}
