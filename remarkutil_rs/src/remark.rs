//! Remark data model.
//!
//! A [`Remark`] is one optimization decision emitted by a compiler pass: its
//! outcome, the pass and function it belongs to, an optional source location
//! and an ordered list of key/value arguments. Remarks are produced by a
//! [`crate::parser`] source and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Outcome of an optimization decision.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum RemarkType {
    #[serde(alias = "passed")]
    Passed,
    #[serde(alias = "missed")]
    Missed,
    #[serde(alias = "analysis")]
    Analysis,
    /// Floating-point commutation analysis (`!AnalysisFPCommute`).
    #[serde(rename = "AnalysisFPCommute", alias = "analysis-fp-commute")]
    #[value(name = "analysis-fp-commute")]
    AnalysisFpCommute,
    #[serde(alias = "analysis-aliasing")]
    AnalysisAliasing,
    #[serde(alias = "failure")]
    Failure,
    #[default]
    #[serde(alias = "unknown")]
    #[value(skip)]
    Unknown,
}

impl RemarkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemarkType::Passed => "Passed",
            RemarkType::Missed => "Missed",
            RemarkType::Analysis => "Analysis",
            RemarkType::AnalysisFpCommute => "AnalysisFPCommute",
            RemarkType::AnalysisAliasing => "AnalysisAliasing",
            RemarkType::Failure => "Failure",
            RemarkType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RemarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemarkType {
    type Err = String;

    /// Parses a YAML document tag (with or without the leading `!`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('!') {
            "Passed" => Ok(RemarkType::Passed),
            "Missed" => Ok(RemarkType::Missed),
            "Analysis" => Ok(RemarkType::Analysis),
            "AnalysisFPCommute" | "AnalysisFPCommentary" => Ok(RemarkType::AnalysisFpCommute),
            "AnalysisAliasing" => Ok(RemarkType::AnalysisAliasing),
            "Failure" => Ok(RemarkType::Failure),
            other => Err(format!("unknown remark type '{other}'")),
        }
    }
}

/// Debug location attached to a remark or to one of its arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// One `key: value` argument of a remark.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl Argument {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Integer value of the argument, if the value is a base-10 integer. An
    /// explicit `+` sign is not accepted.
    pub fn as_int(&self) -> Option<i64> {
        if self.value.starts_with('+') {
            return None;
        }
        self.value.parse().ok()
    }

    pub fn is_numeric(&self) -> bool {
        self.as_int().is_some()
    }

    /// Compares two arguments. Locations only take part when `strict` is set.
    pub fn same_as(&self, other: &Argument, strict: bool) -> bool {
        self.key == other.key
            && self.value == other.value
            && (!strict || self.location == other.location)
    }
}

/// A single optimization remark.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remark {
    #[serde(rename = "type")]
    pub remark_type: RemarkType,
    #[serde(rename = "pass")]
    pub pass_name: String,
    #[serde(rename = "name")]
    pub remark_name: String,
    #[serde(rename = "function")]
    pub function_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotness: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Argument>,
}

impl Remark {
    pub fn new(
        remark_type: RemarkType,
        pass_name: impl Into<String>,
        remark_name: impl Into<String>,
        function_name: impl Into<String>,
    ) -> Self {
        Self {
            remark_type,
            pass_name: pass_name.into(),
            remark_name: remark_name.into(),
            function_name: function_name.into(),
            location: None,
            hotness: None,
            args: Vec::new(),
        }
    }

    pub fn at(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.location = Some(SourceLocation {
            file: file.into(),
            line,
            column,
        });
        self
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.push(Argument::new(key, value));
        self
    }

    /// Name, function and pass: the coarse identity used to pair remarks
    /// across two streams.
    pub fn has_same_header(&self, other: &Remark) -> bool {
        self.remark_name == other.remark_name
            && self.function_name == other.function_name
            && self.pass_name == other.pass_name
    }

    /// Full structural equality over header, type and the ordered arguments.
    /// Hotness and the remark location are not compared.
    pub fn same_as(&self, other: &Remark, strict: bool) -> bool {
        self.has_same_header(other)
            && self.remark_type == other.remark_type
            && self.args.len() == other.args.len()
            && self
                .args
                .iter()
                .zip(&other.args)
                .all(|(a, b)| a.same_as(b, strict))
    }

    /// First argument with `key` that carries an integer value.
    pub fn int_value(&self, key: &str) -> Option<i64> {
        self.args
            .iter()
            .filter(|arg| arg.key == key)
            .find_map(Argument::as_int)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_values_reject_plus_sign() {
        assert_eq!(Argument::new("Cost", "25").as_int(), Some(25));
        assert_eq!(Argument::new("Cost", "-3").as_int(), Some(-3));
        assert_eq!(Argument::new("Cost", "+5").as_int(), None);
        assert_eq!(Argument::new("Cost", " 5").as_int(), None);
        assert!(!Argument::new("Cost", "+5").is_numeric());

        let remark = Remark::new(RemarkType::Missed, "inline", "TooCostly", "f")
            .arg("Cost", "+5")
            .arg("Cost", "7");
        assert_eq!(remark.int_value("Cost"), Some(7));
    }

    #[test]
    fn test_type_from_tag() {
        assert_eq!("!Missed".parse::<RemarkType>(), Ok(RemarkType::Missed));
        assert_eq!(
            "AnalysisFPCommute".parse::<RemarkType>(),
            Ok(RemarkType::AnalysisFpCommute)
        );
        assert!("!Bogus".parse::<RemarkType>().is_err());
    }

    #[test]
    fn test_argument_numeric() {
        assert_eq!(Argument::new("Cost", "42").as_int(), Some(42));
        assert_eq!(Argument::new("Cost", "-3").as_int(), Some(-3));
        assert!(!Argument::new("Callee", "foo").is_numeric());
        assert!(!Argument::new("Cost", " 4").is_numeric());
    }

    #[test]
    fn test_int_value_skips_non_numeric_duplicates() {
        let remark = Remark::new(RemarkType::Analysis, "regalloc", "Spills", "f")
            .arg("NumSpills", "n/a")
            .arg("NumSpills", "7");
        assert_eq!(remark.int_value("NumSpills"), Some(7));
        assert_eq!(remark.int_value("Missing"), None);
    }

    #[test]
    fn test_strict_compare_includes_arg_location() {
        let loc = SourceLocation {
            file: "a.c".into(),
            line: 3,
            column: 1,
        };
        let a = Argument::new("Callee", "bar").with_location(loc);
        let b = Argument::new("Callee", "bar");
        assert!(a.same_as(&b, false));
        assert!(!a.same_as(&b, true));
    }

    #[test]
    fn test_same_header_ignores_type() {
        let a = Remark::new(RemarkType::Missed, "inline", "Inline", "foo");
        let b = Remark::new(RemarkType::Passed, "inline", "Inline", "foo");
        assert!(a.has_same_header(&b));
        assert!(!a.same_as(&b, false));
    }
}
