//! Grouping keys for counting reports.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::remark::Remark;

/// How counted remarks are bucketed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GroupBy {
    /// One bucket for the whole input.
    Total,
    /// Source file of the remark's debug location.
    #[default]
    #[value(name = "source")]
    #[serde(rename = "source")]
    PerSource,
    /// Function the remark was emitted for.
    #[value(name = "function")]
    #[serde(rename = "function")]
    PerFunction,
    /// Source file and function, joined by `:`.
    #[value(name = "function-with-loc")]
    #[serde(rename = "function-with-loc")]
    PerFunctionWithLoc,
}

impl GroupBy {
    /// Column title used in report headers.
    pub fn column_name(&self) -> &'static str {
        match self {
            GroupBy::Total => "Total",
            GroupBy::PerSource => "Source",
            GroupBy::PerFunction => "Function",
            GroupBy::PerFunctionWithLoc => "FunctionWithDebugLoc",
        }
    }

    /// Key the remark is counted under. Location-based modes yield `None`
    /// for remarks without a debug location; those remarks are skipped.
    pub fn group_key(&self, remark: &Remark) -> Option<String> {
        match self {
            GroupBy::Total => Some("Total".to_string()),
            GroupBy::PerFunction => Some(remark.function_name.clone()),
            GroupBy::PerSource => remark.location.as_ref().map(|loc| loc.file.clone()),
            GroupBy::PerFunctionWithLoc => remark
                .location
                .as_ref()
                .map(|loc| format!("{}:{}", loc.file, remark.function_name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remark::RemarkType;

    #[test]
    fn test_group_keys() {
        let located = Remark::new(RemarkType::Missed, "inline", "X", "foo").at("a.c", 1, 1);
        assert_eq!(GroupBy::Total.group_key(&located).as_deref(), Some("Total"));
        assert_eq!(GroupBy::PerFunction.group_key(&located).as_deref(), Some("foo"));
        assert_eq!(GroupBy::PerSource.group_key(&located).as_deref(), Some("a.c"));
        assert_eq!(
            GroupBy::PerFunctionWithLoc.group_key(&located).as_deref(),
            Some("a.c:foo")
        );
    }

    #[test]
    fn test_location_modes_skip_unlocated_remarks() {
        let bare = Remark::new(RemarkType::Missed, "inline", "X", "foo");
        assert_eq!(GroupBy::PerSource.group_key(&bare), None);
        assert_eq!(GroupBy::PerFunctionWithLoc.group_key(&bare), None);
        assert_eq!(GroupBy::PerFunction.group_key(&bare).as_deref(), Some("foo"));
    }
}
