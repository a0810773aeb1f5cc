//! Remark counting.
//!
//! Two strategies share the [`Counter`] contract:
//! - [`RemarkCounter`] counts how many remarks fall into each group.
//! - [`KeyCounter`] discovers a set of numeric argument keys in a first pass
//!   and sums their values per group in a second pass.

mod keys;
mod remarks;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CountConfig;
use crate::error::Result;
use crate::filter::Filter;
use crate::parser::create_parser;
use crate::remark::Remark;

pub use keys::{KeyCounter, key_matchers};
pub use remarks::RemarkCounter;

/// Pluggable aggregation strategy.
pub trait Counter {
    /// Accounts for one remark that already passed the filter.
    fn collect(&mut self, remark: &Remark);
    /// Final table, one row per group.
    fn report(&self) -> CountReport;
}

/// What is being counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum CountBy {
    /// Number of remarks per group.
    #[default]
    #[value(name = "remark-name")]
    #[serde(rename = "remark-name")]
    Remark,
    /// Sum of the integer values of selected argument keys per group.
    #[value(name = "key")]
    #[serde(rename = "key")]
    Keys,
}

/// Tabular count result handed to the report writers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CountReport {
    /// Title of the grouping column (`Source`, `Function`, ...).
    pub group_by: String,
    /// Value column titles: `Count`, or the discovered key names.
    pub columns: Vec<String>,
    pub rows: Vec<CountRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub group: String,
    pub values: Vec<i64>,
}

/// Feeds every remark accepted by `filter` into `counter`. Stops at the first
/// parse error; returns the number of remarks collected.
pub fn collect_remarks<I, C>(source: I, filter: &Filter, counter: &mut C) -> Result<usize>
where
    I: IntoIterator<Item = Result<Remark>>,
    C: Counter + ?Sized,
{
    let mut collected = 0;
    for remark in source {
        let remark = remark?;
        if filter.accepts(&remark) {
            counter.collect(&remark);
            collected += 1;
        }
    }
    Ok(collected)
}

/// Runs the configured counting mode over `buffer`.
///
/// Keyed counting parses the buffer twice: once to discover the key universe
/// and once to accumulate. Nothing is returned unless both passes succeed.
pub fn count_remarks(config: &CountConfig, buffer: &str) -> Result<CountReport> {
    let filter = Filter::new(&config.filter)?;
    let mut counter: Box<dyn Counter> = match config.count_by {
        CountBy::Remark => Box::new(RemarkCounter::new(config.group_by)),
        CountBy::Keys => {
            let matchers = key_matchers(&config.keys, &config.rkeys)?;
            let source = create_parser(config.format, buffer);
            let counter = KeyCounter::discover(config.group_by, &matchers, source, &filter)?;
            if counter.keys().is_empty() {
                warn!("no numeric remark argument matched the requested keys");
            }
            Box::new(counter)
        }
    };

    let collected = collect_remarks(create_parser(config.format, buffer), &filter, &mut *counter)?;
    let report = counter.report();
    debug!(
        collected,
        groups = report.rows.len(),
        columns = report.columns.len(),
        "count finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemarkError;
    use crate::group::GroupBy;
    use crate::remark::RemarkType;

    fn stream(remarks: Vec<Remark>) -> Vec<Result<Remark>> {
        remarks.into_iter().map(Ok).collect()
    }

    #[test]
    fn test_collect_applies_filter() {
        let filter = Filter {
            remark_type: Some(RemarkType::Missed),
            ..Default::default()
        };
        let mut counter = RemarkCounter::new(GroupBy::Total);
        let collected = collect_remarks(
            stream(vec![
                Remark::new(RemarkType::Missed, "inline", "A", "f"),
                Remark::new(RemarkType::Passed, "inline", "A", "f"),
                Remark::new(RemarkType::Missed, "licm", "B", "g"),
            ]),
            &filter,
            &mut counter,
        )
        .unwrap();
        assert_eq!(collected, 2);
        assert_eq!(counter.report().rows[0].values, vec![2]);
    }

    #[test]
    fn test_collect_propagates_parse_error() {
        let mut counter = RemarkCounter::new(GroupBy::Total);
        let source = vec![
            Ok(Remark::new(RemarkType::Missed, "inline", "A", "f")),
            Err(RemarkError::parse("boom")),
            Ok(Remark::new(RemarkType::Missed, "inline", "A", "f")),
        ];
        let err = collect_remarks(source, &Filter::default(), &mut counter).unwrap_err();
        assert!(matches!(err, RemarkError::StreamParse { .. }));
    }

    #[test]
    fn test_count_remarks_by_keys_over_json_lines() {
        let buffer = concat!(
            r#"{"type":"Analysis","pass":"asm-printer","name":"InstructionCount","function":"f","location":{"file":"a.c","line":1,"column":1},"args":[{"key":"NumInstructions","value":"10"}]}"#,
            "\n",
            r#"{"type":"Analysis","pass":"asm-printer","name":"InstructionCount","function":"g","location":{"file":"a.c","line":9,"column":1},"args":[{"key":"NumInstructions","value":"5"}]}"#,
            "\n",
            r#"{"type":"Analysis","pass":"asm-printer","name":"InstructionCount","function":"h","location":{"file":"b.c","line":2,"column":1},"args":[{"key":"NumInstructions","value":"7"}]}"#,
            "\n",
        );
        let config = CountConfig {
            format: crate::parser::RemarkFormat::Json,
            count_by: CountBy::Keys,
            group_by: GroupBy::PerSource,
            ..Default::default()
        };
        let report = count_remarks(&config, buffer).unwrap();
        assert_eq!(report.group_by, "Source");
        assert_eq!(report.columns, vec!["NumInstructions".to_string()]);
        assert_eq!(
            report.rows,
            vec![
                CountRow {
                    group: "a.c".into(),
                    values: vec![15]
                },
                CountRow {
                    group: "b.c".into(),
                    values: vec![7]
                },
            ]
        );
    }

    #[test]
    fn test_count_remarks_rejects_bad_key_pattern_before_reading() {
        let config = CountConfig {
            count_by: CountBy::Keys,
            rkeys: vec!["(".into()],
            ..Default::default()
        };
        // The buffer is not even valid YAML; the pattern error must win.
        let err = count_remarks(&config, ": : :").unwrap_err();
        assert!(matches!(err, RemarkError::InvalidPattern { .. }));
    }
}
