use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{CountReport, CountRow, Counter};
use crate::error::Result;
use crate::filter::{Filter, Matcher};
use crate::group::GroupBy;
use crate::remark::Remark;

/// Pattern used when no key selection is configured.
const ALL_KEYS: &str = ".*";

/// Builds key matchers. Literal keys take precedence over patterns; with
/// neither, every key matches.
pub fn key_matchers(keys: &[String], rkeys: &[String]) -> Result<Vec<Matcher>> {
    if !keys.is_empty() {
        return Ok(keys.iter().map(Matcher::literal).collect());
    }
    if !rkeys.is_empty() {
        return rkeys.iter().map(|key| Matcher::pattern(key)).collect();
    }
    Ok(vec![Matcher::pattern(ALL_KEYS)?])
}

/// Sums the integer values of a fixed set of argument keys per group.
///
/// The key set is discovered up front ([`KeyCounter::discover`]); each
/// group's row is a vector indexed by discovery order.
#[derive(Debug)]
pub struct KeyCounter {
    group_by: GroupBy,
    keys: Vec<String>,
    key_index: HashMap<String, usize>,
    rows: BTreeMap<String, Vec<i64>>,
}

impl KeyCounter {
    /// Counter over an already known key universe.
    pub fn new<I, S>(group_by: GroupBy, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counter = Self {
            group_by,
            keys: Vec::new(),
            key_index: HashMap::new(),
            rows: BTreeMap::new(),
        };
        for key in keys {
            counter.insert_key(key.into());
        }
        counter
    }

    /// Discovery pass: records every argument key that matches one of
    /// `matchers` and has an integer value, over all remarks accepted by
    /// `filter`. Group keys play no part here.
    pub fn discover<I>(
        group_by: GroupBy,
        matchers: &[Matcher],
        source: I,
        filter: &Filter,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Remark>>,
    {
        let mut counter = Self::new(group_by, Vec::<String>::new());
        for remark in source {
            let remark = remark?;
            if !filter.accepts(&remark) {
                continue;
            }
            for matcher in matchers {
                for arg in &remark.args {
                    if matcher.is_match(&arg.key) && arg.is_numeric() {
                        counter.insert_key(arg.key.clone());
                    }
                }
            }
        }
        debug!(keys = counter.keys.len(), "discovered numeric remark keys");
        Ok(counter)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn row(&self, group: &str) -> Option<&[i64]> {
        self.rows.get(group).map(Vec::as_slice)
    }

    fn insert_key(&mut self, key: String) {
        if self.key_index.contains_key(&key) {
            return;
        }
        self.key_index.insert(key.clone(), self.keys.len());
        self.keys.push(key);
    }
}

impl Counter for KeyCounter {
    fn collect(&mut self, remark: &Remark) {
        let Some(group) = self.group_by.group_key(remark) else {
            return;
        };
        let row = self
            .rows
            .entry(group)
            .or_insert_with(|| vec![0; self.keys.len()]);
        for (idx, key) in self.keys.iter().enumerate() {
            row[idx] = row[idx].saturating_add(remark.int_value(key).unwrap_or(0));
        }
    }

    fn report(&self) -> CountReport {
        CountReport {
            group_by: self.group_by.column_name().to_string(),
            columns: self.keys.clone(),
            rows: self
                .rows
                .iter()
                .map(|(group, values)| CountRow {
                    group: group.clone(),
                    values: values.clone(),
                })
                .collect(),
        }
    }
}
