use std::collections::HashMap;

use super::{CountReport, CountRow, Counter};
use crate::group::GroupBy;
use crate::remark::Remark;

/// Counts remarks per group key. Groups are reported in the order they were
/// first seen.
#[derive(Debug)]
pub struct RemarkCounter {
    group_by: GroupBy,
    counts: Vec<(String, i64)>,
    index: HashMap<String, usize>,
}

impl RemarkCounter {
    pub fn new(group_by: GroupBy) -> Self {
        Self {
            group_by,
            counts: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[cfg(test)]
    fn count_for(&self, group: &str) -> Option<i64> {
        self.index.get(group).map(|&idx| self.counts[idx].1)
    }

    #[cfg(test)]
    fn total(&self) -> i64 {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

impl Counter for RemarkCounter {
    fn collect(&mut self, remark: &Remark) {
        let Some(key) = self.group_by.group_key(remark) else {
            return;
        };
        match self.index.get(&key) {
            Some(&idx) => self.counts[idx].1 += 1,
            None => {
                self.index.insert(key.clone(), self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    fn report(&self) -> CountReport {
        CountReport {
            group_by: self.group_by.column_name().to_string(),
            columns: vec!["Count".to_string()],
            rows: self
                .counts
                .iter()
                .map(|(group, count)| CountRow {
                    group: group.clone(),
                    values: vec![*count],
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remark::RemarkType;

    fn located(function: &str, file: &str) -> Remark {
        Remark::new(RemarkType::Missed, "inline", "NoDefinition", function).at(file, 1, 1)
    }

    #[test]
    fn test_counts_in_first_seen_order() {
        let mut counter = RemarkCounter::new(GroupBy::PerSource);
        for remark in [
            located("f", "z.c"),
            located("g", "a.c"),
            located("h", "z.c"),
        ] {
            counter.collect(&remark);
        }
        let report = counter.report();
        assert_eq!(report.group_by, "Source");
        assert_eq!(report.columns, vec!["Count"]);
        let groups: Vec<_> = report.rows.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(groups, vec!["z.c", "a.c"]);
        assert_eq!(counter.count_for("z.c"), Some(2));
        assert_eq!(counter.count_for("a.c"), Some(1));
    }

    #[test]
    fn test_total_matches_grouped_remarks() {
        let mut counter = RemarkCounter::new(GroupBy::PerSource);
        counter.collect(&located("f", "a.c"));
        counter.collect(&Remark::new(RemarkType::Missed, "inline", "X", "f"));
        counter.collect(&located("f", "b.c"));
        // The remark without a location belongs to no group.
        assert_eq!(counter.total(), 2);
    }

    #[test]
    fn test_total_mode_single_row() {
        let mut counter = RemarkCounter::new(GroupBy::Total);
        counter.collect(&located("f", "a.c"));
        counter.collect(&Remark::new(RemarkType::Passed, "licm", "Hoisted", "g"));
        let report = counter.report();
        assert_eq!(report.group_by, "Total");
        assert_eq!(
            report.rows,
            vec![CountRow {
                group: "Total".into(),
                values: vec![2]
            }]
        );
    }
}
