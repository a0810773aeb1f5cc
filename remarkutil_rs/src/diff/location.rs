use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::filter::Filter;
use crate::remark::Remark;

/// Diff bucket key: debug location plus function name. Remarks without a
/// location share the empty path and line/column 0 of their function.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DebugLocation {
    pub file: String,
    pub function: String,
    pub line: u32,
    pub column: u32,
}

impl DebugLocation {
    pub fn new(file: impl Into<String>, function: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
            column,
        }
    }

    pub fn of(remark: &Remark) -> Self {
        match &remark.location {
            Some(loc) => Self::new(loc.file.clone(), remark.function_name.clone(), loc.line, loc.column),
            None => Self::new("", remark.function_name.clone(), 0, 0),
        }
    }
}

impl fmt::Display for DebugLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} Ln {} Col {}",
            self.file, self.function, self.line, self.column
        )
    }
}

/// Remarks of one stream grouped by [`DebugLocation`], keeping the order in
/// which locations were first seen.
#[derive(Debug, Default)]
pub struct RemarkBuckets {
    order: Vec<DebugLocation>,
    buckets: HashMap<DebugLocation, Vec<Remark>>,
}

impl RemarkBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buckets every remark of `source` accepted by `filter`. The first parse
    /// error aborts and is returned.
    pub fn from_source<I>(source: I, filter: &Filter) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Remark>>,
    {
        let mut buckets = Self::new();
        for remark in source {
            let remark = remark?;
            if filter.accepts(&remark) {
                buckets.insert(remark);
            }
        }
        Ok(buckets)
    }

    pub fn insert(&mut self, remark: Remark) {
        let location = DebugLocation::of(&remark);
        if let Some(bucket) = self.buckets.get_mut(&location) {
            bucket.push(remark);
            return;
        }
        self.order.push(location.clone());
        self.buckets.insert(location, vec![remark]);
    }

    /// Remarks at `location`, empty when the stream has none there.
    pub fn get(&self, location: &DebugLocation) -> &[Remark] {
        self.buckets.get(location).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, location: &DebugLocation) -> bool {
        self.buckets.contains_key(location)
    }

    pub fn locations(&self) -> impl Iterator<Item = &DebugLocation> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn remark_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remark::RemarkType;

    #[test]
    fn test_location_includes_function() {
        let f = Remark::new(RemarkType::Missed, "inline", "X", "f").at("a.c", 3, 4);
        let g = Remark::new(RemarkType::Missed, "inline", "X", "g").at("a.c", 3, 4);
        assert_ne!(DebugLocation::of(&f), DebugLocation::of(&g));
        assert_eq!(DebugLocation::of(&f).to_string(), "a.c:f Ln 3 Col 4");
    }

    #[test]
    fn test_unlocated_remarks_bucket_per_function() {
        let bare = Remark::new(RemarkType::Missed, "inline", "X", "f");
        assert_eq!(DebugLocation::of(&bare), DebugLocation::new("", "f", 0, 0));
    }

    #[test]
    fn test_buckets_keep_first_seen_order() {
        let mut buckets = RemarkBuckets::new();
        buckets.insert(Remark::new(RemarkType::Missed, "inline", "X", "f").at("b.c", 1, 1));
        buckets.insert(Remark::new(RemarkType::Missed, "inline", "X", "f").at("a.c", 1, 1));
        buckets.insert(Remark::new(RemarkType::Passed, "inline", "Y", "f").at("b.c", 1, 1));

        let order: Vec<_> = buckets.locations().map(|l| l.file.as_str()).collect();
        assert_eq!(order, vec!["b.c", "a.c"]);
        assert_eq!(buckets.get(&DebugLocation::new("b.c", "f", 1, 1)).len(), 2);
        assert!(buckets.get(&DebugLocation::new("c.c", "f", 1, 1)).is_empty());
        assert_eq!(buckets.remark_count(), 3);
    }
}
