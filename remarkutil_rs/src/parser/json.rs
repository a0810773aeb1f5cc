use std::iter::Enumerate;
use std::str::Lines;

use crate::error::{RemarkError, Result};
use crate::remark::Remark;

/// JSON Lines remark source: one serialized [`Remark`] per line, blank lines
/// ignored.
pub struct JsonLinesParser<'a> {
    lines: Enumerate<Lines<'a>>,
    done: bool,
}

impl<'a> JsonLinesParser<'a> {
    pub fn new(buffer: &'a str) -> Self {
        Self {
            lines: buffer.lines().enumerate(),
            done: false,
        }
    }
}

impl Iterator for JsonLinesParser<'_> {
    type Item = Result<Remark>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for (idx, line) in self.lines.by_ref() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parsed = serde_json::from_str(line)
                .map_err(|e| RemarkError::parse(format!("line {}: {e}", idx + 1)));
            if parsed.is_err() {
                self.done = true;
            }
            return Some(parsed);
        }
        self.done = true;
        None
    }
}
