//! Remark filtering.
//!
//! A [`Filter`] combines up to four optional predicates (remark name, pass
//! name, argument value, outcome type). Name-like predicates are [`Matcher`]s:
//! either a literal compared against the trimmed candidate, or an unanchored
//! regular expression.

use regex::Regex;

use crate::config::FilterSpec;
use crate::error::{RemarkError, Result};
use crate::remark::{Remark, RemarkType};

/// Literal-or-pattern string predicate.
#[derive(Clone, Debug)]
pub enum Matcher {
    Literal(String),
    Pattern(Regex),
}

impl Matcher {
    pub fn literal(text: impl Into<String>) -> Self {
        Matcher::Literal(text.into())
    }

    /// Compiles `text` as a regular expression. Fails with
    /// [`RemarkError::InvalidPattern`] carrying the compiler diagnostic.
    pub fn pattern(text: &str) -> Result<Self> {
        Regex::new(text)
            .map(Matcher::Pattern)
            .map_err(|source| RemarkError::InvalidPattern {
                pattern: text.to_string(),
                source,
            })
    }

    pub fn new(text: &str, is_regex: bool) -> Result<Self> {
        if is_regex {
            Self::pattern(text)
        } else {
            Ok(Self::literal(text))
        }
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        match self {
            Matcher::Literal(expected) => candidate.trim() == expected,
            Matcher::Pattern(re) => re.is_match(candidate),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Matcher::Literal(text) => text,
            Matcher::Pattern(re) => re.as_str(),
        }
    }
}

/// Picks the literal when both forms are configured; empty strings count as
/// not configured.
pub fn select_matcher(literal: Option<&str>, regex: Option<&str>) -> Result<Option<Matcher>> {
    let non_empty = |s: &&str| !s.is_empty();
    if let Some(text) = literal.filter(non_empty) {
        return Ok(Some(Matcher::literal(text)));
    }
    regex.filter(non_empty).map(Matcher::pattern).transpose()
}

/// Remark-level predicate. Absent components mean "don't care".
#[derive(Clone, Debug, Default)]
pub struct Filter {
    pub remark_name: Option<Matcher>,
    pub pass_name: Option<Matcher>,
    pub arg_value: Option<Matcher>,
    pub remark_type: Option<RemarkType>,
}

impl Filter {
    /// Builds a filter, compiling every pattern up front.
    pub fn new(spec: &FilterSpec) -> Result<Self> {
        Ok(Self {
            remark_name: select_matcher(
                spec.remark_name.as_deref(),
                spec.remark_name_regex.as_deref(),
            )?,
            pass_name: select_matcher(spec.pass_name.as_deref(), spec.pass_name_regex.as_deref())?,
            arg_value: select_matcher(spec.arg_value.as_deref(), spec.arg_value_regex.as_deref())?,
            remark_type: spec.remark_type,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.remark_name.is_none()
            && self.pass_name.is_none()
            && self.arg_value.is_none()
            && self.remark_type.is_none()
    }

    /// Name, then pass, then type. A configured type decides the outcome on
    /// its own: the argument-value matcher is only consulted when no type
    /// predicate is set.
    pub fn accepts(&self, remark: &Remark) -> bool {
        if let Some(name) = &self.remark_name
            && !name.is_match(&remark.remark_name)
        {
            return false;
        }
        if let Some(pass) = &self.pass_name
            && !pass.is_match(&remark.pass_name)
        {
            return false;
        }
        if let Some(remark_type) = self.remark_type {
            return remark_type == remark.remark_type;
        }
        if let Some(arg) = &self.arg_value {
            return remark.args.iter().any(|a| arg.is_match(&a.value));
        }
        true
    }
}
