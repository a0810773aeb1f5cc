//! Remark sources.
//!
//! A source turns a raw buffer into a lazy sequence of [`Remark`]s. The
//! sequence ends with `None` (end of stream); a malformed record yields one
//! [`RemarkError::StreamParse`] and the source stops after it.

mod json;
mod yaml;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::Result;
use crate::remark::Remark;

pub use json::JsonLinesParser;
pub use yaml::YamlRemarkParser;

/// Pull-based remark stream over a borrowed buffer.
pub type RemarkSource<'a> = Box<dyn Iterator<Item = Result<Remark>> + 'a>;

/// Serialization format of the input buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RemarkFormat {
    /// LLVM optimization record YAML (`-fsave-optimization-record`).
    #[default]
    Yaml,
    /// One JSON remark object per line.
    Json,
}

pub fn create_parser(format: RemarkFormat, buffer: &str) -> RemarkSource<'_> {
    match format {
        RemarkFormat::Yaml => Box::new(YamlRemarkParser::new(buffer)),
        RemarkFormat::Json => Box::new(JsonLinesParser::new(buffer)),
    }
}
