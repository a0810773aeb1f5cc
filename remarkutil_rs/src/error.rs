//! Error type shared by every stage of the remark pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemarkError {
    /// A filter or key pattern failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("cannot open file '{}': {source}", path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open output '{}': {source}", path.display())]
    DestinationOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any parser failure other than the normal end of the stream.
    #[error("malformed remark stream: {message}")]
    StreamParse { message: String },

    #[error("invalid config '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("failed to write report: {0}")]
    Write(#[from] io::Error),
}

impl RemarkError {
    pub fn parse(message: impl Into<String>) -> Self {
        RemarkError::StreamParse {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RemarkError>;
