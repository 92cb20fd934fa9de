//! cleartool command layer
//!
//! This module builds `cleartool lshistory` requests and parses their output.

pub mod constants;
mod executor;
mod format;
/// Parser module (public for integration testing)
pub mod parser;

pub use executor::{ClearToolExecutor, HistorySource, LsHistoryRequest};
pub use format::{FormatField, FormatSpec};

use std::io;
use thiserror::Error;

/// Errors that can occur when talking to cleartool or reading its output
#[derive(Error, Debug)]
pub enum ClearToolError {
    #[error("cleartool is not installed or not in PATH")]
    ClearToolNotFound,

    #[error("cleartool command failed (exit code {exit_code}): {stderr}")]
    CommandFailed { stderr: String, exit_code: i32 },

    #[error("Invalid date '{text}': {source}")]
    InvalidDate {
        text: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}
