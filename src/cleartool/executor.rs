//! cleartool command executor
//!
//! Handles building `lshistory` invocations and capturing their output.

use std::path::PathBuf;
use std::process::Command;

use chrono::NaiveDateTime;

use super::ClearToolError;
use super::constants::{self, commands, dates, flags, special};

/// One `cleartool lshistory` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsHistoryRequest {
    /// Value passed to `-fmt`
    pub format: String,
    /// Only report events after this instant
    pub since: Option<NaiveDateTime>,
    /// Branch type to restrict to (empty = no branch filter)
    pub branch: String,
    /// View-relative path to query
    pub path: String,
    /// Include minor events such as labeling
    pub include_minor: bool,
    /// `-r` instead of `-all`
    pub recurse: bool,
    /// Only report the last N events
    pub last_events: Option<usize>,
}

impl LsHistoryRequest {
    /// Render the request as cleartool arguments (without the binary name)
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            commands::LSHISTORY.to_string(),
            flags::FORMAT.to_string(),
            self.format.clone(),
        ];

        if let Some(since) = self.since {
            args.push(flags::SINCE.to_string());
            args.push(since.format(dates::SINCE_DATE_FORMAT).to_string());
        }

        if !self.branch.is_empty() {
            args.push(flags::BRANCH.to_string());
            args.push(format!("{}{}", special::BRANCH_TYPE_PREFIX, self.branch));
        }

        if self.include_minor {
            args.push(flags::MINOR.to_string());
        }

        if self.recurse {
            args.push(flags::RECURSE.to_string());
        } else {
            args.push(flags::ALL.to_string());
        }

        if let Some(last) = self.last_events {
            args.push(flags::LAST.to_string());
            args.push(last.to_string());
        }

        args.push(flags::NO_CHECKOUTS.to_string());
        args.push(self.path.clone());
        args
    }
}

/// Anything that can answer an `lshistory` request with raw text
///
/// [`ClearToolExecutor`] talks to the real tool; tests substitute canned output.
pub trait HistorySource {
    fn lshistory(&self, request: &LsHistoryRequest) -> Result<String, ClearToolError>;
}

/// Executor for cleartool commands
#[derive(Debug, Clone)]
pub struct ClearToolExecutor {
    /// Directory to run in, usually the view root (None = current directory)
    view_root: Option<PathBuf>,
}

impl Default for ClearToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ClearToolExecutor {
    /// Create a new executor for the current directory
    pub fn new() -> Self {
        Self { view_root: None }
    }

    /// Create a new executor that runs inside a view
    pub fn with_view_root(path: PathBuf) -> Self {
        Self {
            view_root: Some(path),
        }
    }

    /// Run a cleartool command with the given arguments
    pub fn run(&self, args: &[String]) -> Result<String, ClearToolError> {
        let mut cmd = Command::new(constants::CLEARTOOL_COMMAND);

        if let Some(ref path) = self.view_root {
            cmd.current_dir(path);
        }

        cmd.args(args);
        tracing::debug!(?args, "running cleartool");

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ClearToolError::ClearToolNotFound
            } else {
                ClearToolError::IoError(e)
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            let exit_code = output.status.code().unwrap_or(-1);
            Err(ClearToolError::CommandFailed { stderr, exit_code })
        }
    }
}

impl HistorySource for ClearToolExecutor {
    fn lshistory(&self, request: &LsHistoryRequest) -> Result<String, ClearToolError> {
        self.run(&request.args())
    }
}
