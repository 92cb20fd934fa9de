//! FakeClearTool helper for integration tests.
//!
//! Answers `lshistory` requests with canned output per branch and records
//! every request it receives.

use std::cell::RefCell;
use std::collections::HashMap;

use cchist::cleartool::{ClearToolError, HistorySource, LsHistoryRequest};

/// Canned `lshistory` responses keyed by branch name
#[derive(Default)]
pub struct FakeClearTool {
    outputs: HashMap<String, String>,
    failing: Vec<String>,
    requests: RefCell<Vec<LsHistoryRequest>>,
}

impl FakeClearTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to requests for `branch` with `output`
    pub fn with_output(mut self, branch: &str, output: impl Into<String>) -> Self {
        self.outputs.insert(branch.to_string(), output.into());
        self
    }

    /// Fail every request for `branch` like a non-zero cleartool exit
    pub fn failing_on(mut self, branch: &str) -> Self {
        self.failing.push(branch.to_string());
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<LsHistoryRequest> {
        self.requests.borrow().clone()
    }
}

impl HistorySource for FakeClearTool {
    fn lshistory(&self, request: &LsHistoryRequest) -> Result<String, ClearToolError> {
        self.requests.borrow_mut().push(request.clone());

        if self.failing.contains(&request.branch) {
            return Err(ClearToolError::CommandFailed {
                stderr: format!("cleartool: Error: Branch type not found: \"{}\".", request.branch),
                exit_code: 1,
            });
        }

        Ok(self.outputs.get(&request.branch).cloned().unwrap_or_default())
    }
}
