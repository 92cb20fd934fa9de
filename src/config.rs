//! Configuration for the cchist binary
//!
//! Command line arguments (with environment fallbacks) and their conversion
//! into [`HistoryOptions`].

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};

use crate::cleartool::ClearToolError;
use crate::filter::{FileFilter, Filter};
use crate::history::{ActionMode, ChangesetLevel, DEFAULT_CHANGESET_WINDOW_SECS, HistoryOptions};

/// Accepted formats for `--since`
const SINCE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y%m%d.%H%M%S"];

/// cchist - list ClearCase changesets
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cchist")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Only report changes after this date (`YYYY-MM-DD HH:MM:SS`)
    #[arg(short, long, env = "CCHIST_SINCE", value_parser = parse_since)]
    pub since: Option<NaiveDateTime>,

    /// Branch to query; repeat for several branches
    #[arg(short, long = "branch", env = "CCHIST_BRANCHES", value_delimiter = ',')]
    pub branches: Vec<String>,

    /// View-relative path to query; repeat for several paths
    #[arg(short = 'p', long = "path", env = "CCHIST_PATHS", value_delimiter = ',')]
    pub paths: Vec<String>,

    /// View root to run cleartool in
    #[arg(long, env = "CCHIST_VIEW_ROOT")]
    pub view_root: Option<PathBuf>,

    /// Prefix to strip from element paths
    #[arg(long, env = "CCHIST_VIEW_PATH", default_value = "")]
    pub extended_view_path: String,

    /// Parse captured lshistory output from a file (`-` for stdin) instead of running cleartool
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input was produced with the legacy quoted-comment format
    #[arg(long, default_value = "false")]
    pub legacy: bool,

    /// Include minor events such as labeling
    #[arg(long, default_value = "false")]
    pub minor: bool,

    /// Use `-r` instead of `-all`
    #[arg(long, default_value = "false")]
    pub recurse: bool,

    /// Only the last N events
    #[arg(long)]
    pub last: Option<usize>,

    /// Hide `destroy sub-branch` events
    #[arg(long, default_value = "false")]
    pub hide_destroy_sub_branch: bool,

    /// Only keep elements whose path matches this regex
    #[arg(long)]
    pub include: Option<String>,

    /// Drop elements whose path matches this regex
    #[arg(long)]
    pub exclude: Option<String>,

    /// Seconds between records of the same changeset
    #[arg(short, long, env = "CCHIST_WINDOW", default_value_t = DEFAULT_CHANGESET_WINDOW_SECS)]
    pub window: i64,

    /// Changeset detail recorded on checkout
    #[arg(long, value_enum, default_value_t = LevelArg::Branch)]
    pub level: LevelArg,

    /// Query history for a checkout instead of a poll (honours `--level`)
    #[arg(long, default_value = "false")]
    pub checkout: bool,

    /// With `--checkout`: the view already exists
    #[arg(long, requires = "checkout")]
    pub view_exists: bool,

    /// With `--checkout`: the view has load rules configured
    #[arg(long, requires = "checkout")]
    pub has_load_rules: bool,

    /// Print changesets as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - only warnings and errors are logged
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Command line spelling of [`ChangesetLevel`]
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelArg {
    None,
    #[default]
    Branch,
    All,
}

impl From<LevelArg> for ChangesetLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::None => ChangesetLevel::None,
            LevelArg::Branch => ChangesetLevel::Branch,
            LevelArg::All => ChangesetLevel::All,
        }
    }
}

impl Config {
    /// Log level implied by `--verbose` / `--quiet`
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }

    /// Poll, or a checkout described by `--view-exists` / `--has-load-rules`
    pub fn action_mode(&self) -> ActionMode {
        if self.checkout {
            ActionMode::Checkout {
                view_exists: self.view_exists,
                has_load_rules: self.has_load_rules,
            }
        } else {
            ActionMode::Poll
        }
    }

    /// Build history options, compiling path filters
    pub fn history_options(&self) -> Result<HistoryOptions, ClearToolError> {
        let mut options = HistoryOptions::default()
            .with_branches(self.branches.iter().cloned())
            .with_view_paths(self.paths.iter().cloned())
            .with_extended_view_path(self.extended_view_path.clone())
            .with_minor_events(self.minor)
            .with_recurse(self.recurse)
            .with_last_events(self.last)
            .with_destroy_sub_branch_filter(self.hide_destroy_sub_branch)
            .with_changeset_window(self.window)
            .with_changeset_level(self.level.into());

        if let Some(ref pattern) = self.include {
            options = options.with_filter(Filter::File(FileFilter::include(pattern)?));
        }
        if let Some(ref pattern) = self.exclude {
            options = options.with_filter(Filter::File(FileFilter::exclude(pattern)?));
        }

        options.validate()?;
        Ok(options)
    }

    /// Captured output named by `--input`, if any
    pub fn read_input(&self) -> Result<Option<String>, ClearToolError> {
        self.input.as_deref().map(read_output).transpose()
    }
}

/// Read captured lshistory output from a file, or stdin for `-`
fn read_output(path: &Path) -> Result<String, ClearToolError> {
    if path == Path::new("-") {
        let mut output = String::new();
        std::io::stdin().read_to_string(&mut output)?;
        Ok(output)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn parse_since(value: &str) -> Result<NaiveDateTime, String> {
    SINCE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("unrecognized date '{value}', expected YYYY-MM-DD HH:MM:SS"))
}
