//! cleartool-specific constants
//!
//! Centralized definitions for cleartool command names, flags, and special values.

/// cleartool command binary name
pub const CLEARTOOL_COMMAND: &str = "cleartool";

/// cleartool subcommands
pub mod commands {
    pub const LSHISTORY: &str = "lshistory";
}

/// cleartool command flags
pub mod flags {
    /// Output format template
    pub const FORMAT: &str = "-fmt";
    /// Only report events after the given date
    pub const SINCE: &str = "-since";
    /// Restrict to one branch type
    pub const BRANCH: &str = "-branch";
    /// Include minor events (labels, attributes)
    pub const MINOR: &str = "-minor";
    /// Descend into directories
    pub const RECURSE: &str = "-r";
    /// Report all versions of all elements below the path
    pub const ALL: &str = "-all";
    /// Only report the last N events
    pub const LAST: &str = "-last";
    /// Do not report checkout events
    pub const NO_CHECKOUTS: &str = "-nco";
}

/// Special cleartool values
pub mod special {
    /// Prefix used when passing a branch to `-branch`
    pub const BRANCH_TYPE_PREFIX: &str = "brtype:";

    /// Activity name for entries without a UCM activity
    pub const UNDEFINED_ACTIVITY: &str = "undefined";

    /// Event text of the first, empty version on a new branch
    pub const CREATE_BRANCH_EVENT: &str = "create branch";
}

/// Date formats used on the wire
pub mod dates {
    /// `%Nd` output, e.g. `20070906.091701`
    pub const HISTORY_DATE_FORMAT: &str = "%Y%m%d.%H%M%S";

    /// `-since` argument, e.g. `06-Sep-2007.09:17:01`
    pub const SINCE_DATE_FORMAT: &str = "%d-%b-%Y.%H:%M:%S";
}

/// Error detection patterns in cleartool output
pub mod errors {
    /// Prefix of error lines that cleartool interleaves with history output
    pub const ERROR_PREFIX: &str = "cleartool: Error:";
}
