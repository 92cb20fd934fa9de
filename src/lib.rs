//! cchist - ClearCase history extraction
//!
//! Turns `cleartool lshistory` output into a deduplicated, ordered list of
//! changesets.
//!
//! This library provides:
//! - [`cleartool`]: Request formats, command execution and output parsing
//! - [`config`]: Command line configuration
//! - [`filter`]: Predicates deciding which records are significant
//! - [`history`]: History queries and changeset merging
//! - [`model`]: Domain models

pub mod cleartool;
pub mod config;
pub mod filter;
pub mod history;
pub mod model;
