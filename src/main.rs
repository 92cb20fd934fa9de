//! cchist - ClearCase history extraction
//!
//! Binary entry point: query cleartool (or read captured output) and print
//! the merged changesets.

use clap::Parser as _;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cchist::cleartool::parser::Parser;
use cchist::cleartool::{ClearToolExecutor, FormatSpec};
use cchist::config::Config;
use cchist::history::{self, HistoryAction};
use cchist::model::ChangeLogEntry;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::parse();

    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(config.log_level().into()))
        .init();

    let changesets = run(&config)?;
    info!(changesets = changesets.len(), "done");
    print_changesets(&config, &changesets)
}

fn run(config: &Config) -> color_eyre::Result<Vec<ChangeLogEntry>> {
    let options = config.history_options()?;

    if let Some(output) = config.read_input()? {
        let entries = if config.legacy {
            Parser::parse_legacy_history(&output, &options.extended_view_path)
        } else {
            Parser::parse_history(&FormatSpec::standard()?, &output, &options.extended_view_path)
        };
        return Ok(history::changesets(&options, entries));
    }

    let executor = match config.view_root {
        Some(ref root) => ClearToolExecutor::with_view_root(root.clone()),
        None => ClearToolExecutor::new(),
    };
    let action = HistoryAction::new(executor, options)?;
    Ok(action.get_changes(config.since, config.action_mode()))
}

fn print_changesets(config: &Config, changesets: &[ChangeLogEntry]) -> color_eyre::Result<()> {
    if config.json {
        println!("{}", serde_json::to_string_pretty(changesets)?);
    } else {
        for changeset in changesets {
            println!("{}", changeset.summary());
        }
    }
    Ok(())
}
