//! Command-line interface for `nissue`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::{CliOverrides, Settings};
use crate::format::OutputContext;
use crate::logging;
use commands::Runtime;

/// `nissue` - Notion database as an issue tracker.
#[derive(Parser, Debug)]
#[command(name = "nissue")]
#[command(
    author,
    version,
    about = "Query a Notion database as an issue tracker",
    long_about = None,
    after_help = "Set NOTION_INTEGRATION_TOKEN and NOTION_DATABASE_ID, or write them to the config file."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging (same as -vv)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Notion database ID (overrides NOTION_DATABASE_ID)
    #[arg(long = "db-id", global = true, value_name = "ID")]
    pub db_id: Option<String>,

    /// Skip the on-disk schema cache for this run
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Effective verbosity, folding `--debug` into `-vv`.
    #[must_use]
    pub fn verbosity(&self) -> u8 {
        if self.debug {
            self.verbose.max(2)
        } else {
            self.verbose
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List issues (alias: db-issue)
    #[command(alias = "db-issue")]
    List(ListArgs),

    /// Show one issue (alias: db-issue-detail)
    #[command(alias = "db-issue-detail")]
    Show(ShowArgs),

    /// Remove the schema cache
    Maintenance,

    /// Check configuration and cache health
    Doctor,

    /// Show version information
    Version,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Search terms; issue IDs and bare numbers also match the ID column
    pub search: Vec<String>,

    /// Only issues assigned to this user ID (`me` for yourself)
    #[arg(long, value_name = "USER")]
    pub owner: Option<String>,

    /// Include issues whose status is done
    #[arg(long)]
    pub include_closed: bool,

    /// Sort by issue number instead of arrival order
    #[arg(long)]
    pub sort: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Issue ID, e.g. ISS-42
    pub id: String,

    /// Print the issue as a markdown document
    #[arg(long)]
    pub render_content: bool,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(
        cli.verbosity(),
        cli.quiet,
        cli.log_file.as_deref(),
        cli.log_json,
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let output = OutputContext::from_flags(cli.json, cli.quiet);

    let Some(command) = cli.command else {
        println!("nissue - Notion database issue tracker. Use --help for usage.");
        return Ok(());
    };

    let overrides = CliOverrides {
        database_id: cli.db_id,
    };
    let runtime = || -> crate::Result<Runtime> {
        Ok(Runtime {
            settings: Settings::load(&overrides)?,
            output,
            no_cache: cli.no_cache,
        })
    };

    match command {
        Commands::List(args) => commands::list::execute(&args, &runtime()?)?,
        Commands::Show(args) => commands::show::execute(&args, &runtime()?)?,
        Commands::Maintenance => commands::maintenance::execute(&runtime()?)?,
        Commands::Doctor => commands::doctor::execute(&overrides, &output)?,
        Commands::Version => commands::version::execute(&output)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_legacy_aliases_parse() {
        let cli = Cli::try_parse_from(["nissue", "db-issue", "login", "--owner", "me"]).unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.search, vec!["login"]);
                assert_eq!(args.owner.as_deref(), Some("me"));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["nissue", "db-issue-detail", "ISS-1", "--render-content"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Show(ShowArgs { render_content: true, .. }))
        ));
    }

    #[test]
    fn test_debug_flag_implies_debug_verbosity() {
        let cli = Cli::try_parse_from(["nissue", "--debug", "version"]).unwrap();
        assert_eq!(cli.verbosity(), 2);
        let cli = Cli::try_parse_from(["nissue", "-vvv", "--debug", "version"]).unwrap();
        assert_eq!(cli.verbosity(), 3);
    }
}
