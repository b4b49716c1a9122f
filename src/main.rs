//! ws-lock command-line entry point.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ws_lock::output;
use ws_lock::{capture, restore_with, status, RestoreOptions};

#[derive(Parser, Debug)]
#[command(name = "ws-lock")]
#[command(version)]
#[command(about = "Record and restore the commits of every git repository in a workspace", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct WorkspaceArgs {
    /// Workspace directory to search for repositories
    #[arg(long)]
    workspace: PathBuf,

    /// Anchor repository whose .git directory holds the snapshot
    #[arg(long)]
    repo: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record the current commit of every repository in the workspace
    #[command(alias = "update")]
    Capture {
        #[command(flatten)]
        paths: WorkspaceArgs,
    },

    /// Check out every repository to the commit recorded in the snapshot
    #[command(alias = "apply")]
    Restore {
        #[command(flatten)]
        paths: WorkspaceArgs,

        /// Show what would be checked out without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Print the per-repository report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare the workspace against the recorded snapshot
    Status {
        #[command(flatten)]
        paths: WorkspaceArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Capture { paths } => {
            let summary = capture(&paths.workspace, &paths.repo)?;
            output::print_capture_summary(&summary, &paths.repo);
        }
        Commands::Restore {
            paths,
            dry_run,
            json,
        } => {
            let options = RestoreOptions { dry_run };
            let report = restore_with(&paths.workspace, &paths.repo, &options, |event| {
                if !json {
                    output::print_restore_event(&event, dry_run);
                }
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_restore_summary(&report, dry_run);
            }
        }
        Commands::Status { paths, json } => {
            let report = status(&paths.workspace, &paths.repo)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_status(&report);
            }
        }
    }
    Ok(())
}
