//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use wl_core::TaskEvent;

use crate::commands::util::parse_meeting;

/// Daily work log from issue tracker history.
///
/// Reconstructs when you worked on which issue from its status changes,
/// spreads the workday across those issues and logs the result.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute the work log for a day and post it.
    Log(LogArgs),

    /// Show the scheduled meetings for a day.
    Meetings {
        /// Date to show (YYYY-MM-DD, today, yesterday, or "N days ago").
        #[arg(short, long)]
        when: Option<String>,
    },
}

/// Arguments for `wl log`.
#[derive(Debug, Args)]
pub struct LogArgs {
    /// Date to log (YYYY-MM-DD, today, yesterday, or "N days ago"). Defaults to today.
    #[arg(short, long)]
    pub when: Option<String>,

    /// Add a meeting to the regular ones. Format: "title:minutes". Repeatable.
    #[arg(short, long = "meeting", value_name = "TITLE:MINUTES", value_parser = parse_meeting)]
    pub meetings: Vec<TaskEvent>,

    /// Ignore regular meetings and use this one instead. Format: "title:minutes".
    #[arg(short, long, value_name = "TITLE:MINUTES", value_parser = parse_meeting)]
    pub override_meeting: Option<TaskEvent>,

    /// Log immediately without asking for confirmation.
    #[arg(short, long)]
    pub yolo: bool,
}
