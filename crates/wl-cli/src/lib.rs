//! Worklog CLI library.
//!
//! This crate provides the CLI interface for worklog.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, LogArgs};
pub use config::{Config, ConfigError, IssueSourceKind, JiraSettings, WorkLogSettings};
