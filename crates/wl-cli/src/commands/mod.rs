//! CLI subcommand implementations.

pub mod log;
pub mod meetings;
pub mod util;
