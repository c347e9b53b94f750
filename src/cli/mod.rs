// CLI support: subcommand implementations and status output.

pub mod commands;
pub mod output;
