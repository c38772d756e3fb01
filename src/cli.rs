//! CLI domain: parse, route, and output only.
//! No domain orchestration; a single route table dispatches to the engines.

mod output;
mod parse;
mod route;

pub use output::{exit_code, format_check_report, map_error};
pub use parse::{CascadeCommands, Cli, Commands, RefactorCommands};
pub use route::{CommandOutput, RunContext};
