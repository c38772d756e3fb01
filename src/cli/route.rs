//! CLI route: single route table and run context. Dispatches to the
//! engines and formats results; exit-code policy lives in `output`.

use crate::cascade;
use crate::check;
use crate::cli::output::format_check_report;
use crate::cli::parse::{CascadeCommands, Commands, RefactorCommands};
use crate::coalesce;
use crate::error::{CliError, CoalesceError};
use crate::filter;
use crate::rename;
use crate::root::RootCache;
use crate::tabulate;
use tracing::debug;

/// What a command run produced: text for stdout (possibly empty) and the
/// process exit code. The checker encodes its finding count as a negative
/// code; everything else exits zero on success.
#[derive(Debug)]
pub struct CommandOutput {
    pub text: String,
    pub code: i32,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self { text, code: 0 }
    }
}

/// Runtime context for CLI execution. Holds the per-run root cache so that
/// targets sharing a root parse its marker once.
#[derive(Default)]
pub struct RunContext {
    roots: RootCache,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&mut self, command: &Commands) -> Result<CommandOutput, CliError> {
        match command {
            Commands::Cascade { command } => match command {
                CascadeCommands::Files { paths } => {
                    debug!(targets = paths.len(), "cascade files");
                    let doc = cascade::cascade(paths, &mut self.roots)?;
                    Ok(CommandOutput::ok(doc.to_string()))
                }
                CascadeCommands::Filter { root, filters } => {
                    debug!(filters = filters.len(), "cascade filter");
                    let doc = filter::filter(root, filters, &mut self.roots)?;
                    Ok(CommandOutput::ok(doc.to_string()))
                }
            },
            Commands::Check { root, format } => {
                let report = check::check(root)?;
                let text = format_check_report(&report, format);
                let code = -(report.error_count() as i32);
                Ok(CommandOutput { text, code })
            }
            Commands::Refactor { command } => match command {
                RefactorCommands::Coalesce { root } => {
                    let root = dunce::canonicalize(root)
                        .map_err(|e| CliError::Coalesce(CoalesceError::Io(e)))?;
                    coalesce::coalesce(&root)?;
                    Ok(CommandOutput::ok(String::new()))
                }
                RefactorCommands::Rename {
                    old_name,
                    new_name,
                    root,
                } => {
                    rename::rename(old_name, new_name, root)?;
                    Ok(CommandOutput::ok(String::new()))
                }
            },
            Commands::Tabulate { root, format } => {
                let text = tabulate::tabulate(root, format)?;
                Ok(CommandOutput::ok(text))
            }
        }
    }
}
