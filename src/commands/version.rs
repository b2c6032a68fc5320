//! @acp:module "Version Command"
//! @acp:summary "Print the version of the Sails this app would run"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;

use super::{error, fatal, load_version, CommandContext, Exit};
use crate::outcome::OutcomeHandlers;
use crate::terminal::Terminal;

struct VersionReport<'a> {
    terminal: &'a Terminal,
    exit: Exit,
}

impl OutcomeHandlers<String> for VersionReport<'_> {
    fn success(&mut self, version: String) {
        self.terminal.info(format!("v{}", version));
        self.exit = Exit::Success;
    }

    fn error(&mut self, detail: String) {
        self.exit = error::report(self.terminal, detail);
    }

    fn failed_to_load_sails(&mut self, detail: String) {
        self.exit = fatal::failed_to_load_sails(self.terminal, detail);
    }
}

/// Execute `sails version`.
///
/// A usable local installation wins, so the printed version is the one
/// `sails lift` would run.
pub async fn execute_version(ctx: &CommandContext) -> Result<Exit> {
    let resolved = ctx.resolver.resolve(ctx.cwd()).await;
    tracing::debug!("version from {}", resolved.reference());

    let mut runtime = resolved.provider().create();
    let outcome = load_version(runtime.as_mut(), &ctx.options.with_hooks_disabled()).await;

    let mut report = VersionReport {
        terminal: &ctx.terminal,
        exit: Exit::Failure,
    };
    outcome.report(&mut report);
    Ok(report.exit)
}
