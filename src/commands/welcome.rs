//! @acp:module "Welcome"
//! @acp:summary "Bare `sails`: version banner and usage"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;

use super::{error, fatal, load_version, CommandContext, CommandTable, Exit};
use crate::outcome::OutcomeHandlers;
use crate::terminal::Terminal;

struct WelcomeReport<'a> {
    terminal: &'a Terminal,
    exit: Exit,
}

impl OutcomeHandlers<String> for WelcomeReport<'_> {
    fn success(&mut self, version: String) {
        self.terminal.blank();
        self.terminal.info(format!("Welcome to Sails! (v{})", version));
        self.terminal.info(CommandTable::usage());
        self.terminal.blank();
        self.exit = Exit::Success;
    }

    fn error(&mut self, detail: String) {
        self.exit = error::report(self.terminal, detail);
    }

    fn failed_to_load_sails(&mut self, detail: String) {
        self.exit = fatal::failed_to_load_sails(self.terminal, detail);
    }
}

/// Execute bare `sails`
pub async fn execute_welcome(ctx: &CommandContext) -> Result<Exit> {
    let mut runtime = ctx.resolver.bundled().create();
    let outcome = load_version(runtime.as_mut(), &ctx.options.with_hooks_disabled()).await;

    let mut report = WelcomeReport {
        terminal: &ctx.terminal,
        exit: Exit::Failure,
    };
    outcome.report(&mut report);
    Ok(report.exit)
}
