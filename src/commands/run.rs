//! @acp:module "Run Command"
//! @acp:summary "`sails run`, which is not available in this release"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;

use super::{CommandContext, Exit};
use crate::outcome::{Outcome, OutcomeHandlers};
use crate::terminal::Terminal;

struct RunReport<'a> {
    terminal: &'a Terminal,
    exit: Exit,
}

impl OutcomeHandlers<()> for RunReport<'_> {
    fn success(&mut self, _: ()) {
        self.exit = Exit::Success;
    }

    fn error(&mut self, detail: String) {
        self.terminal.error(detail);
        self.exit = Exit::Failure;
    }
}

/// Execute `sails run`
pub async fn execute_run(ctx: &CommandContext) -> Result<Exit> {
    let outcome: Outcome<()> =
        Outcome::NotImplemented("Sorry, `sails run` is currently out of commission.".to_string());
    tracing::debug!("run reports {}", outcome.channel());

    let mut report = RunReport {
        terminal: &ctx.terminal,
        exit: Exit::Failure,
    };
    outcome.report(&mut report);
    Ok(report.exit)
}
