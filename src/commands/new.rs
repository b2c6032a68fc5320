//! @acp:module "New Command"
//! @acp:summary "Create a new app"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;

use super::{CommandContext, Exit};
use crate::generator::NewAppOptions;
use crate::outcome::OutcomeHandlers;
use crate::terminal::Terminal;

struct NewReport<'a> {
    terminal: &'a Terminal,
}

impl OutcomeHandlers<String> for NewReport<'_> {
    fn success(&mut self, message: String) {
        self.terminal.info(message);
    }

    fn error(&mut self, detail: String) {
        self.terminal.error(detail);
    }

    fn missing_app_name(&mut self) {
        self.terminal
            .error("Please choose the name or destination path for your new app.");
    }
}

/// Execute `sails new [appName]`
///
/// Generator failures are reported but do not fail the process.
pub async fn execute_new(ctx: &CommandContext, app_name: Option<String>) -> Result<Exit> {
    let options = NewAppOptions::new(&ctx.options, app_name);
    let outcome = ctx.generator.new_app(&options).await;
    tracing::debug!("new reported {}", outcome.channel());

    outcome.report(&mut NewReport {
        terminal: &ctx.terminal,
    });
    Ok(Exit::Success)
}
