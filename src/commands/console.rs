//! @acp:module "Console Command"
//! @acp:summary "Lift the app with an interactive shell attached"
//! @acp:domain cli
//! @acp:layer handler

use std::path::Path;

use anyhow::Result;

use super::{error, fatal, load_version, CommandContext, Exit};
use crate::outcome::OutcomeHandlers;
use crate::runtime::{LiftMode, RuntimeEvent};
use crate::terminal::Terminal;

pub const PROMPT: &str = "sails> ";

struct BannerReport<'a> {
    terminal: &'a Terminal,
    cwd: &'a Path,
    exit: Option<Exit>,
}

impl OutcomeHandlers<String> for BannerReport<'_> {
    fn success(&mut self, version: String) {
        self.terminal.blank();
        self.terminal
            .info(format!("Welcome to the Sails console (v{})", version));
        self.terminal.info("( to exit, type <CTRL>+<C> )");
        self.terminal.verbose(format!(
            "Lifting `{}` in interactive mode...",
            self.cwd.display()
        ));
    }

    fn error(&mut self, detail: String) {
        self.exit = Some(error::report(self.terminal, detail));
    }

    fn failed_to_load_sails(&mut self, detail: String) {
        self.exit = Some(fatal::failed_to_load_sails(self.terminal, detail));
    }
}

/// Execute `sails console`
pub async fn execute_console(ctx: &CommandContext) -> Result<Exit> {
    // A throwaway load, only to learn the version for the banner
    let mut probe = ctx.resolver.bundled().create();
    let outcome = load_version(probe.as_mut(), &ctx.options.with_hooks_disabled()).await;
    drop(probe);

    let mut banner = BannerReport {
        terminal: &ctx.terminal,
        cwd: ctx.cwd(),
        exit: None,
    };
    outcome.report(&mut banner);
    if let Some(exit) = banner.exit {
        return Ok(exit);
    }

    let mut runtime = ctx.resolver.bundled().create();
    let mode = LiftMode::Shell {
        prompt: PROMPT.to_string(),
    };
    if let Err(err) = runtime.lift(&ctx.options.without_ship(), mode).await {
        return Ok(fatal::failed_to_load_sails(&ctx.terminal, err));
    }

    match runtime.wait().await? {
        RuntimeEvent::ShellExit { error: Some(err) } => {
            ctx.terminal.error(err);
            Ok(Exit::Failure)
        }
        RuntimeEvent::ShellExit { error: None } => Ok(Exit::Success),
        RuntimeEvent::Exited { code: Some(0) } => Ok(Exit::Success),
        other => {
            tracing::debug!("console stopped with {:?}", other);
            Ok(Exit::Failure)
        }
    }
}
