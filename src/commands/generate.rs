//! @acp:module "Generate Command"
//! @acp:summary "Generate a module in the current app"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;

use super::{error, fatal, CommandContext, Exit};
use crate::generator::{GenerateOptions, Generated};
use crate::outcome::OutcomeHandlers;
use crate::terminal::Terminal;

struct GenerateReport<'a> {
    terminal: &'a Terminal,
    global_id: &'a str,
    exit: Exit,
}

impl OutcomeHandlers<Generated> for GenerateReport<'_> {
    fn success(&mut self, generated: Generated) {
        let terminal = self.terminal;

        if generated.dry {
            terminal.info("(dry run)");
        }
        terminal.debug(generated.status());

        for action in &generated.actions {
            terminal.debug(format!("  {}.{}()", generated.global_id, action));
        }
        for attribute in &generated.attributes {
            terminal.debug(format!(
                "  {} : {{ type: \"{}\" }}",
                attribute.name, attribute.kind
            ));
        }

        if generated.dry {
            terminal.verbose(format!(
                "New file would have been created: {}",
                generated.file_path()
            ));
        } else {
            terminal.verbose(format!("New file created: {}", generated.file_path()));
        }
        self.exit = Exit::Success;
    }

    fn error(&mut self, detail: String) {
        self.terminal.error("Unexpected error occurred.");
        self.terminal.error(detail);
        self.exit = Exit::Failure;
    }

    fn not_sails_app(&mut self) {
        self.exit = fatal::not_sails_app(self.terminal);
    }

    fn already_exists(&mut self) {
        self.exit = error::report(self.terminal, format!("{} already exists!", self.global_id));
    }
}

/// Execute `sails generate <module> <id>`
pub async fn execute_generate(ctx: &CommandContext, options: GenerateOptions) -> Result<Exit> {
    let outcome = ctx.generator.generate(&options).await;
    tracing::debug!(
        "generate {} `{}` reported {}",
        options.module,
        options.global_id,
        outcome.channel()
    );

    let mut report = GenerateReport {
        terminal: &ctx.terminal,
        global_id: &options.global_id,
        exit: Exit::Failure,
    };
    outcome.report(&mut report);
    Ok(report.exit)
}
