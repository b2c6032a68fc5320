//! @acp:module "WWW Command"
//! @acp:summary "Build assets into a standalone www directory"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;

use super::{fatal, CommandContext, Exit};
use crate::runtime::{wait_for, RuntimeEvent};

pub const BUILD_TASK: &str = "build";

/// Execute `sails www`.
///
/// The build task only reports through runtime events, so the listener is
/// attached before the task is started.
pub async fn execute_www(ctx: &CommandContext) -> Result<Exit> {
    let terminal = &ctx.terminal;
    let www_path = ctx.cwd().join("www");

    terminal.info(format!(
        "Compiling assets into standalone `www` directory with `grunt {}`...",
        BUILD_TASK
    ));

    let mut runtime = ctx.resolver.bundled().create();
    if let Err(err) = runtime.load(&ctx.options.with_hook_disabled("grunt")).await {
        return Ok(fatal::failed_to_load_sails(terminal, err));
    }

    let mut events = runtime.subscribe();
    runtime.run_task(BUILD_TASK).await?;

    let finished = wait_for(&mut events, |event| match event {
        RuntimeEvent::TaskDone { .. } => Some(Ok(())),
        RuntimeEvent::TaskError { message, .. } => Some(Err(message)),
        RuntimeEvent::Failed { message } => Some(Err(message)),
        RuntimeEvent::Exited { code } => Some(Err(format!(
            "Sails exited before `grunt {}` finished ({:?})",
            BUILD_TASK, code
        ))),
        _ => None,
    })
    .await
    .unwrap_or_else(|err| Err(err.to_string()));

    match finished {
        Ok(()) => {
            terminal.info("");
            terminal.info("Created `www` directory at:");
            terminal.info(www_path.display().to_string());
            Ok(Exit::Success)
        }
        Err(message) => {
            tracing::debug!("grunt {} failed: {}", BUILD_TASK, message);
            terminal.error(format!("Error occured starting `grunt {}`", BUILD_TASK));
            terminal.error("Please resolve any issues and try running `sails www` again.");
            Ok(Exit::Failure)
        }
    }
}
