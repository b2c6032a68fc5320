//! @acp:module "Lift Command"
//! @acp:summary "Run the app with the project's Sails when it has a usable one"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;

use super::{fatal, CommandContext, Exit};
use crate::runtime::{LiftMode, RuntimeEvent};

/// Execute `sails lift`
pub async fn execute_lift(ctx: &CommandContext) -> Result<Exit> {
    let options = ctx.options.clone();

    let resolved = ctx.resolver.resolve(ctx.cwd()).await;
    tracing::info!("Lifting with {}", resolved.reference());

    let mut runtime = resolved.provider().create();
    if let Err(err) = runtime.lift(&options, LiftMode::Server).await {
        return Ok(fatal::failed_to_load_sails(&ctx.terminal, err));
    }

    match runtime.wait().await? {
        RuntimeEvent::Exited { code: Some(code) } if code != 0 => {
            tracing::debug!("Sails stopped with exit code {}", code);
            Ok(Exit::Failure)
        }
        _ => Ok(Exit::Success),
    }
}
