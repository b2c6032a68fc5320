//! @acp:module "Invalid Command"
//! @acp:summary "Guidance for input the CLI does not understand"
//! @acp:domain cli
//! @acp:layer handler

use super::{CommandContext, Exit};
use crate::router::ParsedArgs;

pub const HELP_POINTER: &str = "To get help using the Sails command-line tool, run `sails`.";

/// Execute the `invalid` fallback.
///
/// `args` is the parsed input when the command itself was not understood;
/// `messages` come from upstream validation. Guidance only, so the process
/// still exits cleanly.
pub fn execute_invalid(
    ctx: &CommandContext,
    args: Option<&ParsedArgs>,
    messages: &[String],
) -> Exit {
    let mut messages = messages.to_vec();
    if let Some(args) = args {
        messages.push(match args.first() {
            Some(first) => format!("Sorry, I don't understand what `{}` means.", first),
            None => "Sorry, I don't understand what that means.".to_string(),
        });
    }

    for message in &messages {
        ctx.terminal.error(message);
    }
    ctx.terminal.info(HELP_POINTER);
    Exit::Success
}
