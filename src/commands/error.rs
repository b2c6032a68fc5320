//! @acp:module "Error Command"
//! @acp:summary "Catch-all for unexpected faults"
//! @acp:domain cli
//! @acp:layer handler

use std::fmt;

use super::{CommandContext, Exit};
use crate::terminal::Terminal;

/// Report an unexpected fault; always exits non-zero
pub fn execute_error(ctx: &CommandContext, err: impl fmt::Display) -> Exit {
    report(&ctx.terminal, err)
}

pub(crate) fn report(terminal: &Terminal, err: impl fmt::Display) -> Exit {
    terminal.error(err.to_string());
    terminal.blank();
    Exit::Failure
}
