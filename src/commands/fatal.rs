//! @acp:module "Fatal Errors"
//! @acp:summary "Messages for conditions a command cannot recover from"
//! @acp:domain cli
//! @acp:layer handler

use std::fmt;

use super::Exit;
use crate::terminal::Terminal;

/// The framework failed to load or lift. Never retried.
pub fn failed_to_load_sails(terminal: &Terminal, err: impl fmt::Display) -> Exit {
    terminal.error("Failed to load Sails.");
    terminal.error(err.to_string());
    terminal.error("Are you in the root directory of a Sails app, and is its configuration valid?");
    Exit::Failure
}

pub fn not_sails_app(terminal: &Terminal) -> Exit {
    terminal.error("The current directory does not appear to be a Sails app.");
    terminal.error("Run this command from the root directory of your app.");
    Exit::Failure
}
