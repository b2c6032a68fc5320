//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! One submodule per command. Handlers print through the context's
//! [`Terminal`] and return an [`Exit`]; only `main` ends the process.

use std::path::Path;

use crate::config::Options;
use crate::generator::{BridgeGenerator, Generator};
use crate::outcome::Outcome;
use crate::runtime::{Runtime, RuntimeResolver};
use crate::terminal::Terminal;

pub mod console;
pub mod error;
pub mod fatal;
pub mod generate;
pub mod invalid;
pub mod lift;
pub mod new;
pub mod run;
pub mod table;
pub mod version;
pub mod welcome;
pub mod www;

pub use console::execute_console;
pub use error::execute_error;
pub use generate::execute_generate;
pub use invalid::execute_invalid;
pub use lift::execute_lift;
pub use new::execute_new;
pub use run::execute_run;
pub use table::{CommandDefinition, CommandName, CommandTable};
pub use version::execute_version;
pub use welcome::execute_welcome;
pub use www::execute_www;

/// How the process should end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
}

impl Exit {
    pub fn code(&self) -> i32 {
        match self {
            Exit::Success => 0,
            Exit::Failure => 1,
        }
    }
}

/// Everything a handler may touch for one invocation
pub struct CommandContext {
    pub options: Options,
    pub terminal: Terminal,
    pub resolver: RuntimeResolver,
    pub generator: Box<dyn Generator>,
}

impl CommandContext {
    pub fn new(
        options: Options,
        terminal: Terminal,
        resolver: RuntimeResolver,
        generator: Box<dyn Generator>,
    ) -> Self {
        Self {
            options,
            terminal,
            resolver,
            generator,
        }
    }

    /// Context wired to real node processes
    pub fn for_options(options: Options, terminal: Terminal) -> Self {
        let resolver = RuntimeResolver::for_options(&options);
        let generator = Box::new(BridgeGenerator::for_options(&options));
        Self::new(options, terminal, resolver, generator)
    }

    /// Directory the command runs in
    pub fn cwd(&self) -> &Path {
        &self.options.app_path
    }
}

/// Load `runtime` and report its version
pub(crate) async fn load_version(runtime: &mut dyn Runtime, options: &Options) -> Outcome<String> {
    match runtime.load(options).await {
        Ok(()) => Outcome::Success(runtime.version().unwrap_or("unknown").to_string()),
        Err(err) => Outcome::FailedToLoadSails(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Exit::Success.code(), 0);
        assert_eq!(Exit::Failure.code(), 1);
    }
}
