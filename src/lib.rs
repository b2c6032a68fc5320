#![forbid(unsafe_code)]

//! @acp:module "Sails CLI Library"
//! @acp:summary "Command routing and runtime resolution for the Sails command-line tool"
//! @acp:domain cli
//! @acp:layer api
//! @acp:stability stable
//!
//! # Sails CLI
//!
//! Front end of the `sails` command: argument routing, the command table,
//! local-vs-bundled runtime selection and the outcome contract handlers use
//! to report results. The framework itself runs in `node`, reached through
//! a small process bridge.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sails_cli::{CommandContext, Options, ParsedArgs, Router, Terminal};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let options = Options::new(std::env::current_dir()?);
//!     let terminal = Terminal::stderr(options.log.level);
//!     let ctx = CommandContext::for_options(options, terminal);
//!
//!     let route = Router::route(&ParsedArgs::new(["version"]));
//!     let exit = Router::dispatch(route, &ctx).await?;
//!     std::process::exit(exit.code());
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod outcome;
pub mod router;
pub mod runtime;
pub mod terminal;

// Re-exports
pub use commands::{CommandContext, CommandName, CommandTable, Exit};
pub use config::{CliOverrides, Environment, LogLevel, Options, OptionsBuilder};
pub use error::{Result, SailsError};
pub use generator::{BridgeGenerator, GenerateOptions, Generated, Generator, NewAppOptions};
pub use outcome::{Outcome, OutcomeHandlers};
pub use router::{GenerateRequest, ParsedArgs, Route, Router};
pub use runtime::{
    BundledRuntimeProvider, LocalRuntimeProvider, Runtime, RuntimeEvent, RuntimeProvider,
    RuntimeReference, RuntimeResolver,
};
pub use terminal::Terminal;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
