#![forbid(unsafe_code)]
//! Sails Command Line Interface

use std::path::PathBuf;

use clap::Parser;
use console::style;

use sails_cli::commands::execute_error;
use sails_cli::logging;
use sails_cli::{
    CliOverrides, CommandContext, Environment, LogLevel, OptionsBuilder, ParsedArgs, Router,
    Terminal,
};

#[derive(Parser)]
#[command(name = "sails")]
#[command(about = "Sails command-line tool")]
#[command(version)]
struct Cli {
    /// Command followed by its arguments (e.g. `generate model user`)
    args: Vec<String>,

    /// Port to lift the app on
    #[arg(long)]
    port: Option<u16>,

    /// Run in the production environment
    #[arg(long, visible_alias = "production", conflicts_with = "dev")]
    prod: bool,

    /// Run in the development environment
    #[arg(long, visible_alias = "development")]
    dev: bool,

    /// Verbose output
    #[arg(long)]
    verbose: bool,

    /// Log everything
    #[arg(long)]
    silly: bool,

    /// Log nothing
    #[arg(long)]
    silent: bool,

    /// Show what generators would do without writing files
    #[arg(long)]
    dry: bool,

    /// Load the framework with every hook disabled
    #[arg(long)]
    no_hooks: bool,

    /// Project rc file
    #[arg(long, default_value = ".sailsrc")]
    config: PathBuf,

    /// Node executable used to run Sails
    #[arg(long, env = "SAILS_NODE", default_value = "node")]
    node: PathBuf,

    /// Sails installation bundled with this CLI
    #[arg(long, env = "SAILS_RUNTIME_PATH")]
    runtime_path: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let environment = if self.prod {
            Some(Environment::Production)
        } else if self.dev {
            Some(Environment::Development)
        } else {
            None
        };

        let log_level = if self.silent {
            Some(LogLevel::Silent)
        } else if self.silly {
            Some(LogLevel::Silly)
        } else if self.verbose {
            Some(LogLevel::Verbose)
        } else {
            None
        };

        CliOverrides {
            port: self.port,
            environment,
            log_level,
            dry: self.dry,
            no_hooks: self.no_hooks,
            node: Some(self.node.clone()),
            runtime_path: self.runtime_path.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let options = match std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            OptionsBuilder::new(cwd)
                .rc_file(&cli.config)
                .overrides(cli.overrides())
                .build()
                .map_err(anyhow::Error::from)
        }) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{} {:#}", style("✗").red(), err);
            std::process::exit(1);
        }
    };

    logging::init_with_level(options.log.level);

    let terminal = Terminal::stderr(options.log.level);
    let ctx = CommandContext::for_options(options, terminal);

    let route = Router::route(&ParsedArgs::new(cli.args));
    let exit = match Router::dispatch(route, &ctx).await {
        Ok(exit) => exit,
        Err(err) => execute_error(&ctx, format!("{:#}", err)),
    };

    std::process::exit(exit.code());
}
