//! @acp:module "Router"
//! @acp:summary "Turns positional arguments into a command and invokes it"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Routing is a pure lookup: [`Router::route`] only inspects tokens and
//! [`Router::dispatch`] only awaits the chosen handler. Printing and exit
//! codes belong to the handlers and `main`.

use anyhow::Result;

use crate::commands::{self, CommandContext, CommandName, CommandTable, Exit};
use crate::config::Options;
use crate::generator::{Attribute, GenerateOptions};

/// Positional tokens left after flags were folded into [`Options`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub positional: Vec<String>,
}

impl ParsedArgs {
    pub fn new<I, S>(positional: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            positional: positional.into_iter().map(Into::into).collect(),
        }
    }

    /// The would-be command name
    pub fn first(&self) -> Option<&str> {
        self.positional.first().map(String::as_str)
    }

    /// Tokens after the command name
    pub fn rest(&self) -> &[String] {
        self.positional.get(1..).unwrap_or(&[])
    }
}

/// Bound parameters of `sails generate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub module: String,
    pub id: String,
    pub actions: Vec<String>,
    pub attributes: Vec<Attribute>,
}

impl GenerateRequest {
    fn bind(tokens: &[String]) -> std::result::Result<Self, String> {
        let Some(module) = tokens.first() else {
            return Err(
                "Please specify what to generate, e.g. `sails generate controller user`."
                    .to_string(),
            );
        };
        let Some(id) = tokens.get(1) else {
            return Err(format!("Please specify a name for the new {}.", module));
        };

        let extras = &tokens[2..];
        let (actions, attributes) = match module.as_str() {
            "controller" => (extras.to_vec(), Vec::new()),
            "model" => (Vec::new(), extras.iter().map(|t| Attribute::parse(t)).collect()),
            _ => (Vec::new(), Vec::new()),
        };

        Ok(Self {
            module: module.clone(),
            id: id.clone(),
            actions,
            attributes,
        })
    }

    /// Generator options for this request under `options`
    pub fn to_options(&self, options: &Options) -> GenerateOptions {
        GenerateOptions::new(options, &self.module, &self.id)
            .with_actions(self.actions.clone())
            .with_attributes(self.attributes.clone())
    }
}

/// Where an invocation goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Welcome,
    /// `args` is set when the command itself was not understood
    Invalid {
        args: Option<ParsedArgs>,
        messages: Vec<String>,
    },
    New {
        app_name: Option<String>,
    },
    Generate(GenerateRequest),
    Console,
    Run,
    Www,
    Version,
    Lift,
}

impl Route {
    pub fn command(&self) -> CommandName {
        match self {
            Route::Welcome => CommandName::Welcome,
            Route::Invalid { .. } => CommandName::Invalid,
            Route::New { .. } => CommandName::New,
            Route::Generate(_) => CommandName::Generate,
            Route::Console => CommandName::Console,
            Route::Run => CommandName::Run,
            Route::Www => CommandName::Www,
            Route::Version => CommandName::Version,
            Route::Lift => CommandName::Lift,
        }
    }
}

pub struct Router;

impl Router {
    /// Pick the command for `args`. Never fails.
    pub fn route(args: &ParsedArgs) -> Route {
        let Some(first) = args.first() else {
            return Route::Welcome;
        };
        let Some(definition) = CommandTable::lookup(first) else {
            return Route::Invalid {
                args: Some(args.clone()),
                messages: Vec::new(),
            };
        };

        match definition.command {
            CommandName::New => Route::New {
                app_name: args.rest().first().cloned(),
            },
            CommandName::Generate => match GenerateRequest::bind(args.rest()) {
                Ok(request) => Route::Generate(request),
                Err(message) => Route::Invalid {
                    args: None,
                    messages: vec![message],
                },
            },
            CommandName::Console => Route::Console,
            CommandName::Run => Route::Run,
            CommandName::Www => Route::Www,
            CommandName::Version => Route::Version,
            CommandName::Lift => Route::Lift,
            CommandName::Invalid | CommandName::Error | CommandName::Welcome => Route::Invalid {
                args: Some(args.clone()),
                messages: Vec::new(),
            },
        }
    }

    /// Invoke the handler for `route`
    pub async fn dispatch(route: Route, ctx: &CommandContext) -> Result<Exit> {
        tracing::debug!("Dispatching `{}`", route.command());

        match route {
            Route::Welcome => commands::execute_welcome(ctx).await,
            Route::Invalid { args, messages } => {
                Ok(commands::execute_invalid(ctx, args.as_ref(), &messages))
            }
            Route::New { app_name } => commands::execute_new(ctx, app_name).await,
            Route::Generate(request) => {
                commands::execute_generate(ctx, request.to_options(&ctx.options)).await
            }
            Route::Console => commands::execute_console(ctx).await,
            Route::Run => commands::execute_run(ctx).await,
            Route::Www => commands::execute_www(ctx).await,
            Route::Version => commands::execute_version(ctx).await,
            Route::Lift => commands::execute_lift(ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_of_single_token() {
        let args = ParsedArgs::new(["lift"]);
        assert!(args.rest().is_empty());
        assert_eq!(ParsedArgs::default().first(), None);
    }

    #[test]
    fn test_surplus_tokens_are_ignored() {
        assert_eq!(Router::route(&ParsedArgs::new(["lift", "now"])), Route::Lift);
        assert_eq!(Router::route(&ParsedArgs::new(["version", "-x"])), Route::Version);
    }

    #[test]
    fn test_new_without_name_still_routes_to_new() {
        assert_eq!(
            Router::route(&ParsedArgs::new(["new"])),
            Route::New { app_name: None }
        );
    }
}
