//! @acp:module "Command Table"
//! @acp:summary "Closed set of command names and their usage"
//! @acp:domain cli
//! @acp:layer model
//!
//! The table is static. Commands cannot be registered at runtime; a token
//! that is not an invocable entry routes to `invalid`.

use std::fmt;

/// Every command the router can reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    New,
    Generate,
    Console,
    Run,
    Www,
    Version,
    Lift,
    /// Internal fallback for unrecognized input
    Invalid,
    /// Internal catch-all for unexpected faults
    Error,
    /// Bare `sails`
    Welcome,
}

impl CommandName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::New => "new",
            CommandName::Generate => "generate",
            CommandName::Console => "console",
            CommandName::Run => "run",
            CommandName::Www => "www",
            CommandName::Version => "version",
            CommandName::Lift => "lift",
            CommandName::Invalid => "invalid",
            CommandName::Error => "error",
            CommandName::Welcome => "welcome",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the command table
#[derive(Debug)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub command: CommandName,
    /// Reachable by typing `name`
    pub invocable: bool,
    pub usage: &'static str,
    pub summary: &'static str,
}

static COMMAND_TABLE: &[CommandDefinition] = &[
    CommandDefinition {
        name: "lift",
        command: CommandName::Lift,
        invocable: true,
        usage: "sails lift",
        summary: "Run this Sails app (in the current dir)",
    },
    CommandDefinition {
        name: "console",
        command: CommandName::Console,
        invocable: true,
        usage: "sails console",
        summary: "Run this Sails app (in the current dir) & start an interactive Node.js console",
    },
    CommandDefinition {
        name: "new",
        command: CommandName::New,
        invocable: true,
        usage: "sails new <appName>",
        summary: "Create a new Sails project in a folder called <appName>",
    },
    CommandDefinition {
        name: "generate",
        command: CommandName::Generate,
        invocable: true,
        usage: "sails generate <module> <id>",
        summary: "Generate a controller or model called <id> in this app",
    },
    CommandDefinition {
        name: "www",
        command: CommandName::Www,
        invocable: true,
        usage: "sails www",
        summary: "Compile assets into a standalone `www` directory",
    },
    CommandDefinition {
        name: "version",
        command: CommandName::Version,
        invocable: true,
        usage: "sails version",
        summary: "Get the current Sails version",
    },
    CommandDefinition {
        name: "run",
        command: CommandName::Run,
        invocable: true,
        usage: "sails run",
        summary: "Not available in this release",
    },
    CommandDefinition {
        name: "invalid",
        command: CommandName::Invalid,
        invocable: false,
        usage: "",
        summary: "",
    },
    CommandDefinition {
        name: "error",
        command: CommandName::Error,
        invocable: false,
        usage: "",
        summary: "",
    },
    CommandDefinition {
        name: "welcome",
        command: CommandName::Welcome,
        invocable: false,
        usage: "sails",
        summary: "",
    },
];

/// Read-only view over the static table
pub struct CommandTable;

impl CommandTable {
    pub fn entries() -> &'static [CommandDefinition] {
        COMMAND_TABLE
    }

    /// Exact, case-sensitive match over invocable entries
    pub fn lookup(token: &str) -> Option<&'static CommandDefinition> {
        COMMAND_TABLE
            .iter()
            .find(|definition| definition.invocable && definition.name == token)
    }

    /// Usage block printed by the welcome screen
    pub fn usage() -> String {
        let width = COMMAND_TABLE
            .iter()
            .filter(|d| d.invocable)
            .map(|d| d.usage.len())
            .max()
            .unwrap_or(0);

        let mut usage = String::from("Usage: sails <command>\n");
        let listed = COMMAND_TABLE
            .iter()
            .filter(|d| d.invocable && d.command != CommandName::Run);
        for definition in listed {
            usage.push_str(&format!(
                "\n  {:width$}  {}",
                definition.usage,
                definition.summary,
                width = width
            ));
        }
        usage
    }
}
