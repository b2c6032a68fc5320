//! @acp:module "Configuration"
//! @acp:summary "Options building from command-line flags and .sailsrc files"
//! @acp:domain cli
//! @acp:layer config
//!
//! [`Options`] is built exactly once, in `main`, and then only read. Commands
//! that need a variant (hooks off, no ASCII ship) derive a fresh clone through
//! the `with_*` / `without_*` helpers.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SailsError};

/// Name of the rc file looked up in the home and project directories
pub const RC_FILE: &str = ".sailsrc";

fn default_node() -> PathBuf {
    PathBuf::from("node")
}

/// Default location of the Sails installation bundled with this CLI.
///
/// A global npm install lays out `<prefix>/bin/sails` next to
/// `<prefix>/lib/node_modules/sails`, so the bundled runtime is found
/// relative to the running executable.
pub fn default_runtime_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent()?.parent().map(Path::to_path_buf))
        .map(|prefix| prefix.join("lib").join("node_modules").join("sails"))
        .unwrap_or_else(|| PathBuf::from("node_modules").join("sails"))
}

/// @acp:summary "Log levels understood by the Sails logger"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Verbose,
    Silly,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "silent",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
            LogLevel::Silly => "silly",
        }
    }

    /// Whether a line logged at `line` shows up when this level is configured
    pub fn allows(&self, line: LogLevel) -> bool {
        line != LogLevel::Silent && line <= *self
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logger settings handed to the framework
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
    /// Suppress the ASCII ship printed on lift
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_ship: bool,
}

/// Framework environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

/// Hook selection: `false` turns every hook off, a map toggles single hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hooks {
    All(bool),
    Toggles(BTreeMap<String, bool>),
}

/// @acp:summary "Immutable configuration shared by every command"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Directory of the app being operated on
    pub app_path: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<Hooks>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globals: Option<bool>,

    /// Report what generators would do without writing files
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dry: bool,

    // CLI-only settings (never handed to the framework)
    /// Node executable used for the framework bridge
    #[serde(skip, default = "default_node")]
    pub node: PathBuf,

    /// Installation directory of the bundled Sails runtime
    #[serde(skip, default = "default_runtime_path")]
    pub runtime_path: PathBuf,
}

impl Options {
    pub fn new(app_path: impl Into<PathBuf>) -> Self {
        Self {
            app_path: app_path.into(),
            port: None,
            environment: None,
            log: LogConfig::default(),
            hooks: None,
            globals: None,
            dry: false,
            node: default_node(),
            runtime_path: default_runtime_path(),
        }
    }

    /// Clone with every hook and the globals turned off.
    ///
    /// Used when the framework is only loaded to inspect it (version lookup).
    pub fn with_hooks_disabled(&self) -> Self {
        let mut options = self.clone();
        options.hooks = Some(Hooks::All(false));
        options.globals = Some(false);
        options
    }

    /// Clone with a single hook turned off and the globals disabled
    pub fn with_hook_disabled(&self, hook: &str) -> Self {
        let mut options = self.clone();
        let mut toggles = match options.hooks.take() {
            Some(Hooks::Toggles(toggles)) => toggles,
            _ => BTreeMap::new(),
        };
        toggles.insert(hook.to_string(), false);
        options.hooks = Some(Hooks::Toggles(toggles));
        options.globals = Some(false);
        options
    }

    /// Clone that keeps the lift banner quiet (interactive console)
    pub fn without_ship(&self) -> Self {
        let mut options = self.clone();
        options.log.no_ship = true;
        options
    }

    /// JSON form handed to the framework
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Partial options read from a `.sailsrc` file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcFile {
    pub port: Option<u16>,
    pub environment: Option<Environment>,
    pub log: Option<RcLog>,
    pub hooks: Option<Hooks>,
    pub globals: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RcLog {
    pub level: Option<LogLevel>,
}

impl RcFile {
    /// @acp:summary "Load an rc file; a missing file yields None"
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| SailsError::Config {
                path: path.to_path_buf(),
                source,
            })
    }

    fn apply(self, options: &mut Options) {
        if let Some(port) = self.port {
            options.port = Some(port);
        }
        if let Some(environment) = self.environment {
            options.environment = Some(environment);
        }
        if let Some(level) = self.log.and_then(|log| log.level) {
            options.log.level = level;
        }
        if let Some(hooks) = self.hooks {
            options.hooks = Some(hooks);
        }
        if let Some(globals) = self.globals {
            options.globals = Some(globals);
        }
    }
}

/// Flag values collected from the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub environment: Option<Environment>,
    pub log_level: Option<LogLevel>,
    pub dry: bool,
    pub no_hooks: bool,
    pub node: Option<PathBuf>,
    pub runtime_path: Option<PathBuf>,
}

/// @acp:summary "Builds Options from defaults, rc files and flags (in that order)"
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    app_path: PathBuf,
    global_rc: Option<PathBuf>,
    project_rc: PathBuf,
    overrides: CliOverrides,
}

impl OptionsBuilder {
    pub fn new(app_path: impl Into<PathBuf>) -> Self {
        let app_path = app_path.into();
        Self {
            project_rc: app_path.join(RC_FILE),
            global_rc: dirs::home_dir().map(|home| home.join(RC_FILE)),
            app_path,
            overrides: CliOverrides::default(),
        }
    }

    /// Use a different project rc file
    pub fn rc_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.project_rc = if path.is_absolute() {
            path
        } else {
            self.app_path.join(path)
        };
        self
    }

    /// Skip the rc file in the home directory
    pub fn without_global_rc(mut self) -> Self {
        self.global_rc = None;
        self
    }

    pub fn overrides(mut self, overrides: CliOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn build(self) -> Result<Options> {
        let mut options = Options::new(&self.app_path);

        for rc in self.global_rc.iter().chain(std::iter::once(&self.project_rc)) {
            if let Some(file) = RcFile::load(rc)? {
                tracing::debug!("Applying rc file {}", rc.display());
                file.apply(&mut options);
            }
        }

        let overrides = self.overrides;
        if let Some(port) = overrides.port {
            options.port = Some(port);
        }
        if let Some(environment) = overrides.environment {
            options.environment = Some(environment);
        }
        if let Some(level) = overrides.log_level {
            options.log.level = level;
        }
        if overrides.no_hooks {
            options.hooks = Some(Hooks::All(false));
        }
        if let Some(node) = overrides.node {
            options.node = node;
        }
        if let Some(runtime_path) = overrides.runtime_path {
            options.runtime_path = runtime_path;
        }
        options.dry = overrides.dry;

        Ok(options)
    }
}
