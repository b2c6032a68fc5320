//! @acp:module "Runtime"
//! @acp:summary "Framework runtime interface and local/bundled resolution"
//! @acp:domain cli
//! @acp:layer service
//!
//! Commands that need a live Sails instance talk to it through [`Runtime`].
//! Which installation backs it is decided per invocation by the
//! [`RuntimeResolver`]: the project's own `node_modules/sails` when usable,
//! otherwise the installation bundled with this CLI.

pub mod bridge;
pub mod node;
pub mod provider;
pub mod resolver;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::config::Options;
use crate::error::{Result, SailsError};

pub use node::{Installation, NodeEntryProbe, NodeRuntime, PackageManifest, ProbeError};
pub use provider::{BundledRuntimeProvider, LocalRuntimeProvider, RuntimeProvider};
pub use resolver::{EntryProbe, LocalFactory, Resolved, RuntimeResolver};

/// Package name of the framework
pub const FRAMEWORK_PACKAGE: &str = "sails";

/// Which installation a runtime-dependent command runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeReference {
    /// `<cwd>/node_modules/sails`
    Local(PathBuf),
    /// The installation shipped with this CLI
    Bundled(PathBuf),
}

impl RuntimeReference {
    pub fn path(&self) -> &PathBuf {
        match self {
            RuntimeReference::Local(path) | RuntimeReference::Bundled(path) => path,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, RuntimeReference::Local(_))
    }
}

impl fmt::Display for RuntimeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeReference::Local(path) => write!(f, "local Sails at {}", path.display()),
            RuntimeReference::Bundled(path) => write!(f, "bundled Sails at {}", path.display()),
        }
    }
}

/// How a lifted app is driven once it is up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiftMode {
    /// Serve until the process is stopped
    Server,
    /// Start the interactive shell with this prompt after lifting
    Shell { prompt: String },
}

/// Events published by a runtime, in emission order.
///
/// This is also the wire format of bridge messages (`event` tag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RuntimeEvent {
    /// Loaded; carries the framework version
    Ready { version: String },
    /// App lifted and serving
    Lifted,
    /// Load or lift failed
    Failed { message: String },
    /// A build task finished
    TaskDone { task: String },
    /// A build task could not run
    TaskError { task: String, message: String },
    /// A generator fired one of its channels
    Outcome {
        channel: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
    /// The interactive shell closed
    ShellExit {
        #[serde(default)]
        error: Option<String>,
    },
    /// The runtime process is gone
    Exited { code: Option<i32> },
}

/// @acp:summary "A framework instance a command can load, lift and observe"
#[async_trait]
pub trait Runtime: Send {
    fn reference(&self) -> RuntimeReference;

    /// Framework version, known once loaded or lifted
    fn version(&self) -> Option<&str>;

    /// Load the framework without serving requests
    async fn load(&mut self, options: &Options) -> Result<()>;

    /// Lift the app; returns once it is up
    async fn lift(&mut self, options: &Options, mode: LiftMode) -> Result<()>;

    /// Start a named build task on a loaded runtime.
    ///
    /// Completion is only signalled through [`Runtime::subscribe`].
    async fn run_task(&mut self, task: &str) -> Result<()>;

    /// Receiver for events published from now on
    fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent>;

    /// Wait for the lifted app or its shell to stop; returns the exit event
    async fn wait(&mut self) -> Result<RuntimeEvent>;
}

/// Receive events until `pick` accepts one.
///
/// Lagged receivers skip ahead; a closed channel is a protocol error.
pub async fn wait_for<T>(
    events: &mut broadcast::Receiver<RuntimeEvent>,
    mut pick: impl FnMut(RuntimeEvent) -> Option<T>,
) -> Result<T> {
    loop {
        match events.recv().await {
            Ok(event) => {
                tracing::trace!(?event, "runtime event");
                if let Some(found) = pick(event) {
                    return Ok(found);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Dropped {} runtime events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => {
                return Err(SailsError::Protocol(
                    "runtime event stream closed".to_string(),
                ));
            }
        }
    }
}
