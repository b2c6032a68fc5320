//! @acp:module "Node Runtime"
//! @acp:summary "Sails installations on disk and the runtime that drives them"
//! @acp:domain cli
//! @acp:layer service

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::broadcast;

use super::bridge::{Bridge, BridgeRequest};
use super::resolver::EntryProbe;
use super::{wait_for, LiftMode, Runtime, RuntimeEvent, RuntimeReference};
use crate::config::Options;
use crate::error::{Result, SailsError};

const EVENT_CAPACITY: usize = 64;

/// Fields of a `package.json` the CLI cares about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub main: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    pub fn load(path: &Path) -> std::result::Result<Self, ProbeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ProbeError::MissingManifest(path.to_path_buf()))?;
        serde_json::from_str(&content).map_err(|e| ProbeError::MalformedManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Why a candidate installation is not usable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("No installation at {0}")]
    Missing(PathBuf),

    #[error("Cannot read {0}")]
    MissingManifest(PathBuf),

    #[error("Cannot parse {path}: {reason}")]
    MalformedManifest { path: PathBuf, reason: String },

    #[error("{path} is not an installation of {expected}")]
    WrongPackage { path: PathBuf, expected: String },

    #[error("{0} does not resolve to a module")]
    NoEntry(PathBuf),

    #[error("{0} does not expose `lift`")]
    NoLift(PathBuf),
}

/// A framework installation whose `lib` module resolves
#[derive(Debug, Clone)]
pub struct Installation {
    root: PathBuf,
    entry: PathBuf,
    manifest: PackageManifest,
}

impl Installation {
    /// Check that `root` holds `package` and that `root/lib` resolves.
    ///
    /// Read-only; whether the module exposes `lift` is the caller's
    /// [`EntryProbe`] question.
    pub fn inspect(root: &Path, package: &str) -> std::result::Result<Self, ProbeError> {
        if !root.is_dir() {
            return Err(ProbeError::Missing(root.to_path_buf()));
        }

        let manifest = PackageManifest::load(&root.join("package.json"))?;
        if manifest.name.as_deref() != Some(package) {
            return Err(ProbeError::WrongPackage {
                path: root.to_path_buf(),
                expected: package.to_string(),
            });
        }

        let entry = resolve_module(&root.join("lib"))
            .ok_or_else(|| ProbeError::NoEntry(root.join("lib")))?;

        Ok(Self {
            root: root.to_path_buf(),
            entry,
            manifest,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File `require(root + '/lib')` would load
    pub fn entry(&self) -> &Path {
        &self.entry
    }

    pub fn version(&self) -> Option<&str> {
        self.manifest.version.as_deref()
    }
}

/// Node's resolution of a module path: file, `.js` file, or directory
/// with `package.json` `main` / `index.js`.
fn resolve_module(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    let with_ext = path.with_extension("js");
    if with_ext.is_file() {
        return Some(with_ext);
    }
    if !path.is_dir() {
        return None;
    }
    let main = PackageManifest::load(&path.join("package.json"))
        .ok()
        .and_then(|manifest| manifest.main);
    if let Some(main) = main {
        let target = path.join(main);
        if let Some(resolved) = resolve_file(&target) {
            return Some(resolved);
        }
    }
    resolve_file(&path.join("index.js"))
}

fn resolve_file(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        Some(path.to_path_buf())
    } else if path.with_extension("js").is_file() {
        Some(path.with_extension("js"))
    } else if path.join("index.js").is_file() {
        Some(path.join("index.js"))
    } else {
        None
    }
}

/// Asks `node` whether a module exports a `lift` function
#[derive(Debug, Clone)]
pub struct NodeEntryProbe {
    node: PathBuf,
    timeout: Duration,
}

impl NodeEntryProbe {
    pub fn new(node: impl Into<PathBuf>) -> Self {
        Self {
            node: node.into(),
            timeout: Duration::from_secs(15),
        }
    }
}

const PROBE_SCRIPT: &str =
    "var m = require(process.argv[1]); process.exit(m && typeof m.lift === 'function' ? 0 : 3);";

#[async_trait]
impl EntryProbe for NodeEntryProbe {
    async fn exposes_lift(&self, entry: &Path) -> bool {
        let status = Command::new(&self.node)
            .arg("-e")
            .arg(PROBE_SCRIPT)
            .arg(entry)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        match tokio::time::timeout(self.timeout, status).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(err)) => {
                tracing::warn!("Could not run {}: {}", self.node.display(), err);
                false
            }
            Err(_) => {
                tracing::warn!("Timed out loading {}", entry.display());
                false
            }
        }
    }
}

/// @acp:summary "Runtime backed by a node bridge process"
pub struct NodeRuntime {
    reference: RuntimeReference,
    node: PathBuf,
    events: broadcast::Sender<RuntimeEvent>,
    bridge: Option<Bridge>,
    /// Subscribed before the bridge started, so no event is missed
    listener: Option<broadcast::Receiver<RuntimeEvent>>,
    version: Option<String>,
}

impl NodeRuntime {
    pub fn new(reference: RuntimeReference, node: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            reference,
            node: node.into(),
            events,
            bridge: None,
            listener: None,
            version: None,
        }
    }

    fn spawn(&mut self, request: BridgeRequest) -> Result<broadcast::Receiver<RuntimeEvent>> {
        let receiver = self.events.subscribe();
        let bridge = Bridge::spawn(
            &self.node,
            self.reference.path(),
            &request,
            self.events.clone(),
        )?;
        self.bridge = Some(bridge);
        Ok(receiver)
    }
}

#[async_trait]
impl Runtime for NodeRuntime {
    fn reference(&self) -> RuntimeReference {
        self.reference.clone()
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    async fn load(&mut self, options: &Options) -> Result<()> {
        let mut events = self.spawn(BridgeRequest::Load {
            options: options.to_json()?,
        })?;

        let loaded = wait_for(&mut events, |event| match event {
            RuntimeEvent::Ready { version } => Some(Ok(version)),
            RuntimeEvent::Failed { message } => Some(Err(message)),
            RuntimeEvent::Exited { code } => Some(Err(format!(
                "Sails exited before it finished loading ({})",
                describe_code(code)
            ))),
            _ => None,
        })
        .await;
        self.listener = Some(events);

        self.version = Some(loaded?.map_err(SailsError::Runtime)?);
        Ok(())
    }

    async fn lift(&mut self, options: &Options, mode: LiftMode) -> Result<()> {
        let shell = match mode {
            LiftMode::Server => None,
            LiftMode::Shell { prompt } => Some(prompt),
        };
        let mut events = self.spawn(BridgeRequest::Lift {
            options: options.to_json()?,
            shell,
        })?;

        let lifted = wait_for(&mut events, |event| match event {
            RuntimeEvent::Lifted => Some(Ok(())),
            RuntimeEvent::Failed { message } => Some(Err(message)),
            RuntimeEvent::Exited { code } => Some(Err(format!(
                "Sails exited before it finished lifting ({})",
                describe_code(code)
            ))),
            _ => None,
        })
        .await;
        self.listener = Some(events);

        lifted?.map_err(SailsError::Runtime)
    }

    async fn run_task(&mut self, task: &str) -> Result<()> {
        let bridge = self
            .bridge
            .as_mut()
            .ok_or_else(|| SailsError::Runtime("Sails is not loaded".to_string()))?;
        bridge
            .send(&BridgeRequest::Task {
                name: task.to_string(),
            })
            .await
    }

    fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events.subscribe()
    }

    async fn wait(&mut self) -> Result<RuntimeEvent> {
        let mut events = self
            .listener
            .take()
            .ok_or_else(|| SailsError::Runtime("Sails is not running".to_string()))?;
        let stopped = wait_for(&mut events, |event| match event {
            RuntimeEvent::ShellExit { .. } | RuntimeEvent::Exited { .. } => Some(event),
            _ => None,
        })
        .await;
        self.listener = Some(events);
        stopped
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "killed by a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_inspect_index_entry() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("package.json"), r#"{"name":"sails","version":"0.9.4"}"#);
        write(&dir.path().join("lib/index.js"), "module.exports = {};");

        let install = Installation::inspect(dir.path(), "sails").unwrap();
        assert_eq!(install.entry(), dir.path().join("lib/index.js"));
        assert_eq!(install.version(), Some("0.9.4"));
    }

    #[test]
    fn test_inspect_lib_file_and_main() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("package.json"), r#"{"name":"sails"}"#);
        write(&dir.path().join("lib.js"), "");
        let install = Installation::inspect(dir.path(), "sails").unwrap();
        assert_eq!(install.entry(), dir.path().join("lib.js"));

        let dir = TempDir::new().unwrap();
        write(&dir.path().join("package.json"), r#"{"name":"sails"}"#);
        write(&dir.path().join("lib/package.json"), r#"{"main":"app/sails.js"}"#);
        write(&dir.path().join("lib/app/sails.js"), "");
        let install = Installation::inspect(dir.path(), "sails").unwrap();
        assert_eq!(install.entry(), dir.path().join("lib/app/sails.js"));
    }

    #[test]
    fn test_inspect_failures() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(
            Installation::inspect(&missing, "sails").unwrap_err(),
            ProbeError::Missing(missing.clone())
        );

        write(&dir.path().join("package.json"), "{ broken");
        assert!(matches!(
            Installation::inspect(dir.path(), "sails").unwrap_err(),
            ProbeError::MalformedManifest { .. }
        ));

        write(&dir.path().join("package.json"), r#"{"name":"express"}"#);
        assert!(matches!(
            Installation::inspect(dir.path(), "sails").unwrap_err(),
            ProbeError::WrongPackage { .. }
        ));

        write(&dir.path().join("package.json"), r#"{"name":"sails"}"#);
        assert_eq!(
            Installation::inspect(dir.path(), "sails").unwrap_err(),
            ProbeError::NoEntry(dir.path().join("lib"))
        );
    }

    #[tokio::test]
    async fn test_missing_node_probe_is_false() {
        let probe = NodeEntryProbe::new("/definitely/not/node");
        assert!(!probe.exposes_lift(Path::new("/tmp/lib")).await);
    }

    #[tokio::test]
    async fn test_run_task_requires_load() {
        let mut runtime = NodeRuntime::new(
            RuntimeReference::Bundled(PathBuf::from("/opt/sails")),
            "node",
        );
        assert!(runtime.run_task("build").await.is_err());
        assert!(runtime.wait().await.is_err());
    }
}
