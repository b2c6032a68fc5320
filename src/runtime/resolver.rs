//! @acp:module "Runtime Resolver"
//! @acp:summary "Chooses between the project's Sails and the bundled one"
//! @acp:domain cli
//! @acp:layer service
//!
//! A project may pin a Sails version different from the one this CLI ships
//! with. When `<cwd>/node_modules/sails` is present and its `lib` module
//! exposes `lift`, commands run against it; anything else falls back to the
//! bundled installation. Resolution never fails and never starts a runtime.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::node::{Installation, NodeEntryProbe, PackageManifest, ProbeError};
use super::provider::{BundledRuntimeProvider, LocalRuntimeProvider, RuntimeProvider};
use super::{RuntimeReference, FRAMEWORK_PACKAGE};
use crate::config::Options;

/// Checks the entry-point shape of a candidate module
#[async_trait]
pub trait EntryProbe: Send + Sync {
    /// Whether the module at `entry` exposes a `lift` function
    async fn exposes_lift(&self, entry: &Path) -> bool;
}

/// Builds the provider for a validated local installation
pub type LocalFactory = Box<dyn Fn(Installation) -> Box<dyn RuntimeProvider> + Send + Sync>;

/// Result of resolution for one invocation
pub enum Resolved<'a> {
    Local(Box<dyn RuntimeProvider>),
    Bundled(&'a dyn RuntimeProvider),
}

impl Resolved<'_> {
    pub fn provider(&self) -> &dyn RuntimeProvider {
        match self {
            Resolved::Local(provider) => provider.as_ref(),
            Resolved::Bundled(provider) => *provider,
        }
    }

    pub fn reference(&self) -> RuntimeReference {
        self.provider().reference()
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Resolved::Local(_))
    }
}

/// @acp:summary "Local-vs-bundled runtime selection"
pub struct RuntimeResolver {
    package: String,
    bundled: Box<dyn RuntimeProvider>,
    probe: Box<dyn EntryProbe>,
    local: LocalFactory,
}

impl RuntimeResolver {
    pub fn new(
        bundled: impl RuntimeProvider + 'static,
        probe: impl EntryProbe + 'static,
        local: LocalFactory,
    ) -> Self {
        Self {
            package: FRAMEWORK_PACKAGE.to_string(),
            bundled: Box::new(bundled),
            probe: Box::new(probe),
            local,
        }
    }

    /// Resolver backed by real node processes
    pub fn for_options(options: &Options) -> Self {
        let node = options.node.clone();
        Self::new(
            BundledRuntimeProvider::new(&options.runtime_path, &options.node),
            NodeEntryProbe::new(&options.node),
            Box::new(move |installation: Installation| {
                Box::new(LocalRuntimeProvider::new(installation, node.clone()))
                    as Box<dyn RuntimeProvider>
            }),
        )
    }

    /// Where a project-local installation would live
    pub fn candidate(&self, cwd: &Path) -> PathBuf {
        cwd.join("node_modules").join(&self.package)
    }

    pub fn bundled(&self) -> &dyn RuntimeProvider {
        self.bundled.as_ref()
    }

    /// Validate the local candidate. Read-only and repeatable.
    pub async fn probe_local(&self, cwd: &Path) -> Result<Installation, ProbeError> {
        let installation = Installation::inspect(&self.candidate(cwd), &self.package)?;

        if !self.probe.exposes_lift(installation.entry()).await {
            return Err(ProbeError::NoLift(installation.entry().to_path_buf()));
        }

        self.warn_on_version_mismatch(cwd, &installation);
        Ok(installation)
    }

    /// Pick the runtime for this invocation. Computed fresh every time.
    pub async fn resolve(&self, cwd: &Path) -> Resolved<'_> {
        match self.probe_local(cwd).await {
            Ok(installation) => {
                tracing::debug!("Using local Sails at {}", installation.root().display());
                Resolved::Local((self.local)(installation))
            }
            Err(ProbeError::Missing(path)) => {
                tracing::debug!("No local Sails at {}", path.display());
                Resolved::Bundled(self.bundled())
            }
            Err(reason) => {
                tracing::warn!("Ignoring local Sails: {}", reason);
                Resolved::Bundled(self.bundled())
            }
        }
    }

    fn warn_on_version_mismatch(&self, cwd: &Path, installation: &Installation) {
        let Ok(app) = PackageManifest::load(&cwd.join("package.json")) else {
            return;
        };
        let (Some(wanted), Some(installed)) =
            (app.dependencies.get(&self.package), installation.version())
        else {
            return;
        };
        if wanted.trim_start_matches(['^', '~', '=', 'v']) != installed {
            tracing::warn!(
                "App depends on {}@{} but {} is installed in node_modules",
                self.package,
                wanted,
                installed
            );
        }
    }
}
