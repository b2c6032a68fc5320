//! @acp:module "Runtime Providers"
//! @acp:summary "Local and bundled sources of a framework runtime"
//! @acp:domain cli
//! @acp:layer service

use std::path::PathBuf;

use super::node::{Installation, NodeRuntime};
use super::{Runtime, RuntimeReference};

/// Source of runtimes for one installation.
///
/// Providers are cheap to hold; nothing starts until [`create`] is called.
///
/// [`create`]: RuntimeProvider::create
pub trait RuntimeProvider: Send + Sync {
    fn reference(&self) -> RuntimeReference;

    /// Construct a fresh, not yet loaded runtime
    fn create(&self) -> Box<dyn Runtime>;
}

/// The project's own `node_modules/sails`, already validated
#[derive(Debug, Clone)]
pub struct LocalRuntimeProvider {
    installation: Installation,
    node: PathBuf,
}

impl LocalRuntimeProvider {
    pub fn new(installation: Installation, node: impl Into<PathBuf>) -> Self {
        Self {
            installation,
            node: node.into(),
        }
    }
}

impl RuntimeProvider for LocalRuntimeProvider {
    fn reference(&self) -> RuntimeReference {
        RuntimeReference::Local(self.installation.root().to_path_buf())
    }

    fn create(&self) -> Box<dyn Runtime> {
        Box::new(NodeRuntime::new(self.reference(), &self.node))
    }
}

/// The installation shipped with this CLI
#[derive(Debug, Clone)]
pub struct BundledRuntimeProvider {
    root: PathBuf,
    node: PathBuf,
}

impl BundledRuntimeProvider {
    pub fn new(root: impl Into<PathBuf>, node: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            node: node.into(),
        }
    }
}

impl RuntimeProvider for BundledRuntimeProvider {
    fn reference(&self) -> RuntimeReference {
        RuntimeReference::Bundled(self.root.clone())
    }

    fn create(&self) -> Box<dyn Runtime> {
        Box::new(NodeRuntime::new(self.reference(), &self.node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_reference() {
        let provider = BundledRuntimeProvider::new("/usr/lib/node_modules/sails", "node");
        let runtime = provider.create();

        assert_eq!(
            runtime.reference(),
            RuntimeReference::Bundled(PathBuf::from("/usr/lib/node_modules/sails"))
        );
        assert_eq!(runtime.version(), None);
    }
}
