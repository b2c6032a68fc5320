//! Shared fakes for the integration tests.
//!
//! Runtimes, providers, the entry probe and the generator are replaced
//! through their traits so no test needs `node`.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;

use sails_cli::config::{LogLevel, Options};
use sails_cli::error::{Result, SailsError};
use sails_cli::runtime::{
    EntryProbe, Installation, LiftMode, Runtime, RuntimeEvent, RuntimeProvider, RuntimeReference,
    RuntimeResolver,
};
use sails_cli::{
    CommandContext, GenerateOptions, Generated, Generator, NewAppOptions, Outcome, Terminal,
};

/// How a fake runtime behaves
#[derive(Debug, Clone)]
pub struct Script {
    pub version: String,
    pub fail_load: Option<String>,
    pub fail_lift: Option<String>,
    /// Published when a task is started
    pub task_event: Option<RuntimeEvent>,
    /// Returned from `wait`
    pub stop_event: RuntimeEvent,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            version: "0.9.4".to_string(),
            fail_load: None,
            fail_lift: None,
            task_event: None,
            stop_event: RuntimeEvent::Exited { code: Some(0) },
        }
    }
}

impl Script {
    pub fn version(version: &str) -> Self {
        Self {
            version: version.to_string(),
            ..Default::default()
        }
    }
}

/// What was asked of the runtimes of one provider
#[derive(Debug, Default)]
pub struct Calls {
    pub created: usize,
    pub loads: Vec<Options>,
    pub lifts: Vec<(Options, LiftMode)>,
    pub tasks: Vec<String>,
}

pub type SharedCalls = Arc<Mutex<Calls>>;

pub struct FakeRuntime {
    reference: RuntimeReference,
    script: Script,
    calls: SharedCalls,
    events: broadcast::Sender<RuntimeEvent>,
    version: Option<String>,
}

#[async_trait]
impl Runtime for FakeRuntime {
    fn reference(&self) -> RuntimeReference {
        self.reference.clone()
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    async fn load(&mut self, options: &Options) -> Result<()> {
        self.calls.lock().unwrap().loads.push(options.clone());
        if let Some(message) = &self.script.fail_load {
            return Err(SailsError::Runtime(message.clone()));
        }
        self.version = Some(self.script.version.clone());
        Ok(())
    }

    async fn lift(&mut self, options: &Options, mode: LiftMode) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .lifts
            .push((options.clone(), mode));
        if let Some(message) = &self.script.fail_lift {
            return Err(SailsError::Runtime(message.clone()));
        }
        self.version = Some(self.script.version.clone());
        Ok(())
    }

    async fn run_task(&mut self, task: &str) -> Result<()> {
        self.calls.lock().unwrap().tasks.push(task.to_string());
        if let Some(event) = self.script.task_event.clone() {
            let _ = self.events.send(event);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events.subscribe()
    }

    async fn wait(&mut self) -> Result<RuntimeEvent> {
        Ok(self.script.stop_event.clone())
    }
}

pub struct FakeProvider {
    pub reference: RuntimeReference,
    pub script: Script,
    pub calls: SharedCalls,
}

impl FakeProvider {
    pub fn bundled(script: Script) -> (Self, SharedCalls) {
        let calls = SharedCalls::default();
        let provider = Self {
            reference: RuntimeReference::Bundled(PathBuf::from("/usr/lib/node_modules/sails")),
            script,
            calls: calls.clone(),
        };
        (provider, calls)
    }
}

impl RuntimeProvider for FakeProvider {
    fn reference(&self) -> RuntimeReference {
        self.reference.clone()
    }

    fn create(&self) -> Box<dyn Runtime> {
        self.calls.lock().unwrap().created += 1;
        let (events, _) = broadcast::channel(16);
        Box::new(FakeRuntime {
            reference: self.reference.clone(),
            script: self.script.clone(),
            calls: self.calls.clone(),
            events,
            version: None,
        })
    }
}

/// Entry probe with a fixed answer
pub struct FakeProbe(pub bool);

#[async_trait]
impl EntryProbe for FakeProbe {
    async fn exposes_lift(&self, _entry: &Path) -> bool {
        self.0
    }
}

/// Generator returning canned outcomes and recording each call
#[derive(Clone)]
pub struct FakeGenerator {
    pub new_app: Outcome<String>,
    pub generate: Outcome<Generated>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl Default for FakeGenerator {
    fn default() -> Self {
        Self {
            new_app: Outcome::Success("Created a new Sails app `app`!".to_string()),
            generate: Outcome::Error("not scripted".to_string()),
            calls: Arc::default(),
        }
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn new_app(&self, options: &NewAppOptions) -> Outcome<String> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("new {:?}", options.app_name));
        self.new_app.clone()
    }

    async fn generate(&self, options: &GenerateOptions) -> Outcome<Generated> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("generate {} {}", options.module, options.id));
        self.generate.clone()
    }
}

/// A command context over fakes, plus handles to inspect afterwards
pub struct Harness {
    pub ctx: CommandContext,
    pub bundled: SharedCalls,
    pub local: SharedCalls,
    pub generator: FakeGenerator,
}

impl Harness {
    pub fn text(&self) -> Vec<String> {
        self.ctx.terminal.text()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text().iter().any(|line| line.contains(needle))
    }
}

pub struct HarnessBuilder {
    options: Options,
    level: LogLevel,
    bundled: Script,
    local: Script,
    exposes_lift: bool,
    generator: FakeGenerator,
}

impl HarnessBuilder {
    pub fn new(app_path: &Path) -> Self {
        Self {
            options: Options::new(app_path),
            level: LogLevel::Silly,
            bundled: Script::default(),
            local: Script::version("0.9.3"),
            exposes_lift: true,
            generator: FakeGenerator::default(),
        }
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn bundled(mut self, script: Script) -> Self {
        self.bundled = script;
        self
    }

    pub fn local(mut self, script: Script) -> Self {
        self.local = script;
        self
    }

    pub fn exposes_lift(mut self, exposes: bool) -> Self {
        self.exposes_lift = exposes;
        self
    }

    pub fn generator(mut self, generator: FakeGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn build(self) -> Harness {
        let (bundled, bundled_calls) = FakeProvider::bundled(self.bundled);
        let local_calls = SharedCalls::default();
        let resolver = resolver(bundled, self.exposes_lift, self.local, local_calls.clone());

        let ctx = CommandContext::new(
            self.options,
            Terminal::capture(self.level),
            resolver,
            Box::new(self.generator.clone()),
        );
        Harness {
            ctx,
            bundled: bundled_calls,
            local: local_calls,
            generator: self.generator,
        }
    }
}

/// Resolver whose local runtimes are fakes following `local`
pub fn resolver(
    bundled: FakeProvider,
    exposes_lift: bool,
    local: Script,
    local_calls: SharedCalls,
) -> RuntimeResolver {
    RuntimeResolver::new(
        bundled,
        FakeProbe(exposes_lift),
        Box::new(move |installation: Installation| {
            Box::new(FakeProvider {
                reference: RuntimeReference::Local(installation.root().to_path_buf()),
                script: local.clone(),
                calls: local_calls.clone(),
            }) as Box<dyn RuntimeProvider>
        }),
    )
}

/// Lay out `<app>/node_modules/<name>` with a `lib/index.js` entry
pub fn install_local(app: &Path, name: &str, version: &str) -> PathBuf {
    let root = app.join("node_modules").join("sails");
    fs::create_dir_all(root.join("lib")).unwrap();
    fs::write(
        root.join("package.json"),
        format!(r#"{{ "name": "{}", "version": "{}" }}"#, name, version),
    )
    .unwrap();
    fs::write(
        root.join("lib").join("index.js"),
        "module.exports = { lift: function () {} };\n",
    )
    .unwrap();
    root
}
