//! @acp:module "Generator"
//! @acp:summary "Scaffolding engine interface and its node bridge implementation"
//! @acp:domain cli
//! @acp:layer service
//!
//! Templates and file layout belong to the framework's own generators. This
//! module only shapes their options and turns the channel they fire into an
//! [`Outcome`].

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::config::Options;
use crate::outcome::Outcome;
use crate::runtime::bridge::{Bridge, BridgeRequest};
use crate::runtime::{wait_for, RuntimeEvent};

/// Model attribute from a `name:type` token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Attribute {
    pub const DEFAULT_KIND: &'static str = "string";

    /// Parse `name:type`; a missing or empty type means `string`
    pub fn parse(token: &str) -> Self {
        let (name, kind) = match token.split_once(':') {
            Some((name, kind)) if !kind.is_empty() => (name, kind),
            Some((name, _)) => (name, Self::DEFAULT_KIND),
            None => (token, Self::DEFAULT_KIND),
        };
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// Options for `sails new`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppOptions {
    pub app_name: Option<String>,
    pub app_path: PathBuf,
    pub dry: bool,
}

impl NewAppOptions {
    pub fn new(options: &Options, app_name: Option<String>) -> Self {
        Self {
            app_name,
            app_path: options.app_path.clone(),
            dry: options.dry,
        }
    }
}

/// Options for `sails generate`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    pub app_path: PathBuf,
    pub module: String,
    pub id: String,
    #[serde(rename = "globalID")]
    pub global_id: String,
    pub ext: String,
    pub actions: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub dry: bool,
}

impl GenerateOptions {
    pub fn new(options: &Options, module: impl Into<String>, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            app_path: options.app_path.clone(),
            module: module.into(),
            global_id: global_id(&id),
            id,
            ext: ".js".to_string(),
            actions: Vec::new(),
            attributes: Vec::new(),
            dry: options.dry,
        }
    }

    pub fn with_actions(mut self, actions: Vec<String>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Global identity for a module id (`user` becomes `User`)
pub fn global_id(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// What a generator reports on success
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Generated {
    pub module: String,
    #[serde(rename = "globalID")]
    pub global_id: String,
    pub dir_path: String,
    pub filename: String,
    pub actions: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub dry: bool,
}

impl Generated {
    /// Status line logged after a successful generation
    pub fn status(&self) -> String {
        let mut status = String::new();
        status.push_str(if self.dry {
            "That would have generated"
        } else {
            "Generated"
        });
        status.push_str(&format!(" a new {} called `{}`", self.module, self.global_id));
        if !self.actions.is_empty() {
            status.push_str(&format!(" with {} actions:", self.actions.len()));
        } else if !self.attributes.is_empty() {
            status.push_str(&format!(" with {} attributes:", self.attributes.len()));
        } else {
            status.push('.');
        }
        status
    }

    pub fn file_path(&self) -> String {
        format!("{}/{}", self.dir_path, self.filename)
    }
}

/// @acp:summary "The scaffolding engine"
#[async_trait]
pub trait Generator: Send + Sync {
    /// Create a new app; success carries the engine's message
    async fn new_app(&self, options: &NewAppOptions) -> Outcome<String>;

    /// Create one module in an existing app
    async fn generate(&self, options: &GenerateOptions) -> Outcome<Generated>;
}

/// Runs the bundled installation's generators through the node bridge
#[derive(Debug, Clone)]
pub struct BridgeGenerator {
    install: PathBuf,
    node: PathBuf,
}

impl BridgeGenerator {
    pub fn new(install: impl Into<PathBuf>, node: impl Into<PathBuf>) -> Self {
        Self {
            install: install.into(),
            node: node.into(),
        }
    }

    pub fn for_options(options: &Options) -> Self {
        Self::new(&options.runtime_path, &options.node)
    }

    async fn run(&self, request: BridgeRequest) -> Outcome<Value> {
        let (events, mut receiver) = broadcast::channel(16);
        if let Err(err) = Bridge::spawn(&self.node, &self.install, &request, events) {
            return Outcome::error(err);
        }

        let fired = wait_for(&mut receiver, |event| match event {
            RuntimeEvent::Outcome { channel, payload } => Some(from_channel(&channel, payload)),
            RuntimeEvent::Failed { message } => Some(Outcome::Error(message)),
            RuntimeEvent::Exited { code } => Some(Outcome::Error(format!(
                "Generator exited without reporting a result (code {:?})",
                code
            ))),
            _ => None,
        })
        .await;

        fired.unwrap_or_else(Outcome::error)
    }
}

#[async_trait]
impl Generator for BridgeGenerator {
    async fn new_app(&self, options: &NewAppOptions) -> Outcome<String> {
        if options.app_name.as_deref().map_or(true, str::is_empty) {
            return Outcome::MissingAppName;
        }
        let options = match serde_json::to_value(options) {
            Ok(options) => options,
            Err(err) => return Outcome::error(err),
        };
        self.run(BridgeRequest::NewApp { options })
            .await
            .map(describe)
    }

    async fn generate(&self, options: &GenerateOptions) -> Outcome<Generated> {
        let options = match serde_json::to_value(options) {
            Ok(options) => options,
            Err(err) => return Outcome::error(err),
        };
        match self.run(BridgeRequest::Generate { options }).await {
            Outcome::Success(payload) => serde_json::from_value(payload).into(),
            other => other.map(|_| Generated::default()),
        }
    }
}

/// Map a channel fired by a generator onto an outcome
pub fn from_channel(channel: &str, payload: Value) -> Outcome<Value> {
    match channel {
        "success" => Outcome::Success(payload),
        "alreadyExists" => Outcome::AlreadyExists,
        "notSailsApp" => Outcome::NotSailsApp,
        "missingAppName" => Outcome::MissingAppName,
        "error" => Outcome::Error(describe(payload)),
        unknown => Outcome::Error(format!("Generator fired unknown channel `{}`", unknown)),
    }
}

fn describe(payload: Value) -> String {
    match payload {
        Value::String(message) => message,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_parse() {
        assert_eq!(
            Attribute::parse("age:integer"),
            Attribute {
                name: "age".into(),
                kind: "integer".into()
            }
        );
        assert_eq!(Attribute::parse("name").kind, "string");
        assert_eq!(Attribute::parse("name:").kind, "string");
    }

    #[test]
    fn test_global_id() {
        assert_eq!(global_id("user"), "User");
        assert_eq!(global_id(""), "");
    }

    #[test]
    fn test_status_line() {
        let mut generated = Generated {
            module: "controller".into(),
            global_id: "User".into(),
            actions: vec!["index".into(), "find".into()],
            ..Default::default()
        };
        assert_eq!(
            generated.status(),
            "Generated a new controller called `User` with 2 actions:"
        );

        generated.actions.clear();
        generated.dry = true;
        assert_eq!(
            generated.status(),
            "That would have generated a new controller called `User`."
        );
    }

    #[test]
    fn test_channel_mapping() {
        assert_eq!(from_channel("alreadyExists", Value::Null), Outcome::AlreadyExists);
        assert_eq!(
            from_channel("error", json!("disk full")),
            Outcome::Error("disk full".into())
        );
        assert_eq!(
            from_channel("bogus", Value::Null).channel(),
            "error"
        );
    }

    #[test]
    fn test_generated_from_payload() {
        let generated: Generated = serde_json::from_value(json!({
            "module": "model",
            "globalID": "Pet",
            "dirPath": "api/models",
            "filename": "Pet.js",
            "attributes": [{ "name": "age", "type": "integer" }],
            "appPath": "/tmp/app"
        }))
        .unwrap();
        assert_eq!(generated.file_path(), "api/models/Pet.js");
        assert_eq!(generated.attributes[0].kind, "integer");
    }

    #[tokio::test]
    async fn test_new_app_without_name() {
        let generator = BridgeGenerator::new("/nonexistent", "node");
        let options = NewAppOptions {
            app_name: None,
            app_path: PathBuf::from("."),
            dry: false,
        };
        assert_eq!(generator.new_app(&options).await, Outcome::MissingAppName);
    }
}
