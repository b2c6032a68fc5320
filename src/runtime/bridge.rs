//! @acp:module "Node Bridge"
//! @acp:summary "Process bridge to a Sails installation over JSON lines"
//! @acp:domain cli
//! @acp:layer infrastructure
//!
//! Each bridge is one `node` process serving one request. The request goes in
//! through the environment; messages come back on stderr as
//! `@@sails {json}` lines and are republished as [`RuntimeEvent`]s. Other
//! stderr lines are the app's own output and are passed through untouched.
//! A loaded runtime also takes follow-up requests on stdin.

use std::path::Path;
use std::process::Stdio;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, Command};
use tokio::sync::broadcast;

use super::RuntimeEvent;
use crate::error::{Result, SailsError};

/// Script evaluated by `node -e`
pub const BRIDGE_SCRIPT: &str = include_str!("bridge.js");

/// Marks a stderr line as a bridge message
pub const MESSAGE_PREFIX: &str = "@@sails ";

/// Request sent to a bridge process
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum BridgeRequest {
    Load {
        options: Value,
    },
    Lift {
        options: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        shell: Option<String>,
    },
    NewApp {
        options: Value,
    },
    Generate {
        options: Value,
    },
    /// Follow-up for a loaded runtime
    Task {
        name: String,
    },
}

impl BridgeRequest {
    /// Needs the user's terminal on stdin
    fn interactive(&self) -> bool {
        matches!(self, BridgeRequest::Lift { shell: Some(_), .. })
    }

    /// Keeps stdin open for follow-up requests
    fn accepts_follow_ups(&self) -> bool {
        matches!(self, BridgeRequest::Load { .. })
    }
}

/// Decode one stderr line.
///
/// `Ok(None)` means the line is ordinary output.
pub fn decode_line(line: &str) -> Result<Option<RuntimeEvent>> {
    let Some(payload) = line.strip_prefix(MESSAGE_PREFIX) else {
        return Ok(None);
    };
    serde_json::from_str(payload).map(Some).map_err(|e| {
        SailsError::Protocol(format!("undecodable bridge message `{}`: {}", payload, e))
    })
}

/// Handle on a running bridge process
#[derive(Debug)]
pub struct Bridge {
    stdin: Option<ChildStdin>,
}

impl Bridge {
    /// Start `node` against `install` and publish its messages on `events`.
    ///
    /// Subscribe to `events` before calling this or early messages are lost.
    pub fn spawn(
        node: &Path,
        install: &Path,
        request: &BridgeRequest,
        events: broadcast::Sender<RuntimeEvent>,
    ) -> Result<Self> {
        let mut command = Command::new(node);
        command
            .arg("-e")
            .arg(BRIDGE_SCRIPT)
            .env("SAILS_BRIDGE_INSTALL", install)
            .env("SAILS_BRIDGE_REQUEST", serde_json::to_string(request)?)
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if request.interactive() {
            command.stdin(Stdio::inherit());
        } else if request.accepts_follow_ups() {
            command.stdin(Stdio::piped());
        } else {
            command.stdin(Stdio::null());
        }

        tracing::debug!("Spawning bridge for {} ({:?})", install.display(), request);
        let mut child = command.spawn().map_err(|source| SailsError::Spawn {
            node: node.to_path_buf(),
            source,
        })?;

        let stdin = child.stdin.take();
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| SailsError::Protocol("bridge stderr was not captured".to_string()))?;

        tokio::spawn(pump(child, stderr, events));

        Ok(Self { stdin })
    }

    /// Send a follow-up request (loaded runtimes only)
    pub async fn send(&mut self, request: &BridgeRequest) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            SailsError::Protocol("bridge does not accept follow-up requests".to_string())
        })?;

        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        stdin.write_all(line.as_bytes()).await?;
        stdin.flush().await?;
        Ok(())
    }
}

/// Forward stderr until the process closes it, then report the exit code
async fn pump(mut child: Child, stderr: ChildStderr, events: broadcast::Sender<RuntimeEvent>) {
    let mut lines = BufReader::new(stderr).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match decode_line(&line) {
                Ok(Some(event)) => {
                    let _ = events.send(event);
                }
                Ok(None) => eprintln!("{}", line),
                Err(err) => {
                    tracing::warn!("{}", err);
                    let _ = events.send(RuntimeEvent::Failed {
                        message: err.to_string(),
                    });
                }
            },
            Ok(None) => break,
            Err(err) => {
                tracing::warn!("Reading bridge output failed: {}", err);
                break;
            }
        }
    }

    let code = match child.wait().await {
        Ok(status) => status.code(),
        Err(err) => {
            tracing::warn!("Waiting for bridge process failed: {}", err);
            None
        }
    };
    tracing::debug!("Bridge exited with {:?}", code);
    let _ = events.send(RuntimeEvent::Exited { code });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_lines_pass_through() {
        assert_eq!(decode_line("info: Server lifted").unwrap(), None);
        assert_eq!(decode_line("").unwrap(), None);
    }

    #[test]
    fn test_decode_ready() {
        let event = decode_line(r#"@@sails {"event":"ready","version":"0.9.4"}"#).unwrap();
        assert_eq!(
            event,
            Some(RuntimeEvent::Ready {
                version: "0.9.4".into()
            })
        );
    }

    #[test]
    fn test_decode_garbage_is_protocol_error() {
        let err = decode_line("@@sails {not json").unwrap_err();
        assert!(matches!(err, SailsError::Protocol(_)));
    }

    #[test]
    fn test_request_encoding() {
        let request = BridgeRequest::Lift {
            options: json!({ "port": 1337 }),
            shell: Some("sails> ".into()),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "op": "lift", "options": { "port": 1337 }, "shell": "sails> " })
        );

        let request = BridgeRequest::NewApp { options: json!({}) };
        assert_eq!(serde_json::to_value(&request).unwrap()["op"], json!("newApp"));
    }

    #[test]
    fn test_stdin_modes() {
        let shell = BridgeRequest::Lift {
            options: Value::Null,
            shell: Some("sails> ".into()),
        };
        let server = BridgeRequest::Lift {
            options: Value::Null,
            shell: None,
        };
        assert!(shell.interactive());
        assert!(!server.interactive());
        assert!(BridgeRequest::Load { options: Value::Null }.accepts_follow_ups());
    }
}
