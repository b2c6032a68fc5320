//! @acp:module "Terminal"
//! @acp:summary "User-facing log sink with Sails log levels"
//! @acp:domain cli
//! @acp:layer io
//!
//! Everything a command tells the user goes through a [`Terminal`]. Internal
//! diagnostics use `tracing` instead (see [`crate::logging`]).

use std::io::Write;
use std::sync::{Arc, Mutex};

use console::style;

use crate::config::LogLevel;

/// A line written to the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub level: LogLevel,
    pub text: String,
}

#[derive(Debug, Clone)]
enum Sink {
    Stderr,
    Memory(Arc<Mutex<Vec<Line>>>),
}

/// Level-filtered output for command handlers
#[derive(Debug, Clone)]
pub struct Terminal {
    level: LogLevel,
    sink: Sink,
}

impl Terminal {
    /// Terminal writing to stderr
    pub fn stderr(level: LogLevel) -> Self {
        Self {
            level,
            sink: Sink::Stderr,
        }
    }

    /// Terminal recording lines in memory; clones share the buffer
    pub fn capture(level: LogLevel) -> Self {
        Self {
            level,
            sink: Sink::Memory(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Lines recorded so far (empty for stderr terminals)
    pub fn lines(&self) -> Vec<Line> {
        match &self.sink {
            Sink::Memory(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            Sink::Stderr => Vec::new(),
        }
    }

    /// Recorded text, one entry per line
    pub fn text(&self) -> Vec<String> {
        self.lines().into_iter().map(|line| line.text).collect()
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.write(LogLevel::Error, msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.write(LogLevel::Info, msg.as_ref());
    }

    pub fn debug(&self, msg: impl AsRef<str>) {
        self.write(LogLevel::Debug, msg.as_ref());
    }

    pub fn verbose(&self, msg: impl AsRef<str>) {
        self.write(LogLevel::Verbose, msg.as_ref());
    }

    /// Empty spacer line (shown unless the terminal is silent)
    pub fn blank(&self) {
        self.write(LogLevel::Error, "");
    }

    fn write(&self, level: LogLevel, text: &str) {
        if !self.level.allows(level) {
            return;
        }
        match &self.sink {
            Sink::Stderr => {
                let mut stderr = std::io::stderr().lock();
                let _ = if text.is_empty() {
                    writeln!(stderr)
                } else {
                    writeln!(stderr, "{} {}", prefix(level), text)
                };
            }
            Sink::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(Line {
                        level,
                        text: text.to_string(),
                    });
                }
            }
        }
    }
}

fn prefix(level: LogLevel) -> console::StyledObject<String> {
    let label = format!("{}:", level);
    match level {
        LogLevel::Error => style(label).red(),
        LogLevel::Warn => style(label).yellow(),
        LogLevel::Info => style(label).green(),
        LogLevel::Debug => style(label).blue(),
        _ => style(label).dim(),
    }
}
