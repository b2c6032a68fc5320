//! @acp:module "Logging"
//! @acp:summary "tracing subscriber setup for internal diagnostics"
//! @acp:domain cli
//! @acp:layer infrastructure
//!
//! Diagnostics (runtime resolution, bridge traffic) go through `tracing`.
//! The level follows the Sails log level unless `RUST_LOG` is set:
//! ```bash
//! RUST_LOG=sails_cli::runtime=debug sails lift
//! ```

use std::sync::Once;

use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LogLevel;

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Filter directive for a Sails log level.
///
/// Diagnostics are chattier than user output, so they only show up once the
/// user asks for `verbose` or `silly`.
pub fn filter_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Silent | LogLevel::Error | LogLevel::Warn | LogLevel::Info => "warn",
        LogLevel::Debug => "info",
        LogLevel::Verbose => "debug",
        LogLevel::Silly => "trace",
    }
}

/// Initialize logging. Only the first call takes effect.
pub fn init_with_level(level: LogLevel) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if level == LogLevel::Silent {
            EnvFilter::new("off")
        } else {
            EnvFilter::new(filter_directive(level))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_tracks_verbosity() {
        assert_eq!(filter_directive(LogLevel::Info), "warn");
        assert_eq!(filter_directive(LogLevel::Verbose), "debug");
        assert_eq!(filter_directive(LogLevel::Silly), "trace");
    }
}
