//! Structured logging for the probe.
//!
//! The probe itself only emits `tracing` events. Embedders that want
//! them on stderr call [`init_logging`] once; test harnesses may call it
//! repeatedly since a second install is a no-op.
//!
//! Output modes:
//! - Human-readable console lines
//! - JSON lines for machine consumers

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel, LOG_FORMAT_ENV_VAR, LOG_LEVEL_ENV_VAR};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a global subscriber writing to stderr.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mp_probe={}", config.level)));

    let installed = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };
    installed.is_ok()
}

/// Initialize logging from `MP_LOG` / `MP_LOG_FORMAT`.
pub fn init_default_logging() -> bool {
    init_logging(&LogConfig::from_env())
}
