//! Tracing subscriber setup for the `protoclass` binary.
//!
//! The filter comes from `PROTOCLASS_LOG`, then `RUST_LOG`. Without either,
//! only warnings are shown, or `info` and above with `--verbose`. Output
//! always goes to stderr so rewritten sources on stdout stay clean.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

fn build_filter(verbose: bool) -> EnvFilter {
    if let Ok(value) = std::env::var("PROTOCLASS_LOG") {
        EnvFilter::builder().parse_lossy(value)
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    }
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init_logging(verbose: bool, format: LogFormat) {
    let filter = build_filter(verbose);

    let result = match format {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
