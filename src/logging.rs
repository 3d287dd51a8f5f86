//! Tracing subscriber setup
//!
//! Interactive sessions own the terminal, so they log to a file. Headless
//! runs log to stderr. `RUST_LOG` overrides the default level either way.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn env_filter(default: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

/// Build a subscriber writing plain text to `log_file`
pub fn build_file_subscriber(log_file: File, default: Level) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(default))
}

/// Install the global subscriber logging to `path`
pub fn init_file(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = File::create(path)?;
    build_file_subscriber(log_file, Level::DEBUG).init();
    Ok(())
}

/// Install the global subscriber logging warnings and above to stderr
pub fn init_stderr() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(env_filter(Level::WARN))
        .init();
}
