use std::path::PathBuf;

use thiserror::Error;

/// Failures of host-level operations: loading plugins, reading config and
/// persisting the cache. Faults inside a running plugin never surface here;
/// they are reported to the console and swallowed.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read {}: {source}", path.display())]
    ReadPlugin {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("plugin {name}: parse error: {message}")]
    Parse { name: String, message: String },

    #[error("plugin {name}: {message}")]
    Runtime { name: String, message: String },

    #[error("plugin {0} is already loaded")]
    AlreadyLoaded(String),

    #[error("no plugin named {0}")]
    UnknownPlugin(String),

    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("cache: {0}")]
    Cache(#[from] serde_json::Error),
}

pub type Result<T, E = HostError> = std::result::Result<T, E>;
