//! Persistent key-value storage shared by all plugins.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;

const CACHE_VERSION: u32 = 1;

pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`; `None` removes the key
    fn set(&mut self, key: &str, value: Option<Value>) -> Result<()>;
}

/// In-process store, used when no cache file is configured
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: BTreeMap<String, Value>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Option<Value>) -> Result<()> {
        match value {
            Some(v) => self.entries.insert(key.to_string(), v),
            None => self.entries.remove(key),
        };
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, Value>,
}

/// JSON file store, rewritten on every change
#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonFileCache {
    /// Open the store at `path`; a missing file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => {
                let file: CacheFile = serde_json::from_str(&content)?;
                if file.version != CACHE_VERSION {
                    debug!(version = file.version, "discarding cache with unknown version");
                    BTreeMap::new()
                } else {
                    file.entries
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to a temp file, then rename over the target
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = CacheFile {
            version: CACHE_VERSION,
            entries: self.entries.clone(),
        };
        let content = serde_json::to_vec_pretty(&file)?;
        let temp_path = self.path.with_extension("tmp");
        let mut out = File::create(&temp_path)?;
        out.write_all(&content)?;
        drop(out);
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl CacheStore for JsonFileCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Option<Value>) -> Result<()> {
        match value {
            Some(v) => self.entries.insert(key.to_string(), v),
            None => self.entries.remove(key),
        };
        self.persist()
    }
}
