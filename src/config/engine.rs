use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use rhai::{Engine, Scope};
use tracing::{debug, info};

use super::Settings;
use crate::error::HostError;
use crate::plugins::shared;

/// The Rhai scripting engine for configuration
pub struct ConfigEngine {
    engine: Engine,
    settings: Arc<RwLock<Settings>>,
}

impl ConfigEngine {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Start from `settings` instead of the defaults
    pub fn with_settings(settings: Settings) -> Self {
        let settings = Arc::new(RwLock::new(settings));
        let engine = Self::create_engine(Arc::clone(&settings));
        Self { engine, settings }
    }

    fn create_engine(settings: Arc<RwLock<Settings>>) -> Engine {
        let mut engine = Engine::new();

        // Limit script execution for safety
        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(100_000);

        {
            let s = Arc::clone(&settings);
            engine.register_fn("add_plugin_dir", move |dir: &str| {
                shared::write(&s).plugin_dirs.push(expand_home(dir));
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_load_local_plugins", move |enabled: bool| {
                shared::write(&s).load_local_plugins = enabled;
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_max_operations", move |ops: i64| {
                shared::write(&s).max_operations = ops.max(1_000) as u64;
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_max_expr_depth", move |depth: i64| {
                shared::write(&s).max_expr_depth = depth.clamp(8, 1024) as usize;
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_max_event_cascade", move |limit: i64| {
                shared::write(&s).max_event_cascade = limit.max(1) as usize;
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_cache_file", move |path: &str| {
                shared::write(&s).cache_file = if path.is_empty() {
                    None
                } else {
                    Some(expand_home(path))
                };
            });
        }

        {
            let s = Arc::clone(&settings);
            engine.register_fn("set_default_actions", move |enabled: bool| {
                shared::write(&s).default_actions = enabled;
            });
        }

        engine.on_print(|msg| debug!(target: "burrow::config", "{msg}"));

        engine
    }

    /// Load and execute a config file
    pub fn load_file(&mut self, path: &Path) -> Result<(), HostError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HostError::Config(format!("failed to read {}: {e}", path.display())))?;
        self.eval(&content)?;
        info!(path = %path.display(), "config loaded");
        Ok(())
    }

    /// Evaluate a Rhai script string
    pub fn eval(&mut self, script: &str) -> Result<(), HostError> {
        let ast = self
            .engine
            .compile(script)
            .map_err(|e| HostError::Config(format!("parse error: {e}")))?;

        let mut scope = Scope::new();
        self.engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| HostError::Config(e.to_string()))
    }

    /// Get the current settings (cloned)
    pub fn settings(&self) -> Settings {
        shared::read(&self.settings).clone()
    }

    /// Load the default config file if it exists
    pub fn load_default(&mut self) -> Result<(), HostError> {
        match Settings::config_file() {
            Some(config_file) if config_file.exists() => self.load_file(&config_file),
            _ => Ok(()), // No config file is fine
        }
    }
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
