use std::path::{Path, PathBuf};

use rhai::Dynamic;
use tracing::{info, warn};

use super::event::HostEvent;
use super::plugin::Plugin;
use super::shared::{self, HostShared, Shared};
use super::subscriptions::EventKind;
use super::{PluginId, loader};
use crate::config::Settings;
use crate::editor::Editor;
use crate::error::HostError;
use crate::scripting::FmApi;
use crate::services::{BrowserContext, CacheStore, JsonFileCache, MemoryCache, Message, MessageLog};

/// Owns every loaded plugin and the state they share.
///
/// Plugins are kept in load order; that order decides who sees a key press
/// or lifecycle event first.
pub struct PluginHost {
    pub(super) settings: Settings,
    pub(super) shared: HostShared,
    pub(super) plugins: Vec<Plugin>,
    next_id: u64,
    context_initialized: bool,
}

impl PluginHost {
    /// Create a host using the cache file named in `settings`. A cache that
    /// cannot be opened is replaced by an in-memory one.
    pub fn new(settings: Settings) -> Self {
        let cache: Box<dyn CacheStore> = match &settings.cache_file {
            Some(path) => match JsonFileCache::open(path) {
                Ok(cache) => Box::new(cache),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cache unavailable, using memory");
                    Box::new(MemoryCache::new())
                }
            },
            None => Box::new(MemoryCache::new()),
        };
        Self::with_cache(settings, cache)
    }

    pub fn with_cache(settings: Settings, cache: Box<dyn CacheStore>) -> Self {
        Self {
            settings,
            shared: HostShared::new(cache),
            plugins: Vec::new(),
            next_id: 1,
            context_initialized: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // Loading

    /// Load every plugin from the configured search path. Missing
    /// directories are skipped; failures are reported and returned.
    pub fn load_configured(&mut self) -> Vec<HostError> {
        let mut errors = Vec::new();
        for dir in self.settings.plugin_search_path() {
            if !dir.is_dir() {
                continue;
            }
            match self.load_dir(&dir) {
                Ok(failed) => errors.extend(failed),
                Err(e) => errors.push(e),
            }
        }
        errors
    }

    /// Load all `*.rhai` files in `dir` in name order. One bad plugin does
    /// not stop the others; its error is reported and returned.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<HostError>, HostError> {
        let mut errors = Vec::new();
        for path in loader::discover(dir)? {
            if let Err(e) = self.load_file(&path) {
                errors.push(e);
            }
        }
        Ok(errors)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<PluginId, HostError> {
        let name = loader::plugin_name(path);
        let result = read_plugin(path).and_then(|source| self.load(&name, Some(path.to_path_buf()), source));
        if let Err(e) = &result {
            self.report_load_failure(&name, e);
        }
        result
    }

    pub fn load_source(&mut self, name: &str, source: &str) -> Result<PluginId, HostError> {
        let result = self.load(name, None, source.to_string());
        if let Err(e) = &result {
            self.report_load_failure(name, e);
        }
        result
    }

    fn load(&mut self, name: &str, path: Option<PathBuf>, source: String) -> Result<PluginId, HostError> {
        if self.position_of(name).is_some() {
            return Err(HostError::AlreadyLoaded(name.to_string()));
        }
        let plugin = self.compile(name, path, source)?;
        self.install(plugin, None)
    }

    /// Build a plugin under a fresh id. Nothing is registered yet.
    fn compile(&mut self, name: &str, path: Option<PathBuf>, source: String) -> Result<Plugin, HostError> {
        let id = PluginId(self.next_id);
        self.next_id += 1;
        let api = FmApi::new(id, name, self.shared.clone());
        Plugin::compile(&api, path, source, self.settings.limits())
    }

    /// Register and start a compiled plugin. With `replacing`, the plugin at
    /// that index is swapped out only after the top-level run succeeded;
    /// otherwise the new plugin is appended. Nothing of the new plugin stays
    /// registered if its top-level run fails.
    fn install(&mut self, mut plugin: Plugin, replacing: Option<usize>) -> Result<PluginId, HostError> {
        let id = plugin.id();
        {
            let mut subs = shared::write(&self.shared.subscriptions);
            for kind in EventKind::ALL {
                if plugin.defines_any(kind.callback_name()) {
                    subs.subscribe(kind, id, kind.callback_name());
                }
            }
        }

        if let Err(e) = plugin.run_top_level() {
            self.forget(id);
            self.flush_events();
            return Err(e);
        }

        let position = match replacing {
            Some(index) if index < self.plugins.len() => {
                let old = self.plugins.remove(index);
                self.forget(old.id());
                index
            }
            _ => self.plugins.len(),
        };
        let name = plugin.name().to_string();
        self.plugins.insert(position, plugin);
        info!(plugin = %name, id = id.0, "plugin loaded");
        shared::write(&self.shared.messages).notify(format!("Loaded plugin: {name}"));

        if let Some(plugin) = self.plugins.get_mut(position) {
            if plugin.defines("on_load", 0) {
                if let Err(e) = plugin.call("on_load", Vec::new()) {
                    let text = format!("Plugin on_load failed: {e}");
                    shared::write(&self.shared.messages).error(text);
                }
            }
        }

        self.flush_events();
        Ok(id)
    }

    fn report_load_failure(&self, name: &str, error: &HostError) {
        warn!(plugin = name, error = %error, "plugin load failed");
        shared::write(&self.shared.messages).error(format!("Plugin load failed: {name}: {error}"));
    }

    /// Drop every binding and subscription owned by `id`
    fn forget(&self, id: PluginId) {
        shared::write(&self.shared.keys).remove_plugin(id);
        shared::write(&self.shared.subscriptions).remove_plugin(id);
    }

    pub fn unload(&mut self, name: &str) -> Result<(), HostError> {
        let index = self
            .position_of(name)
            .ok_or_else(|| HostError::UnknownPlugin(name.to_string()))?;
        let plugin = self.plugins.remove(index);
        self.forget(plugin.id());
        info!(plugin = name, "plugin unloaded");
        Ok(())
    }

    /// Load a plugin again with fresh state, keeping the load position.
    /// File-backed plugins are re-read from disk. The running version stays
    /// in place when the new one cannot be read, compiled or started.
    pub fn reload(&mut self, name: &str) -> Result<PluginId, HostError> {
        let index = self
            .position_of(name)
            .ok_or_else(|| HostError::UnknownPlugin(name.to_string()))?;
        let result = self.replace_at(index, name);
        if let Err(e) = &result {
            self.report_load_failure(name, e);
        }
        result
    }

    fn replace_at(&mut self, index: usize, name: &str) -> Result<PluginId, HostError> {
        let path = self.plugins[index].path().map(Path::to_path_buf);
        let source = match &path {
            Some(path) => read_plugin(path)?,
            None => self.plugins[index].source().to_string(),
        };
        let plugin = self.compile(name, path, source)?;
        self.install(plugin, Some(index))
    }

    // Queries

    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.position_of(name).is_some()
    }

    /// Snapshot of a plugin's `this` object
    pub fn plugin_state(&self, name: &str) -> Option<Dynamic> {
        self.position_of(name).map(|i| self.plugins[i].state().clone())
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.plugins.iter().position(|p| p.name() == name)
    }

    pub(super) fn rank(&self, id: PluginId) -> Option<usize> {
        self.plugins.iter().position(|p| p.id() == id)
    }

    // Editor access for the embedder

    pub fn editor(&self) -> Shared<Editor> {
        self.shared.editor.clone()
    }

    /// Run `f` against the editor, then deliver the lifecycle events it
    /// caused
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Editor) -> R) -> R {
        let result = f(&mut shared::write(&self.shared.editor));
        self.flush_events();
        result
    }

    pub fn open_file(&mut self, path: impl AsRef<Path>) -> bool {
        self.edit(|editor| editor.open(path))
    }

    // File browser context

    /// Replace the browser snapshot. After the first call, a changed
    /// directory or selection fires `dir_change` / `selection_change`.
    pub fn set_browser_context(&mut self, context: BrowserContext) {
        let old = std::mem::replace(&mut *shared::write(&self.shared.context), context.clone());
        if !self.context_initialized {
            self.context_initialized = true;
            return;
        }
        if old.cwd != context.cwd {
            self.dispatch(HostEvent::DirChange {
                new: context.cwd.clone(),
                old: old.cwd.clone(),
            });
        }
        if old.selected_name != context.selected_name {
            self.dispatch(HostEvent::SelectionChange {
                new: context.selected_name.clone(),
                old: old.selected_name,
            });
        }
    }

    pub fn browser_context(&self) -> BrowserContext {
        shared::read(&self.shared.context).clone()
    }

    // Messages

    pub fn messages(&self) -> Shared<MessageLog> {
        self.shared.messages.clone()
    }

    pub fn take_messages(&self) -> Vec<Message> {
        shared::write(&self.shared.messages).drain()
    }

    pub(super) fn report_fault(&self, error: &HostError) {
        warn!(error = %error, "plugin fault");
        shared::write(&self.shared.messages).error(error.to_string());
    }
}

fn read_plugin(path: &Path) -> Result<String, HostError> {
    std::fs::read_to_string(path).map_err(|source| HostError::ReadPlugin {
        path: path.to_path_buf(),
        source,
    })
}
