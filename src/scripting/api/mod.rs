//! The `fm` namespace exposed to plugins
//!
//! Each submodule adds one group of calls:
//! - `keys` - key bindings and event subscriptions
//! - `editor` - the open text buffer
//! - `ui` - notifications, status line, console
//! - `cache` - persistent key-value store
//! - `context` - file browser snapshot and plugin identity

mod cache;
mod context;
mod editor;
mod keys;
mod ui;

use rhai::{EvalAltResult, Module};

use crate::plugins::shared::Shared;
use crate::plugins::{HostShared, PluginId};
use crate::services::MessageLog;

type FnResult<T> = Result<T, Box<EvalAltResult>>;

/// Host capabilities as seen by one plugin. Every `fm::*` call lands on one
/// method here; the plugin identity is fixed at construction.
#[derive(Clone)]
pub struct FmApi {
    plugin: PluginId,
    name: String,
    shared: HostShared,
}

impl FmApi {
    pub fn new(plugin: PluginId, name: &str, shared: HostShared) -> Self {
        Self {
            plugin,
            name: name.to_string(),
            shared,
        }
    }

    pub fn plugin_id(&self) -> PluginId {
        self.plugin
    }

    pub fn plugin_name(&self) -> &str {
        &self.name
    }

    pub fn messages(&self) -> Shared<MessageLog> {
        self.shared.messages.clone()
    }

    /// Build the `fm` module with every call bound to this plugin
    pub fn create_module(&self) -> Module {
        let mut module = Module::new();
        keys::register(&mut module, self);
        editor::register(&mut module, self);
        ui::register(&mut module, self);
        cache::register(&mut module, self);
        context::register(&mut module, self);
        module
    }
}

/// Script-facing `usize`
fn to_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
