//! fm::bind, fm::bind_editor, fm::unbind, fm::on, fm::key_valid
//!
//! ```rhai
//! fm::bind("^K", "kill_line");
//! fm::bind_editor("F5", "reload");
//! fm::on("editor_save", "after_save");
//! ```

use rhai::Module;
use tracing::debug;

use super::{FmApi, FnResult};
use crate::input::{BindingScope, KeySpec};
use crate::plugins::shared;
use crate::plugins::subscriptions::EventKind;

impl FmApi {
    pub fn bind(&self, key: &str, handler: &str, scope: BindingScope) -> bool {
        let spec = match key.parse::<KeySpec>() {
            Ok(spec) => spec,
            Err(e) => {
                debug!(plugin = %self.name, key, error = %e, "bind rejected");
                return false;
            }
        };
        if handler.is_empty() {
            debug!(plugin = %self.name, key, "bind without a handler");
            return false;
        }
        shared::write(&self.shared.keys).bind(self.plugin, scope, spec, handler);
        true
    }

    pub fn unbind(&self, key: &str) -> bool {
        match key.parse::<KeySpec>() {
            Ok(spec) => shared::write(&self.shared.keys).unbind(self.plugin, spec),
            Err(_) => false,
        }
    }

    pub fn on(&self, event: &str, handler: &str) -> bool {
        let Some(kind) = EventKind::from_name(event) else {
            debug!(plugin = %self.name, event, "unknown event");
            return false;
        };
        if handler.is_empty() {
            return false;
        }
        shared::write(&self.shared.subscriptions).subscribe(kind, self.plugin, handler);
        true
    }

    pub fn key_valid(&self, key: &str) -> bool {
        key.parse::<KeySpec>().is_ok()
    }
}

pub(super) fn register(module: &mut Module, api: &FmApi) {
    {
        let api = api.clone();
        module.set_native_fn("bind", move |key: &str, handler: &str| -> FnResult<bool> {
            Ok(api.bind(key, handler, BindingScope::Global))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("bind_editor", move |key: &str, handler: &str| -> FnResult<bool> {
            Ok(api.bind(key, handler, BindingScope::Editor))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("unbind", move |key: &str| -> FnResult<bool> { Ok(api.unbind(key)) });
    }

    {
        let api = api.clone();
        module.set_native_fn("on", move |event: &str, handler: &str| -> FnResult<bool> {
            Ok(api.on(event, handler))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("key_valid", move |key: &str| -> FnResult<bool> {
            Ok(api.key_valid(key))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{HostShared, PluginId};
    use crate::services::MemoryCache;

    fn api() -> FmApi {
        FmApi::new(PluginId(3), "keys", HostShared::new(Box::new(MemoryCache::new())))
    }

    #[test]
    fn bind_validates_key_and_handler() {
        let api = api();
        assert!(api.bind("^k", "kill", BindingScope::Global));
        assert!(!api.bind("^1", "kill", BindingScope::Global));
        assert!(!api.bind("F5", "", BindingScope::Global));
        let keys = shared::read(&api.shared.keys);
        assert!(keys.is_bound(KeySpec::Ctrl('K')));
        assert!(!keys.is_bound(KeySpec::Function(5)));
    }

    #[test]
    fn unbind_only_touches_own_bindings() {
        let api = api();
        let other = FmApi::new(PluginId(4), "other", api.shared.clone());
        other.bind("x", "h", BindingScope::Global);
        assert!(!api.unbind("x"));
        assert!(other.unbind("x"));
    }

    #[test]
    fn on_rejects_unknown_events() {
        let api = api();
        assert!(api.on("editor_save", "saved"));
        assert!(!api.on("editor_saved", "saved"));
        assert!(shared::read(&api.shared.subscriptions).is_subscribed(EventKind::EditorSave, PluginId(3)));
    }
}
