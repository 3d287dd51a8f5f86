//! fm::cache_get, fm::cache_set
//!
//! Values are stored as JSON, so maps, arrays, strings, numbers and bools
//! survive a restart. Setting `()` removes the key.

use rhai::{Dynamic, Module};
use serde_json::Value;
use tracing::{debug, warn};

use super::{FmApi, FnResult};
use crate::plugins::shared;

impl FmApi {
    pub fn cache_get(&self, key: &str) -> Option<Value> {
        shared::read(&self.shared.cache).get(key)
    }

    pub fn cache_set(&self, key: &str, value: Option<Value>) -> bool {
        if key.is_empty() {
            return false;
        }
        match shared::write(&self.shared.cache).set(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(plugin = %self.name, key, error = %e, "cache write failed");
                false
            }
        }
    }
}

pub(super) fn register(module: &mut Module, api: &FmApi) {
    {
        let api = api.clone();
        module.set_native_fn("cache_get", move |key: &str| -> FnResult<Dynamic> {
            match api.cache_get(key) {
                Some(value) => rhai::serde::to_dynamic(value),
                None => Ok(Dynamic::UNIT),
            }
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("cache_set", move |key: &str, value: Dynamic| -> FnResult<bool> {
            if value.is_unit() {
                return Ok(api.cache_set(key, None));
            }
            match rhai::serde::from_dynamic::<Value>(&value) {
                Ok(json) => Ok(api.cache_set(key, Some(json))),
                Err(e) => {
                    debug!(key, error = %e, "value cannot be cached");
                    Ok(false)
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{HostShared, PluginId};
    use crate::scripting::{ScriptLimits, create_engine};
    use crate::services::MemoryCache;
    use serde_json::json;

    fn setup() -> (rhai::Engine, FmApi) {
        let shared = HostShared::new(Box::new(MemoryCache::new()));
        let api = FmApi::new(PluginId(1), "cache", shared);
        (create_engine(&api, ScriptLimits::default()), api)
    }

    #[test]
    fn structured_values_round_trip() {
        let (engine, api) = setup();
        let ok: bool = engine
            .eval(r#"fm::cache_set("recent", #{ files: ["a", "b"], n: 2 })"#)
            .unwrap();
        assert!(ok);
        assert_eq!(api.cache_get("recent"), Some(json!({"files": ["a", "b"], "n": 2})));

        let n: i64 = engine.eval(r#"fm::cache_get("recent").n"#).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn unit_deletes_and_missing_is_unit() {
        let (engine, api) = setup();
        engine.run(r#"fm::cache_set("k", "v"); fm::cache_set("k", ());"#).unwrap();
        assert_eq!(api.cache_get("k"), None);
        let missing: Dynamic = engine.eval(r#"fm::cache_get("k")"#).unwrap();
        assert!(missing.is_unit());
    }

    #[test]
    fn empty_key_is_rejected() {
        let (engine, _) = setup();
        let ok: bool = engine.eval(r#"fm::cache_set("", 1)"#).unwrap();
        assert!(!ok);
    }
}
