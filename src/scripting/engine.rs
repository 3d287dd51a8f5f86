//! Construction of the per-plugin Rhai engine
//!
//! Every plugin gets its own engine with:
//! - the `fm` namespace bound to that plugin's identity
//! - operation and nesting limits so a runaway script stops instead of
//!   hanging the host
//! - `print`/`debug` routed to the console

use rhai::Engine;
use tracing::debug;

use super::api::FmApi;
use crate::plugins::shared;

/// Resource limits applied to every plugin engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLimits {
    pub max_operations: u64,
    pub max_expr_depth: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_operations: 100_000,
            max_expr_depth: 64,
        }
    }
}

/// Create the Rhai engine for one plugin
pub fn create_engine(api: &FmApi, limits: ScriptLimits) -> Engine {
    let mut engine = Engine::new();

    engine.set_max_expr_depths(limits.max_expr_depth, limits.max_expr_depth);
    engine.set_max_operations(limits.max_operations);

    engine.register_static_module("fm", api.create_module().into());

    {
        let messages = api.messages();
        let plugin = api.plugin_name().to_string();
        engine.on_print(move |text| {
            debug!(plugin = %plugin, "print: {text}");
            shared::write(&messages).console(text);
        });
    }

    {
        let messages = api.messages();
        let plugin = api.plugin_name().to_string();
        engine.on_debug(move |text, _source, pos| {
            debug!(plugin = %plugin, %pos, "debug: {text}");
            shared::write(&messages).console(format!("[{plugin}] {text}"));
        });
    }

    engine
}
