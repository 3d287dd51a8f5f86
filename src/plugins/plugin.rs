use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use rhai::{AST, CallFnOptions, Dynamic, Engine, Map, Scope};

use super::PluginId;
use crate::error::HostError;
use crate::scripting::{FmApi, ScriptLimits, create_engine};

/// One loaded script: its engine, compiled code and private state.
///
/// The state map is bound as `this` in every call, so it is the only place
/// a plugin can keep data between callbacks.
pub struct Plugin {
    id: PluginId,
    name: String,
    path: Option<PathBuf>,
    source: String,
    engine: Engine,
    ast: AST,
    scope: Scope<'static>,
    state: Dynamic,
}

impl Plugin {
    /// Build the engine and compile `source`. Nothing runs yet.
    pub fn compile(
        api: &FmApi,
        path: Option<PathBuf>,
        source: String,
        limits: ScriptLimits,
    ) -> Result<Self, HostError> {
        let engine = create_engine(api, limits);
        let ast = engine.compile(&source).map_err(|e| HostError::Parse {
            name: api.plugin_name().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            id: api.plugin_id(),
            name: api.plugin_name().to_string(),
            path,
            source,
            engine,
            ast,
            scope: Scope::new(),
            state: Dynamic::from_map(Map::new()),
        })
    }

    pub fn id(&self) -> PluginId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn state(&self) -> &Dynamic {
        &self.state
    }

    /// Whether the script defines `name` taking `arity` parameters
    pub fn defines(&self, name: &str, arity: usize) -> bool {
        self.ast
            .iter_functions()
            .any(|f| f.name == name && f.params.len() == arity)
    }

    pub fn defines_any(&self, name: &str) -> bool {
        self.ast.iter_functions().any(|f| f.name == name)
    }

    /// Evaluate the script's top-level statements once
    pub fn run_top_level(&mut self) -> Result<(), HostError> {
        let engine = &self.engine;
        let scope = &mut self.scope;
        let ast = &self.ast;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| engine.run_ast_with_scope(scope, ast)));
        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(self.runtime_error(e.to_string())),
            Err(payload) => Err(self.runtime_error(panic_message(payload))),
        }
    }

    /// Call a script function with `this` bound to the plugin state.
    ///
    /// A handler declared without parameters is still called when the host
    /// has arguments to pass; the arguments are dropped.
    pub fn call(&mut self, handler: &str, args: Vec<Dynamic>) -> Result<Dynamic, HostError> {
        let args = if !args.is_empty() && !self.defines(handler, args.len()) && self.defines(handler, 0) {
            Vec::new()
        } else {
            args
        };

        let options = CallFnOptions::new()
            .eval_ast(false)
            .rewind_scope(true)
            .bind_this_ptr(&mut self.state);
        let engine = &self.engine;
        let scope = &mut self.scope;
        let ast = &self.ast;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            engine.call_fn_with_options::<Dynamic>(options, scope, ast, handler, args)
        }));
        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(self.runtime_error(e.to_string())),
            Err(payload) => Err(self.runtime_error(panic_message(payload))),
        }
    }

    fn runtime_error(&self, message: String) -> HostError {
        HostError::Runtime {
            name: self.name.clone(),
            message,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("host panic: {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::HostShared;
    use crate::services::MemoryCache;

    fn plugin(source: &str) -> Plugin {
        let shared = HostShared::new(Box::new(MemoryCache::new()));
        let api = FmApi::new(PluginId(1), "probe", shared);
        Plugin::compile(&api, None, source.to_string(), ScriptLimits::default()).unwrap()
    }

    #[test]
    fn parse_errors_name_the_plugin() {
        let shared = HostShared::new(Box::new(MemoryCache::new()));
        let api = FmApi::new(PluginId(1), "broken", shared);
        let err = Plugin::compile(&api, None, "fn oops( {".to_string(), ScriptLimits::default())
            .err()
            .unwrap();
        assert!(matches!(err, HostError::Parse { ref name, .. } if name == "broken"));
    }

    #[test]
    fn state_persists_between_calls() {
        let mut p = plugin(
            r#"
            fn bump() {
                if type_of(this.n) == "()" { this.n = 0; }
                this.n += 1;
                this.n
            }
            "#,
        );
        p.run_top_level().unwrap();
        p.call("bump", vec![]).unwrap();
        let n = p.call("bump", vec![]).unwrap();
        assert_eq!(n.as_int().unwrap(), 2);
        let state = p.state().clone().cast::<Map>();
        assert_eq!(state["n"].as_int().unwrap(), 2);
    }

    #[test]
    fn top_level_does_not_rerun_on_call() {
        let shared = HostShared::new(Box::new(MemoryCache::new()));
        let api = FmApi::new(PluginId(1), "once", shared.clone());
        let source = r#"
            fm::console("top");
            fn noop() { 1 }
        "#;
        let mut p = Plugin::compile(&api, None, source.to_string(), ScriptLimits::default()).unwrap();
        p.run_top_level().unwrap();
        p.call("noop", vec![]).unwrap();
        p.call("noop", vec![]).unwrap();
        let log = crate::plugins::shared::read(&shared.messages);
        assert_eq!(log.entries().filter(|m| m.text == "top").count(), 1);
    }

    #[test]
    fn errors_and_arity_fallback() {
        let mut p = plugin(
            r#"
            fn no_args() { true }
            fn fails(key) { throw "bad key " + key; }
            "#,
        );
        p.run_top_level().unwrap();
        assert!(p.defines("fails", 1));
        assert!(!p.defines("fails", 0));

        let ok = p.call("no_args", vec!["^K".into()]).unwrap();
        assert_eq!(ok.as_bool(), Ok(true));

        let err = p.call("fails", vec!["^K".into()]).unwrap_err();
        assert!(err.to_string().starts_with("plugin probe:"));
        assert!(p.call("missing", vec![]).is_err());
    }
}
