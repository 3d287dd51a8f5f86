//! fm::cwd, fm::selected_name, fm::selected_path, fm::cursor, fm::count,
//! fm::search_active, fm::search_query, fm::plugin_name

use rhai::{Dynamic, Module};

use super::{FmApi, FnResult, to_int};
use crate::plugins::shared;
use crate::services::BrowserContext;

impl FmApi {
    fn context(&self) -> BrowserContext {
        shared::read(&self.shared.context).clone()
    }

    pub fn cwd(&self) -> String {
        self.context().cwd.to_string_lossy().into_owned()
    }

    pub fn selected_name(&self) -> Option<String> {
        self.context().selected_name
    }

    pub fn selected_path(&self) -> Option<String> {
        self.context()
            .selected_path()
            .map(|p| p.to_string_lossy().into_owned())
    }
}

pub(super) fn register(module: &mut Module, api: &FmApi) {
    {
        let api = api.clone();
        module.set_native_fn("cwd", move || -> FnResult<String> { Ok(api.cwd()) });
    }

    {
        let api = api.clone();
        module.set_native_fn("selected_name", move || -> FnResult<Dynamic> {
            Ok(api.selected_name().map_or(Dynamic::UNIT, Dynamic::from))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("selected_path", move || -> FnResult<Dynamic> {
            Ok(api.selected_path().map_or(Dynamic::UNIT, Dynamic::from))
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("cursor", move || -> FnResult<i64> { Ok(to_int(api.context().cursor)) });
    }

    {
        let api = api.clone();
        module.set_native_fn("count", move || -> FnResult<i64> { Ok(to_int(api.context().count)) });
    }

    {
        let api = api.clone();
        module.set_native_fn("search_active", move || -> FnResult<bool> {
            Ok(api.context().search_active)
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("search_query", move || -> FnResult<String> {
            Ok(api.context().search_query)
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("plugin_name", move || -> FnResult<String> {
            Ok(api.plugin_name().to_string())
        });
    }
}
