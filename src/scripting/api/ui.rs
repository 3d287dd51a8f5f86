//! fm::notify, fm::status, fm::console_print, fm::console, fm::exit

use std::sync::atomic::Ordering;

use rhai::Module;
use tracing::info;

use super::{FmApi, FnResult};
use crate::plugins::shared;

impl FmApi {
    pub fn notify(&self, text: &str) {
        shared::write(&self.shared.messages).notify(text);
    }

    pub fn status(&self, text: &str) {
        shared::write(&self.shared.messages).status(text);
    }

    pub fn console_print(&self, text: &str) {
        shared::write(&self.shared.messages).console(text);
    }

    /// Ask the host to quit. Key dispatch stops after the current handler.
    pub fn exit(&self) {
        info!(plugin = %self.name, "quit requested");
        self.shared.quit.store(true, Ordering::SeqCst);
    }
}

pub(super) fn register(module: &mut Module, api: &FmApi) {
    {
        let api = api.clone();
        module.set_native_fn("notify", move |text: &str| -> FnResult<()> {
            api.notify(text);
            Ok(())
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("status", move |text: &str| -> FnResult<()> {
            api.status(text);
            Ok(())
        });
    }

    // console is an alias kept for older plugins
    for name in ["console_print", "console"] {
        let api = api.clone();
        module.set_native_fn(name, move |text: &str| -> FnResult<()> {
            api.console_print(text);
            Ok(())
        });
    }

    {
        let api = api.clone();
        module.set_native_fn("exit", move || -> FnResult<()> {
            api.exit();
            Ok(())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{HostShared, PluginId};
    use crate::scripting::{ScriptLimits, create_engine};
    use crate::services::{Level, MemoryCache};

    #[test]
    fn messages_land_in_the_log() {
        let shared = HostShared::new(Box::new(MemoryCache::new()));
        let api = FmApi::new(PluginId(1), "ui", shared.clone());
        let engine = create_engine(&api, ScriptLimits::default());
        engine
            .run(r#"fm::notify("n"); fm::status("s"); fm::console("c1"); fm::console_print("c2");"#)
            .unwrap();

        let log = shared::read(&shared.messages);
        let levels: Vec<Level> = log.entries().map(|m| m.level).collect();
        assert_eq!(
            levels,
            vec![Level::Notify, Level::Status, Level::Console, Level::Console]
        );
        assert_eq!(log.status_line(), Some("s"));
    }

    #[test]
    fn exit_raises_the_quit_flag() {
        let shared = HostShared::new(Box::new(MemoryCache::new()));
        let api = FmApi::new(PluginId(1), "quitter", shared.clone());
        let engine = create_engine(&api, ScriptLimits::default());
        assert!(!shared.quit.load(Ordering::SeqCst));
        engine.run("fm::exit();").unwrap();
        assert!(shared.quit.load(Ordering::SeqCst));
    }
}
