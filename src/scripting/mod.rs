//! Scripting module - Rhai runtime for plugins
//!
//! All host functions are exposed under the `fm` namespace:
//! - `fm::bind`, `fm::on` - keys and lifecycle subscriptions
//! - `fm::editor_*` - the open text buffer
//! - `fm::notify`, `fm::console` - messages
//! - `fm::cache_*` - persistent storage
//! - `fm::cwd`, `fm::selected_*` - file browser snapshot

mod api;
mod engine;

pub use api::FmApi;
pub use engine::{ScriptLimits, create_engine};
