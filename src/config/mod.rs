mod engine;
mod settings;

pub use engine::ConfigEngine;
pub use settings::{LOCAL_PLUGINS_ENV, Settings};
