//! burrow - plugin host runtime for a terminal file manager with an
//! integrated text editor.
//!
//! Plugins are Rhai scripts. Each one gets its own engine, a private state
//! object and the `fm` namespace of host calls; the host routes key presses
//! and editor lifecycle events to them.

pub mod config;
pub mod editor;
pub mod error;
pub mod input;
pub mod logging;
pub mod plugins;
pub mod scripting;
pub mod services;

pub use config::{ConfigEngine, Settings};
pub use error::HostError;
pub use plugins::{HostEvent, KeyOutcome, PluginHost};
