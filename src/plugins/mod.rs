//! Plugin host: loading scripts, running them behind a fault boundary and
//! routing key presses and lifecycle events to them.

mod dispatch;
mod event;
mod host;
mod loader;
mod plugin;
pub mod shared;
pub mod subscriptions;

pub use dispatch::KeyOutcome;
pub use event::HostEvent;
pub use host::PluginHost;
pub use plugin::Plugin;
pub use shared::HostShared;
pub use subscriptions::EventKind;

/// Identity of one load of a plugin; a reload gets a new id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginId(pub u64);
