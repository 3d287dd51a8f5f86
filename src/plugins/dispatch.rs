//! Delivery of key presses and lifecycle events to plugins.
//!
//! Key presses stop at the first handler that returns `true`. Lifecycle
//! events reach every subscriber. Events caused while handling an event are
//! queued and delivered, oldest first, once the current one is finished.

use std::collections::VecDeque;
use std::sync::atomic::Ordering;

use tracing::{debug, warn};

use super::event::HostEvent;
use super::host::PluginHost;
use super::shared;
use crate::editor::EditorEvent;
use crate::input::{self, KeySpec};

/// What happened to a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A plugin handler returned `true`
    Consumed { plugin: String, handler: String },
    /// No plugin took it; the built-in editing action ran
    Default,
    /// Nobody handled it; the embedder may act on it
    Unhandled,
    /// A plugin called `fm::exit()`; nothing else saw the key
    Quit,
}

impl KeyOutcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, KeyOutcome::Unhandled)
    }
}

impl PluginHost {
    pub fn handle_key(&mut self, key: KeySpec) -> KeyOutcome {
        let outcome = self.route_key(key);
        debug!(%key, ?outcome, "key dispatched");
        self.flush_events();
        outcome
    }

    /// Whether a plugin asked the host to quit
    pub fn quit_requested(&self) -> bool {
        self.shared.quit.load(Ordering::SeqCst)
    }

    /// Clear a pending quit request, returning whether there was one
    pub fn take_quit_request(&mut self) -> bool {
        self.shared.quit.swap(false, Ordering::SeqCst)
    }

    fn route_key(&mut self, key: KeySpec) -> KeyOutcome {
        if self.quit_requested() {
            return KeyOutcome::Quit;
        }
        let key_arg = key.to_string();
        let editor_open = shared::read(&self.shared.editor).is_open();

        let resolved = shared::read(&self.shared.keys).resolve(key, editor_open, |id| self.rank(id));
        for binding in resolved {
            let Some(index) = self.rank(binding.plugin) else {
                continue;
            };
            let consumed = self.call_consuming(index, &binding.handler, &key_arg);
            if self.quit_requested() {
                return KeyOutcome::Quit;
            }
            if consumed {
                return KeyOutcome::Consumed {
                    plugin: self.plugins[index].name().to_string(),
                    handler: binding.handler,
                };
            }
        }

        for index in 0..self.plugins.len() {
            if !self.plugins[index].defines_any("on_key") {
                continue;
            }
            let consumed = self.call_consuming(index, "on_key", &key_arg);
            if self.quit_requested() {
                return KeyOutcome::Quit;
            }
            if consumed {
                return KeyOutcome::Consumed {
                    plugin: self.plugins[index].name().to_string(),
                    handler: "on_key".to_string(),
                };
            }
        }

        if self.settings.default_actions
            && input::apply_default(&mut shared::write(&self.shared.editor), key)
        {
            return KeyOutcome::Default;
        }
        KeyOutcome::Unhandled
    }

    /// Call a key handler; only a boolean `true` counts as consumed
    fn call_consuming(&mut self, index: usize, handler: &str, key: &str) -> bool {
        match self.plugins[index].call(handler, vec![key.into()]) {
            Ok(value) => value.as_bool().unwrap_or(false),
            Err(e) => {
                self.report_fault(&e);
                false
            }
        }
    }

    /// Deliver one event now, then everything it caused
    pub fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::KeyPress(key) => {
                self.handle_key(key);
            }
            event => {
                self.broadcast(&event);
                self.flush_events();
            }
        }
    }

    /// Call every subscriber of a lifecycle event, in load order
    fn broadcast(&mut self, event: &HostEvent) {
        let Some(kind) = event.kind() else {
            return;
        };
        let subscribers = shared::read(&self.shared.subscriptions).subscribers(kind, |id| self.rank(id));
        if subscribers.is_empty() {
            return;
        }
        let args = event.script_args();
        for (plugin, handler) in subscribers {
            let Some(index) = self.rank(plugin) else {
                continue;
            };
            if let Err(e) = self.plugins[index].call(&handler, args.clone()) {
                self.report_fault(&e);
            }
        }
    }

    /// Deliver queued editor events until none are left or the cascade
    /// limit is hit
    pub(super) fn flush_events(&mut self) {
        let mut queue: VecDeque<EditorEvent> = VecDeque::new();
        let mut delivered = 0usize;
        loop {
            queue.extend(shared::write(&self.shared.editor).take_events());
            let Some(event) = queue.pop_front() else {
                break;
            };
            if delivered == self.settings.max_event_cascade {
                let dropped = queue.len() + 1;
                shared::write(&self.shared.editor).discard_events();
                warn!(
                    limit = self.settings.max_event_cascade,
                    dropped, "event cascade limit reached, dropping events"
                );
                shared::write(&self.shared.messages)
                    .error(format!("Event cascade limit reached; dropped {dropped} events"));
                break;
            }
            delivered += 1;
            self.broadcast(&HostEvent::from(event));
        }
    }
}
