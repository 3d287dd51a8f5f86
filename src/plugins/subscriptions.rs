use std::collections::HashMap;

use super::PluginId;

/// Lifecycle events plugins can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    EditorOpen,
    EditorChange,
    EditorSave,
    EditorCursorMove,
    EditorClose,
    Change,
    DirChange,
    SelectionChange,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::EditorOpen,
        EventKind::EditorChange,
        EventKind::EditorSave,
        EventKind::EditorCursorMove,
        EventKind::EditorClose,
        EventKind::Change,
        EventKind::DirChange,
        EventKind::SelectionChange,
    ];

    /// Name used with `fm::on`
    pub fn name(self) -> &'static str {
        match self {
            EventKind::EditorOpen => "editor_open",
            EventKind::EditorChange => "editor_change",
            EventKind::EditorSave => "editor_save",
            EventKind::EditorCursorMove => "editor_cursor_move",
            EventKind::EditorClose => "editor_close",
            EventKind::Change => "change",
            EventKind::DirChange => "dir_change",
            EventKind::SelectionChange => "selection_change",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Script function picked up automatically when a plugin defines it
    pub fn callback_name(self) -> &'static str {
        match self {
            EventKind::EditorOpen => "on_editor_open",
            EventKind::EditorChange => "on_editor_change",
            EventKind::EditorSave => "on_editor_save",
            EventKind::EditorCursorMove => "on_editor_cursor_move",
            EventKind::EditorClose => "on_editor_close",
            EventKind::Change => "on_change",
            EventKind::DirChange => "on_dir_change",
            EventKind::SelectionChange => "on_selection_change",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub plugin: PluginId,
    pub handler: String,
    seq: u64,
}

/// Event kind to the handlers subscribed to it
#[derive(Debug, Default)]
pub struct SubscriptionTable {
    table: HashMap<EventKind, Vec<Subscription>>,
    next_seq: u64,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribing the same handler twice is a no-op
    pub fn subscribe(&mut self, kind: EventKind, plugin: PluginId, handler: &str) {
        let subs = self.table.entry(kind).or_default();
        if subs.iter().any(|s| s.plugin == plugin && s.handler == handler) {
            return;
        }
        subs.push(Subscription {
            plugin,
            handler: handler.to_string(),
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    pub fn remove_plugin(&mut self, plugin: PluginId) {
        for subs in self.table.values_mut() {
            subs.retain(|s| s.plugin != plugin);
        }
    }

    pub fn is_subscribed(&self, kind: EventKind, plugin: PluginId) -> bool {
        self.table
            .get(&kind)
            .is_some_and(|subs| subs.iter().any(|s| s.plugin == plugin))
    }

    /// Handlers for `kind` ordered by plugin load position, then by when
    /// they subscribed
    pub fn subscribers(
        &self,
        kind: EventKind,
        rank: impl Fn(PluginId) -> Option<usize>,
    ) -> Vec<(PluginId, String)> {
        let Some(subs) = self.table.get(&kind) else {
            return Vec::new();
        };
        let mut ranked: Vec<(usize, u64, &Subscription)> = subs
            .iter()
            .filter_map(|s| Some((rank(s.plugin)?, s.seq, s)))
            .collect();
        ranked.sort_by_key(|&(rank, seq, _)| (rank, seq));
        ranked
            .into_iter()
            .map(|(_, _, s)| (s.plugin, s.handler.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_name(kind.name()), Some(kind));
            assert!(kind.callback_name().starts_with("on_"));
        }
        assert_eq!(EventKind::from_name("editor_opened"), None);
    }

    #[test]
    fn subscribers_follow_load_order() {
        let (a, b) = (PluginId(1), PluginId(2));
        let mut table = SubscriptionTable::new();
        table.subscribe(EventKind::Change, b, "b_first");
        table.subscribe(EventKind::Change, a, "a_one");
        table.subscribe(EventKind::Change, a, "a_two");
        table.subscribe(EventKind::Change, a, "a_one");

        let order = [a, b];
        let subs = table.subscribers(EventKind::Change, |id| order.iter().position(|p| *p == id));
        let handlers: Vec<&str> = subs.iter().map(|(_, h)| h.as_str()).collect();
        assert_eq!(handlers, vec!["a_one", "a_two", "b_first"]);
    }

    #[test]
    fn remove_plugin_drops_all_kinds() {
        let a = PluginId(1);
        let mut table = SubscriptionTable::new();
        table.subscribe(EventKind::EditorOpen, a, "on_editor_open");
        table.subscribe(EventKind::EditorSave, a, "saved");
        table.remove_plugin(a);
        assert!(!table.is_subscribed(EventKind::EditorOpen, a));
        assert!(!table.is_subscribed(EventKind::EditorSave, a));
    }
}
