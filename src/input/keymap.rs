use crate::plugins::PluginId;

use super::key::KeySpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingScope {
    /// Active everywhere
    Global,
    /// Active only while a buffer is open, ahead of global bindings
    Editor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: KeySpec,
    pub handler: String,
    pub plugin: PluginId,
    pub scope: BindingScope,
    seq: u64,
}

/// A handler selected for a key press, in dispatch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub plugin: PluginId,
    pub handler: String,
}

/// Every key binding registered by every loaded plugin
#[derive(Debug, Default)]
pub struct KeyRegistry {
    bindings: Vec<Binding>,
    next_seq: u64,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` for `plugin`. Binding the same key again in the same scope
    /// replaces the handler but keeps the original registration slot.
    pub fn bind(&mut self, plugin: PluginId, scope: BindingScope, key: KeySpec, handler: &str) {
        if let Some(existing) = self
            .bindings
            .iter_mut()
            .find(|b| b.plugin == plugin && b.scope == scope && b.key == key)
        {
            existing.handler = handler.to_string();
            return;
        }
        self.bindings.push(Binding {
            key,
            handler: handler.to_string(),
            plugin,
            scope,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Drop the plugin's bindings for `key` in both scopes
    pub fn unbind(&mut self, plugin: PluginId, key: KeySpec) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| !(b.plugin == plugin && b.key == key));
        self.bindings.len() != before
    }

    pub fn remove_plugin(&mut self, plugin: PluginId) {
        self.bindings.retain(|b| b.plugin != plugin);
    }

    pub fn is_bound(&self, key: KeySpec) -> bool {
        self.bindings.iter().any(|b| b.key == key)
    }

    pub fn bindings_for(&self, plugin: PluginId) -> impl Iterator<Item = &Binding> {
        self.bindings.iter().filter(move |b| b.plugin == plugin)
    }

    /// Handlers for `key` in the order they should be tried.
    ///
    /// `rank` maps a plugin to its load position; bindings of plugins it
    /// does not know are skipped.
    pub fn resolve(
        &self,
        key: KeySpec,
        editor_open: bool,
        rank: impl Fn(PluginId) -> Option<usize>,
    ) -> Vec<ResolvedBinding> {
        let mut hits: Vec<(u8, usize, u64, &Binding)> = self
            .bindings
            .iter()
            .filter(|b| b.key == key)
            .filter_map(|b| {
                let scope_order = match b.scope {
                    BindingScope::Editor if editor_open => 0,
                    BindingScope::Editor => return None,
                    BindingScope::Global => 1,
                };
                Some((scope_order, rank(b.plugin)?, b.seq, b))
            })
            .collect();
        hits.sort_by_key(|&(scope, rank, seq, _)| (scope, rank, seq));
        hits.into_iter()
            .map(|(_, _, _, b)| ResolvedBinding {
                plugin: b.plugin,
                handler: b.handler.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> KeySpec {
        s.parse().unwrap()
    }

    fn ranked(order: &[PluginId]) -> impl Fn(PluginId) -> Option<usize> + '_ {
        move |id| order.iter().position(|p| *p == id)
    }

    fn handlers(resolved: Vec<ResolvedBinding>) -> Vec<String> {
        resolved.into_iter().map(|r| r.handler).collect()
    }

    #[test]
    fn rebinding_replaces_handler_in_place() {
        let (a, b) = (PluginId(1), PluginId(2));
        let mut keys = KeyRegistry::new();
        keys.bind(a, BindingScope::Global, key("^K"), "first");
        keys.bind(b, BindingScope::Global, key("^K"), "other");
        keys.bind(a, BindingScope::Global, key("^K"), "second");

        let order = [a, b];
        let resolved = keys.resolve(key("^K"), false, ranked(&order));
        assert_eq!(handlers(resolved), vec!["second", "other"]);
    }

    #[test]
    fn load_order_beats_registration_order() {
        let (a, b) = (PluginId(1), PluginId(2));
        let mut keys = KeyRegistry::new();
        keys.bind(b, BindingScope::Global, key("F5"), "from_b");
        keys.bind(a, BindingScope::Global, key("F5"), "from_a");

        let order = [a, b];
        let resolved = keys.resolve(key("F5"), false, ranked(&order));
        assert_eq!(handlers(resolved), vec!["from_a", "from_b"]);
    }

    #[test]
    fn editor_scope_only_applies_with_open_buffer() {
        let a = PluginId(1);
        let mut keys = KeyRegistry::new();
        keys.bind(a, BindingScope::Global, key("x"), "global");
        keys.bind(a, BindingScope::Editor, key("x"), "editor");

        let order = [a];
        assert_eq!(
            handlers(keys.resolve(key("x"), true, ranked(&order))),
            vec!["editor", "global"]
        );
        assert_eq!(
            handlers(keys.resolve(key("x"), false, ranked(&order))),
            vec!["global"]
        );
    }

    #[test]
    fn unknown_plugins_are_skipped() {
        let mut keys = KeyRegistry::new();
        keys.bind(PluginId(9), BindingScope::Global, key("q"), "stale");
        assert!(keys.resolve(key("q"), false, |_| None).is_empty());
    }

    #[test]
    fn unbind_and_remove_plugin() {
        let (a, b) = (PluginId(1), PluginId(2));
        let mut keys = KeyRegistry::new();
        keys.bind(a, BindingScope::Global, key("^A"), "h1");
        keys.bind(a, BindingScope::Editor, key("^A"), "h2");
        keys.bind(a, BindingScope::Global, key("^B"), "h3");
        keys.bind(b, BindingScope::Global, key("^B"), "h4");

        assert!(keys.unbind(a, key("^A")));
        assert!(!keys.unbind(a, key("^A")));
        assert!(!keys.is_bound(key("^A")));

        keys.remove_plugin(a);
        assert_eq!(keys.bindings_for(a).count(), 0);
        assert_eq!(keys.bindings_for(b).count(), 1);
        assert!(keys.is_bound(key("^B")));
    }
}
