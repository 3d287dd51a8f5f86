use std::path::PathBuf;

use crate::scripting::ScriptLimits;

/// Environment switch that adds `./plugins` to the plugin search path
pub const LOCAL_PLUGINS_ENV: &str = "BURROW_LOAD_LOCAL_PLUGINS";

/// Host settings that can be customized via the Rhai config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    // Plugin discovery
    pub plugin_dirs: Vec<PathBuf>,
    pub load_local_plugins: bool,

    // Script limits
    pub max_operations: u64,
    pub max_expr_depth: usize,
    /// Lifecycle events delivered per dispatch before the rest are dropped
    pub max_event_cascade: usize,

    // Services
    pub cache_file: Option<PathBuf>,

    /// Run built-in editing actions for keys no plugin consumed
    pub default_actions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let limits = ScriptLimits::default();
        Self {
            plugin_dirs: Self::config_dir()
                .map(|dir| vec![dir.join("plugins")])
                .unwrap_or_default(),
            load_local_plugins: false,

            max_operations: limits.max_operations,
            max_expr_depth: limits.max_expr_depth,
            max_event_cascade: 256,

            cache_file: dirs::cache_dir().map(|dir| dir.join("burrow").join("cache.json")),

            default_actions: true,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults without any filesystem locations: no plugin directories and
    /// an in-memory cache
    pub fn ephemeral() -> Self {
        Self {
            plugin_dirs: Vec::new(),
            cache_file: None,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> ScriptLimits {
        ScriptLimits {
            max_operations: self.max_operations,
            max_expr_depth: self.max_expr_depth,
        }
    }

    /// Directories searched for plugins, in load order
    pub fn plugin_search_path(&self) -> Vec<PathBuf> {
        let mut dirs = self.plugin_dirs.clone();
        if self.load_local_plugins {
            dirs.push(PathBuf::from("plugins"));
        }
        dirs
    }

    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(LOCAL_PLUGINS_ENV) {
            if let Some(flag) = parse_flag(&value) {
                self.load_local_plugins = flag;
            }
        }
    }

    /// Get the config directory path
    /// Uses ~/.config/burrow/ on all platforms for consistency
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("burrow"))
    }

    /// Get the default config file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("init.rhai"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_loosely() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" Yes "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn local_plugins_come_last() {
        let mut settings = Settings::ephemeral();
        settings.plugin_dirs.push(PathBuf::from("/opt/burrow/plugins"));
        assert_eq!(settings.plugin_search_path().len(), 1);
        settings.load_local_plugins = true;
        assert_eq!(
            settings.plugin_search_path(),
            vec![PathBuf::from("/opt/burrow/plugins"), PathBuf::from("plugins")]
        );
    }

    #[test]
    fn ephemeral_has_no_locations() {
        let settings = Settings::ephemeral();
        assert!(settings.plugin_dirs.is_empty());
        assert!(settings.cache_file.is_none());
        assert_eq!(settings.max_event_cascade, 256);
    }
}
