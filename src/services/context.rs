use std::path::PathBuf;

/// What the file browser currently shows, as last reported by the embedder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserContext {
    pub cwd: PathBuf,
    pub selected_name: Option<String>,
    /// 0-based index of the highlighted entry
    pub cursor: usize,
    /// Number of entries in the listing
    pub count: usize,
    pub search_active: bool,
    pub search_query: String,
}

impl BrowserContext {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            ..Self::default()
        }
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        if self.cwd.as_os_str().is_empty() {
            return None;
        }
        self.selected_name.as_ref().map(|name| self.cwd.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_path_joins_cwd() {
        let mut ctx = BrowserContext::new("/home/me");
        assert_eq!(ctx.selected_path(), None);
        ctx.selected_name = Some("notes.txt".to_string());
        assert_eq!(ctx.selected_path(), Some(PathBuf::from("/home/me/notes.txt")));
    }

    #[test]
    fn no_cwd_means_no_selected_path() {
        let ctx = BrowserContext {
            selected_name: Some("a".to_string()),
            ..BrowserContext::default()
        };
        assert_eq!(ctx.selected_path(), None);
    }
}
