use std::path::{Path, PathBuf};

use rhai::Dynamic;

use crate::editor::{EditorEvent, Position};
use crate::input::KeySpec;

use super::subscriptions::EventKind;

/// Everything the dispatcher delivers to plugins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    KeyPress(KeySpec),
    EditorOpen { path: Option<PathBuf> },
    EditorChange { line: usize, col: usize, text: String },
    EditorCursorMove { old: Position, new: Position },
    EditorSave { path: PathBuf },
    EditorClose { path: Option<PathBuf> },
    Change,
    DirChange { new: PathBuf, old: PathBuf },
    SelectionChange { new: Option<String>, old: Option<String> },
}

impl HostEvent {
    /// Subscription kind; key presses go through the key registry instead
    pub fn kind(&self) -> Option<EventKind> {
        Some(match self {
            HostEvent::KeyPress(_) => return None,
            HostEvent::EditorOpen { .. } => EventKind::EditorOpen,
            HostEvent::EditorChange { .. } => EventKind::EditorChange,
            HostEvent::EditorCursorMove { .. } => EventKind::EditorCursorMove,
            HostEvent::EditorSave { .. } => EventKind::EditorSave,
            HostEvent::EditorClose { .. } => EventKind::EditorClose,
            HostEvent::Change => EventKind::Change,
            HostEvent::DirChange { .. } => EventKind::DirChange,
            HostEvent::SelectionChange { .. } => EventKind::SelectionChange,
        })
    }

    /// Arguments handed to the script handler
    pub fn script_args(&self) -> Vec<Dynamic> {
        match self {
            HostEvent::KeyPress(key) => vec![key.to_string().into()],
            HostEvent::EditorOpen { path } | HostEvent::EditorClose { path } => {
                vec![optional_path(path.as_deref())]
            }
            HostEvent::EditorChange { line, col, text } => {
                vec![to_int(*line), to_int(*col), text.clone().into()]
            }
            HostEvent::EditorCursorMove { old, new } => vec![
                to_int(old.line),
                to_int(old.col),
                to_int(new.line),
                to_int(new.col),
            ],
            HostEvent::EditorSave { path } => vec![path_string(path)],
            HostEvent::Change => Vec::new(),
            HostEvent::DirChange { new, old } => vec![path_string(new), path_string(old)],
            HostEvent::SelectionChange { new, old } => {
                vec![optional_string(new.as_deref()), optional_string(old.as_deref())]
            }
        }
    }
}

impl From<EditorEvent> for HostEvent {
    fn from(event: EditorEvent) -> Self {
        match event {
            EditorEvent::Open { path } => HostEvent::EditorOpen { path },
            EditorEvent::Change { line, col, text } => HostEvent::EditorChange { line, col, text },
            EditorEvent::CursorMove { old, new } => HostEvent::EditorCursorMove { old, new },
            EditorEvent::Save { path } => HostEvent::EditorSave { path },
            EditorEvent::Close { path } => HostEvent::EditorClose { path },
            EditorEvent::Modified => HostEvent::Change,
        }
    }
}

fn to_int(n: usize) -> Dynamic {
    Dynamic::from_int(i64::try_from(n).unwrap_or(i64::MAX))
}

fn path_string(path: &Path) -> Dynamic {
    path.to_string_lossy().into_owned().into()
}

fn optional_path(path: Option<&Path>) -> Dynamic {
    path.map_or(Dynamic::UNIT, path_string)
}

fn optional_string(s: Option<&str>) -> Dynamic {
    s.map_or(Dynamic::UNIT, |s| s.to_string().into())
}
