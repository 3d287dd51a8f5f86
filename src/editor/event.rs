use std::path::PathBuf;

use super::Position;

/// Lifecycle notifications queued by the [`Editor`](super::Editor) after a
/// mutation has fully committed. The plugin host drains them once the event
/// that caused them has finished processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A buffer was opened or reloaded from disk
    Open { path: Option<PathBuf> },
    /// Text changed at `line`/`col`; `text` is what now occupies the edited
    /// range (empty for pure deletions)
    Change { line: usize, col: usize, text: String },
    CursorMove { old: Position, new: Position },
    Save { path: PathBuf },
    Close { path: Option<PathBuf> },
    /// Coarse "something in the buffer changed", follows every content edit
    Modified,
}
