use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Buffer, Cursor, EditorEvent, Position, Selection, SelectionSpan};

/// What happens to the cursor when an edit lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorRule {
    /// Move past the inserted text (typing)
    Advance,
    /// Keep the cursor on the same text it was on before the edit
    Remap,
}

struct Session {
    buffer: Buffer,
    cursor: Cursor,
    selection: Option<SelectionSpan>,
}

impl Session {
    fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Cursor::new(),
            selection: None,
        }
    }

    fn current_line_len(&self) -> usize {
        self.buffer.line_len(self.cursor.pos.line - 1)
    }
}

/// The text buffer engine: owns the open buffer, its cursor and selection.
///
/// Every operation returns a "no effect" sentinel (`false`, `None`, `0`)
/// instead of failing loudly when no buffer is open, a position is out of
/// range, or the buffer is readonly. Successful mutations queue
/// [`EditorEvent`]s which are collected with [`Editor::take_events`].
pub struct Editor {
    session: Option<Session>,
    outbox: Vec<EditorEvent>,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            session: None,
            outbox: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn open(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match Buffer::from_file(path) {
            Ok(buffer) => {
                self.session = Some(Session::new(buffer));
                self.outbox.push(EditorEvent::Open {
                    path: Some(path.to_path_buf()),
                });
                true
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "open failed");
                false
            }
        }
    }

    /// Open an unnamed buffer holding `text`
    pub fn open_scratch(&mut self, text: &str) -> bool {
        self.session = Some(Session::new(Buffer::from_text(text)));
        self.outbox.push(EditorEvent::Open { path: None });
        true
    }

    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn discard_events(&mut self) {
        self.outbox.clear();
    }

    // Reads

    pub fn path(&self) -> Option<PathBuf> {
        self.session
            .as_ref()
            .and_then(|s| s.buffer.path().map(Path::to_path_buf))
    }

    pub fn line_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.buffer.line_count())
    }

    pub fn get_line(&self, n: i64) -> Option<String> {
        let session = self.session.as_ref()?;
        let idx = line_index(n, session.buffer.line_count())?;
        Some(session.buffer.line_text(idx))
    }

    pub fn get_lines(&self, from: i64, to: i64) -> Option<Vec<String>> {
        let session = self.session.as_ref()?;
        let count = session.buffer.line_count();
        let first = line_index(from, count)?;
        let last = line_index(to, count)?;
        if first > last {
            return None;
        }
        Some((first..=last).map(|i| session.buffer.line_text(i)).collect())
    }

    pub fn get_content(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.buffer.content())
    }

    pub fn is_readonly(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.buffer.is_readonly())
    }

    pub fn is_dirty(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.buffer.is_dirty())
    }

    // Cursor and selection

    pub fn cursor(&self) -> Option<Position> {
        self.session.as_ref().map(|s| s.cursor.pos)
    }

    pub fn set_cursor(&mut self, line: i64, col: i64) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(pos) = Position::from_script(line, col) else {
            return false;
        };
        if session.buffer.char_index(pos).is_none() {
            debug!(line, col, "set_cursor out of range");
            return false;
        }
        let old = session.cursor.pos;
        session.cursor.pos = pos;
        self.note_cursor_move(old, pos);
        true
    }

    pub fn selection(&self) -> Option<Selection> {
        self.session
            .as_ref()
            .and_then(|s| s.selection.map(|span| span.normalized()))
    }

    /// Select from the anchor to the head; either may come first
    pub fn set_selection(&mut self, anchor_line: i64, anchor_col: i64, head_line: i64, head_col: i64) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let (Some(anchor), Some(head)) = (
            Position::from_script(anchor_line, anchor_col),
            Position::from_script(head_line, head_col),
        ) else {
            return false;
        };
        if session.buffer.char_index(anchor).is_none() || session.buffer.char_index(head).is_none() {
            debug!("set_selection out of range");
            return false;
        }
        session.selection = Some(SelectionSpan::new(anchor, head));
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.selection = None;
                true
            }
            None => false,
        }
    }

    // Mutations

    pub fn insert_text(&mut self, text: &str) -> bool {
        let Some(at) = self.cursor() else {
            return false;
        };
        self.apply_edit(at, at, text, CursorRule::Advance, "insert_text")
    }

    pub fn delete_range(&mut self, start_line: i64, start_col: i64, end_line: i64, end_col: i64) -> bool {
        self.replace_text(start_line, start_col, end_line, end_col, "")
    }

    pub fn replace_text(&mut self, start_line: i64, start_col: i64, end_line: i64, end_col: i64, text: &str) -> bool {
        let (Some(start), Some(end)) = (
            Position::from_script(start_line, start_col),
            Position::from_script(end_line, end_col),
        ) else {
            debug!("range has non-positive coordinates");
            return false;
        };
        let op = if text.is_empty() { "delete_range" } else { "replace_text" };
        self.apply_edit(start, end, text, CursorRule::Remap, op)
    }

    pub fn uppercase_selection(&mut self) -> bool {
        let Some(sel) = self.selection() else {
            return false;
        };
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let (Some(a), Some(b)) = (
            session.buffer.char_index(sel.start()),
            session.buffer.char_index(sel.end()),
        ) else {
            return false;
        };
        let upper = session.buffer.slice(a..b).to_uppercase();
        if session.buffer.is_readonly() {
            return false;
        }
        if upper == session.buffer.slice(a..b) {
            return true;
        }
        if !self.apply_edit(sel.start(), sel.end(), &upper, CursorRule::Remap, "uppercase_selection") {
            return false;
        }
        if let Some(session) = self.session.as_mut() {
            let end = session.buffer.position_of(a + upper.chars().count());
            session.selection = Some(SelectionSpan::new(sel.start(), end));
        }
        true
    }

    /// Validate `[start, end)` against the current text, then splice `text`
    /// in as a single step. Nothing is touched unless every check passes.
    fn apply_edit(&mut self, start: Position, end: Position, text: &str, rule: CursorRule, op: &'static str) -> bool {
        let Some(session) = self.session.as_mut() else {
            debug!(op, "no buffer open");
            return false;
        };
        if session.buffer.is_readonly() {
            debug!(op, "buffer is readonly");
            return false;
        }
        let (Some(a), Some(b)) = (session.buffer.char_index(start), session.buffer.char_index(end)) else {
            debug!(op, ?start, ?end, "range out of bounds");
            return false;
        };
        if a > b {
            debug!(op, ?start, ?end, "range is inverted");
            return false;
        }
        if a == b && text.is_empty() {
            return true;
        }

        let old_cursor = session.cursor.pos;
        let cursor_idx = session.buffer.char_index(old_cursor).unwrap_or(a);
        let inserted = text.chars().count();
        let new_idx = match rule {
            CursorRule::Advance => a + inserted,
            CursorRule::Remap if cursor_idx <= a => cursor_idx,
            CursorRule::Remap if cursor_idx >= b => cursor_idx - (b - a) + inserted,
            CursorRule::Remap => a + inserted,
        };

        session.buffer.splice(a..b, text);
        session.cursor.pos = session.buffer.position_of(new_idx);
        session.selection = None;
        let new_cursor = session.cursor.pos;

        self.outbox.push(EditorEvent::Change {
            line: start.line,
            col: start.col,
            text: text.to_string(),
        });
        self.note_cursor_move(old_cursor, new_cursor);
        self.outbox.push(EditorEvent::Modified);
        true
    }

    // Lifecycle

    pub fn save(&mut self) -> bool {
        let Some(path) = self.path() else {
            debug!("save without a path");
            return false;
        };
        self.write_buffer(&path, false)
    }

    pub fn save_as(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return false;
        }
        self.write_buffer(path, true)
    }

    fn write_buffer(&mut self, path: &Path, adopt_path: bool) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if let Err(e) = session.buffer.write_to(path) {
            debug!(path = %path.display(), error = %e, "write failed");
            return false;
        }
        if adopt_path {
            session.buffer.set_path(path.to_path_buf());
        }
        session.buffer.mark_clean();
        self.outbox.push(EditorEvent::Save {
            path: path.to_path_buf(),
        });
        true
    }

    pub fn reload(&mut self) -> bool {
        let Some(path) = self.path() else {
            debug!("reload without a path");
            return false;
        };
        let fresh = match Buffer::from_file(&path) {
            Ok(buffer) => buffer,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "reload failed");
                return false;
            }
        };
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.buffer.reset_text(fresh);
        session.selection = None;
        let old = session.cursor.pos;
        let line = old.line.min(session.buffer.line_count());
        session.cursor.pos.line = line;
        session.cursor.clamp_col(session.buffer.line_len(line - 1));
        let new = session.cursor.pos;

        self.outbox.push(EditorEvent::Open { path: Some(path) });
        self.outbox.push(EditorEvent::Modified);
        self.note_cursor_move(old, new);
        true
    }

    pub fn close(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                self.outbox.push(EditorEvent::Close {
                    path: session.buffer.path().map(Path::to_path_buf),
                });
                true
            }
            None => false,
        }
    }

    pub fn set_readonly(&mut self, readonly: bool) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.buffer.set_readonly(readonly);
                true
            }
            None => false,
        }
    }

    // Navigation used by the built-in key actions

    pub fn move_left(&mut self) -> bool {
        self.move_cursor(|s| s.cursor.move_left())
    }

    pub fn move_right(&mut self) -> bool {
        self.move_cursor(|s| {
            let len = s.current_line_len();
            s.cursor.move_right(len);
        })
    }

    pub fn move_up(&mut self) -> bool {
        self.move_cursor(|s| {
            s.cursor.move_up();
            let len = s.current_line_len();
            s.cursor.clamp_col(len);
        })
    }

    pub fn move_down(&mut self) -> bool {
        self.move_cursor(|s| {
            let count = s.buffer.line_count();
            s.cursor.move_down(count);
            let len = s.current_line_len();
            s.cursor.clamp_col(len);
        })
    }

    pub fn move_to_line_start(&mut self) -> bool {
        self.move_cursor(|s| s.cursor.pos.col = 1)
    }

    pub fn move_to_line_end(&mut self) -> bool {
        self.move_cursor(|s| s.cursor.pos.col = s.current_line_len() + 1)
    }

    fn move_cursor(&mut self, motion: impl FnOnce(&mut Session)) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let old = session.cursor.pos;
        motion(session);
        let new = session.cursor.pos;
        self.note_cursor_move(old, new);
        true
    }

    /// Backspace: remove the char before the cursor, joining lines at column 1
    pub fn delete_backward(&mut self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let pos = session.cursor.pos;
        let start = if pos.col > 1 {
            Position::new(pos.line, pos.col - 1)
        } else if pos.line > 1 {
            Position::new(pos.line - 1, session.buffer.line_len(pos.line - 2) + 1)
        } else {
            return false;
        };
        self.apply_edit(start, pos, "", CursorRule::Remap, "delete_backward")
    }

    /// Delete: remove the char under the cursor, joining with the next line
    /// at end-of-line
    pub fn delete_forward(&mut self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let pos = session.cursor.pos;
        let end = if pos.col <= session.current_line_len() {
            Position::new(pos.line, pos.col + 1)
        } else if pos.line < session.buffer.line_count() {
            Position::new(pos.line + 1, 1)
        } else {
            return false;
        };
        self.apply_edit(pos, end, "", CursorRule::Remap, "delete_forward")
    }

    fn note_cursor_move(&mut self, old: Position, new: Position) {
        if old != new {
            self.outbox.push(EditorEvent::CursorMove { old, new });
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

/// 0-indexed line for a 1-indexed script line number
fn line_index(n: i64, line_count: usize) -> Option<usize> {
    let n = usize::try_from(n).ok()?;
    (1..=line_count).contains(&n).then(|| n - 1)
}
