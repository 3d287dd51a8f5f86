use ropey::Rope;
use std::{
    fs::File,
    io::{self, BufReader, BufWriter},
    ops::Range,
    path::{Path, PathBuf},
};

use super::Position;

/// Text of one open file. Lines are separated by `\n` only, so an empty text
/// is one empty line and a trailing `\n` opens one more empty line.
pub struct Buffer {
    text: Rope,
    filepath: Option<PathBuf>,
    dirty: bool,
    readonly: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            text: Rope::new(),
            filepath: None,
            dirty: false,
            readonly: false,
        }
    }

    /// Fails with `InvalidData` when the file is not UTF-8
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = Rope::from_reader(BufReader::new(File::open(path)?))?;
        Ok(Self {
            text,
            filepath: Some(path.to_path_buf()),
            dirty: false,
            readonly: false,
        })
    }

    pub fn from_text(s: &str) -> Self {
        Self {
            text: Rope::from_str(s),
            filepath: None,
            dirty: false,
            readonly: false,
        }
    }

    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.text.write_to(&mut file)?;
        io::Write::flush(&mut file)
    }

    /// Swap in freshly read text, keeping the path and readonly flag
    pub fn reset_text(&mut self, other: Buffer) {
        self.text = other.text;
        self.dirty = false;
    }

    pub fn path(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.filepath = Some(path);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    /// Length of a 0-indexed line, excluding the newline character
    pub fn line_len(&self, idx: usize) -> usize {
        let line = self.text.line(idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// A 0-indexed line without its terminator
    pub fn line_text(&self, idx: usize) -> String {
        let len = self.line_len(idx);
        self.text.line(idx).slice(..len).to_string()
    }

    pub fn content(&self) -> String {
        self.text.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    /// Char offset of a 1-indexed position, or `None` when the position lies
    /// outside the buffer
    pub fn char_index(&self, pos: Position) -> Option<usize> {
        if pos.line < 1 || pos.line > self.line_count() || pos.col < 1 {
            return None;
        }
        let idx = pos.line - 1;
        if pos.col > self.line_len(idx) + 1 {
            return None;
        }
        Some(self.text.line_to_char(idx) + pos.col - 1)
    }

    /// 1-indexed position of a char offset (clamped to the end of the text)
    pub fn position_of(&self, char_idx: usize) -> Position {
        let char_idx = char_idx.min(self.text.len_chars());
        let line = self.text.char_to_line(char_idx);
        Position::new(line + 1, char_idx - self.text.line_to_char(line) + 1)
    }

    pub fn slice(&self, range: Range<usize>) -> String {
        self.text.slice(range).to_string()
    }

    /// Replace the chars in `range` with `text`. Callers validate the range.
    pub fn splice(&mut self, range: Range<usize>, text: &str) {
        if !range.is_empty() {
            self.text.remove(range.clone());
        }
        if !text.is_empty() {
            self.text.insert(range.start, text);
        }
        self.dirty = true;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}
