/// A 1-indexed position in a buffer. `col` may sit one past the last
/// character of its line (the end-of-line insertion point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Convert script-supplied integers, rejecting anything below 1
    pub fn from_script(line: i64, col: i64) -> Option<Self> {
        if line < 1 || col < 1 {
            return None;
        }
        Some(Self::new(usize::try_from(line).ok()?, usize::try_from(col).ok()?))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, col: 1 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cursor {
    pub pos: Position,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            pos: Position::default(),
        }
    }

    pub fn move_left(&mut self) {
        if self.pos.col > 1 {
            self.pos.col -= 1;
        }
    }

    /// `line_len` is the character count of the current line
    pub fn move_right(&mut self, line_len: usize) {
        self.pos.col += 1;
        self.pos.col = self.pos.col.clamp(1, line_len + 1);
    }

    pub fn move_up(&mut self) {
        if self.pos.line > 1 {
            self.pos.line -= 1;
        }
    }

    pub fn move_down(&mut self, line_count: usize) {
        self.pos.line += 1;
        self.pos.line = self.pos.line.clamp(1, line_count.max(1));
    }

    /// Pull the column back onto the line after a vertical move
    pub fn clamp_col(&mut self, line_len: usize) {
        if self.pos.col > line_len + 1 {
            self.pos.col = line_len + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cursor_starts_at_origin() {
        let cursor = Cursor::new();
        assert_eq!(cursor.pos, Position::new(1, 1));
    }

    #[test]
    fn from_script_rejects_zero_and_negative() {
        assert_eq!(Position::from_script(0, 1), None);
        assert_eq!(Position::from_script(1, 0), None);
        assert_eq!(Position::from_script(-3, 2), None);
        assert_eq!(Position::from_script(2, 3), Some(Position::new(2, 3)));
    }

    #[test]
    fn positions_order_by_line_then_col() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(2, 1) < Position::new(2, 2));
    }

    #[test]
    fn move_left_stops_at_one() {
        let mut cursor = Cursor {
            pos: Position::new(1, 2),
        };
        cursor.move_left();
        assert_eq!(cursor.pos.col, 1);
        cursor.move_left();
        assert_eq!(cursor.pos.col, 1);
    }

    #[test]
    fn move_right_clamps_to_insertion_point() {
        let mut cursor = Cursor {
            pos: Position::new(1, 10),
        };
        cursor.move_right(10);
        assert_eq!(cursor.pos.col, 11);
        cursor.move_right(10);
        assert_eq!(cursor.pos.col, 11); // stays at end-of-line
    }

    #[test]
    fn move_up_stops_at_first_line() {
        let mut cursor = Cursor::new();
        cursor.move_up();
        assert_eq!(cursor.pos.line, 1);
    }

    #[test]
    fn move_down_clamps_to_last_line() {
        let mut cursor = Cursor {
            pos: Position::new(9, 1),
        };
        cursor.move_down(10);
        assert_eq!(cursor.pos.line, 10);
        cursor.move_down(10);
        assert_eq!(cursor.pos.line, 10);
    }

    #[test]
    fn clamp_col_pulls_back_onto_short_line() {
        let mut cursor = Cursor {
            pos: Position::new(2, 8),
        };
        cursor.clamp_col(3);
        assert_eq!(cursor.pos.col, 4);
    }
}
