use super::Position;

/// A normalized selection: start never follows end, and `end_col` is
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Selection {
    pub fn start(&self) -> Position {
        Position::new(self.start_line, self.start_col)
    }

    pub fn end(&self) -> Position {
        Position::new(self.end_line, self.end_col)
    }

    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }
}

/// Selection as the user made it: the anchor stays put while the head moves,
/// so the head may precede the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSpan {
    pub anchor: Position,
    pub head: Position,
}

impl SelectionSpan {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    pub fn normalized(&self) -> Selection {
        let (start, end) = if self.head < self.anchor {
            (self.head, self.anchor)
        } else {
            (self.anchor, self.head)
        };
        Selection {
            start_line: start.line,
            start_col: start.col,
            end_line: end.line,
            end_col: end.col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_span_is_unchanged() {
        let span = SelectionSpan::new(Position::new(1, 2), Position::new(3, 4));
        let sel = span.normalized();
        assert_eq!(sel.start(), Position::new(1, 2));
        assert_eq!(sel.end(), Position::new(3, 4));
    }

    #[test]
    fn backward_span_is_flipped() {
        let span = SelectionSpan::new(Position::new(3, 4), Position::new(1, 2));
        let sel = span.normalized();
        assert_eq!(sel.start(), Position::new(1, 2));
        assert_eq!(sel.end(), Position::new(3, 4));
    }

    #[test]
    fn same_line_backward_span_is_flipped() {
        let span = SelectionSpan::new(Position::new(2, 7), Position::new(2, 3));
        let sel = span.normalized();
        assert_eq!((sel.start_col, sel.end_col), (3, 7));
        assert!(!sel.is_empty());
    }

    #[test]
    fn collapsed_span_is_empty() {
        let span = SelectionSpan::new(Position::new(2, 2), Position::new(2, 2));
        assert!(span.normalized().is_empty());
    }
}
