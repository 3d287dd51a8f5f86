use burrow::editor::{Editor, Position};
use proptest::prelude::*;

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z ]{0,8}", 1..6)
}

fn open(text: &str) -> Editor {
    let mut editor = Editor::new();
    editor.open_scratch(text);
    editor.discard_events();
    editor
}

fn line_len(editor: &Editor, line: usize) -> usize {
    editor
        .get_line(line as i64)
        .map(|l| l.chars().count())
        .unwrap_or(0)
}

fn assert_cursor_valid(editor: &Editor) {
    let cursor = editor.cursor().unwrap();
    assert!(cursor.line >= 1 && cursor.line <= editor.line_count());
    assert!(cursor.col >= 1 && cursor.col <= line_len(editor, cursor.line) + 1);
}

/// Map raw draws to a valid position in `lines`
fn position(lines: &[String], (l, c): (usize, usize)) -> Position {
    let line = l % lines.len();
    Position::new(line + 1, c % (lines[line].len() + 1) + 1)
}

fn ordered(lines: &[String], a: (usize, usize), b: (usize, usize)) -> (Position, Position) {
    let (a, b) = (position(lines, a), position(lines, b));
    (a.min(b), a.max(b))
}

/// Byte offset of `pos` in the joined text; generated lines are ASCII
fn offset(lines: &[String], pos: Position) -> usize {
    lines[..pos.line - 1].iter().map(|l| l.len() + 1).sum::<usize>() + pos.col - 1
}

#[derive(Debug, Clone)]
enum Op {
    SetCursor(i64, i64),
    Insert(String),
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    End,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-1i64..8, -1i64..12).prop_map(|(l, c)| Op::SetCursor(l, c)),
        "[a-z\n]{0,4}".prop_map(Op::Insert),
        Just(Op::Backspace),
        Just(Op::Delete),
        Just(Op::Left),
        Just(Op::Right),
        Just(Op::Up),
        Just(Op::Down),
        Just(Op::End),
    ]
}

proptest! {
    #[test]
    fn line_reads_agree(lines in lines_strategy()) {
        let editor = open(&lines.join("\n"));
        let n = lines.len();

        prop_assert_eq!(editor.line_count(), n);
        prop_assert_eq!(editor.get_lines(1, n as i64), Some(lines.clone()));
        for (i, line) in lines.iter().enumerate() {
            let got = editor.get_line(i as i64 + 1);
            prop_assert_eq!(got.as_ref(), Some(line));
        }
        prop_assert_eq!(editor.get_line(0), None);
        prop_assert_eq!(editor.get_line(n as i64 + 1), None);
    }

    #[test]
    fn cursor_always_valid(lines in lines_strategy(), ops in prop::collection::vec(op_strategy(), 0..30)) {
        let mut editor = open(&lines.join("\n"));
        for op in ops {
            match op {
                Op::SetCursor(l, c) => { editor.set_cursor(l, c); }
                Op::Insert(text) => { editor.insert_text(&text); }
                Op::Backspace => { editor.delete_backward(); }
                Op::Delete => { editor.delete_forward(); }
                Op::Left => { editor.move_left(); }
                Op::Right => { editor.move_right(); }
                Op::Up => { editor.move_up(); }
                Op::Down => { editor.move_down(); }
                Op::End => { editor.move_to_line_end(); }
            }
            assert_cursor_valid(&editor);
        }
    }

    #[test]
    fn set_cursor_is_exact_or_untouched(
        lines in lines_strategy(),
        moves in prop::collection::vec((-1i64..8, -1i64..12), 1..10),
    ) {
        let mut editor = open(&lines.join("\n"));
        for (l, c) in moves {
            let before = editor.cursor();
            let valid = l >= 1
                && (l as usize) <= lines.len()
                && c >= 1
                && (c as usize) <= lines[l as usize - 1].len() + 1;

            prop_assert_eq!(editor.set_cursor(l, c), valid);
            if valid {
                prop_assert_eq!(editor.cursor(), Some(Position::new(l as usize, c as usize)));
            } else {
                prop_assert_eq!(editor.cursor(), before);
            }
        }
    }

    #[test]
    fn replace_reads_back(
        lines in lines_strategy(),
        from in (0usize..100, 0usize..100),
        to in (0usize..100, 0usize..100),
        text in "[A-Z\n]{0,6}",
    ) {
        let (start, end) = ordered(&lines, from, to);
        let original = lines.join("\n");
        let (a, b) = (offset(&lines, start), offset(&lines, end));
        let mut editor = open(&original);

        prop_assert!(editor.replace_text(
            start.line as i64, start.col as i64, end.line as i64, end.col as i64, &text,
        ));

        let expected = format!("{}{}{}", &original[..a], text, &original[b..]);
        let content = editor.get_content().unwrap();
        prop_assert_eq!(&content, &expected);
        prop_assert_eq!(&content[a..a + text.len()], text.as_str());

        let after = editor.get_lines(1, editor.line_count() as i64).unwrap();
        let kept_before = start.line - 1;
        let kept_after = lines.len() - end.line;
        prop_assert_eq!(&after[..kept_before], &lines[..kept_before]);
        prop_assert_eq!(&after[after.len() - kept_after..], &lines[end.line..]);
    }

    #[test]
    fn delete_then_insert_restores(
        lines in lines_strategy(),
        from in (0usize..100, 0usize..100),
        to in (0usize..100, 0usize..100),
    ) {
        let (start, end) = ordered(&lines, from, to);
        let original = lines.join("\n");
        let removed = original[offset(&lines, start)..offset(&lines, end)].to_string();
        let mut editor = open(&original);

        prop_assert!(editor.delete_range(
            start.line as i64, start.col as i64, end.line as i64, end.col as i64,
        ));
        prop_assert!(editor.set_cursor(start.line as i64, start.col as i64));
        prop_assert!(editor.insert_text(&removed));
        prop_assert_eq!(editor.get_content(), Some(original));
    }

    #[test]
    fn selection_is_normalized(
        lines in lines_strategy(),
        al in 1i64..6, ac in 1i64..10, hl in 1i64..6, hc in 1i64..10,
    ) {
        let mut editor = open(&lines.join("\n"));
        if editor.set_selection(al, ac, hl, hc) {
            let sel = editor.selection().unwrap();
            prop_assert!(sel.start() <= sel.end());
            prop_assert!(!editor.set_selection(0, 1, 1, 1));
            prop_assert_eq!(editor.selection(), Some(sel));
        } else {
            prop_assert_eq!(editor.selection(), None);
        }
    }
}

#[test]
fn out_of_range_edits_change_nothing() {
    let mut editor = open("one\ntwo");
    assert!(!editor.replace_text(1, 1, 3, 1, "x"));
    assert!(!editor.delete_range(2, 1, 1, 1));
    assert!(!editor.set_cursor(2, 5));
    assert_eq!(editor.get_content().as_deref(), Some("one\ntwo"));
    assert!(editor.take_events().is_empty());
}
