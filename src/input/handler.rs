use crate::editor::Editor;

use super::key::{KeySpec, NamedKey};

/// Built-in action for a key nobody claimed. Returns whether anything ran.
///
/// Only editing keys have defaults, and only while a buffer is open; the
/// browser side has no built-ins of its own.
pub fn apply_default(editor: &mut Editor, key: KeySpec) -> bool {
    if !editor.is_open() {
        return false;
    }
    match key {
        KeySpec::Named(named) => match named {
            NamedKey::Left => editor.move_left(),
            NamedKey::Right => editor.move_right(),
            NamedKey::Up => editor.move_up(),
            NamedKey::Down => editor.move_down(),
            NamedKey::Home => editor.move_to_line_start(),
            NamedKey::End => editor.move_to_line_end(),
            NamedKey::Backspace => {
                editor.delete_backward();
                true
            }
            NamedKey::Delete => {
                editor.delete_forward();
                true
            }
            NamedKey::Enter => {
                editor.insert_text("\n");
                true
            }
            NamedKey::Tab => {
                editor.insert_text("\t");
                true
            }
            NamedKey::Esc => false,
        },
        KeySpec::Char(c) => {
            let mut buf = [0u8; 4];
            editor.insert_text(c.encode_utf8(&mut buf));
            true
        }
        _ => false,
    }
}
