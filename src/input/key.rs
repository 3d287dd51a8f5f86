//! Key-spec strings as scripts write them: `^K`, `^_K`, `F8`, `M-d`,
//! `KEY_UP`, `Tab`, or a single printable character.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    Tab,
    Enter,
    Esc,
}

impl NamedKey {
    const ALL: [NamedKey; 11] = [
        NamedKey::Up,
        NamedKey::Down,
        NamedKey::Left,
        NamedKey::Right,
        NamedKey::Home,
        NamedKey::End,
        NamedKey::Backspace,
        NamedKey::Delete,
        NamedKey::Tab,
        NamedKey::Enter,
        NamedKey::Esc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NamedKey::Up => "KEY_UP",
            NamedKey::Down => "KEY_DOWN",
            NamedKey::Left => "KEY_LEFT",
            NamedKey::Right => "KEY_RIGHT",
            NamedKey::Home => "KEY_HOME",
            NamedKey::End => "KEY_END",
            NamedKey::Backspace => "KEY_BACKSPACE",
            NamedKey::Delete => "KEY_DELETE",
            NamedKey::Tab => "Tab",
            NamedKey::Enter => "Enter",
            NamedKey::Esc => "Esc",
        }
    }

    fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == s)
    }
}

/// A single key chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySpec {
    /// A plain printable character
    Char(char),
    /// `^X`; always stored upper case
    Ctrl(char),
    /// `^_X`; always stored upper case
    CtrlShift(char),
    /// `M-x`
    Meta(char),
    /// `F1` to `F12`
    Function(u8),
    Named(NamedKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key spec")]
    Empty,
    #[error("invalid control key `{0}`, expected ^A..^Z")]
    BadControl(String),
    #[error("invalid function key `{0}`, expected F1..F12")]
    BadFunction(String),
    #[error("invalid meta key `{0}`, expected M- followed by one character")]
    BadMeta(String),
    #[error("unknown key `{0}`")]
    Unknown(String),
}

impl FromStr for KeySpec {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }
        if let Some(named) = NamedKey::from_name(s) {
            return Ok(KeySpec::Named(named));
        }

        let chars: Vec<char> = s.chars().collect();
        match chars.as_slice() {
            [c] if !c.is_control() => Ok(KeySpec::Char(*c)),
            ['^', '_', letter] => control_letter(*letter)
                .map(KeySpec::CtrlShift)
                .ok_or_else(|| KeyParseError::BadControl(s.to_string())),
            ['^', letter] => control_letter(*letter)
                .map(KeySpec::Ctrl)
                .ok_or_else(|| KeyParseError::BadControl(s.to_string())),
            ['^', ..] => Err(KeyParseError::BadControl(s.to_string())),
            ['M', '-', c] if !c.is_control() => Ok(KeySpec::Meta(*c)),
            ['M', '-', ..] => Err(KeyParseError::BadMeta(s.to_string())),
            ['F', digits @ ..] if digits.iter().all(char::is_ascii_digit) => {
                let n: String = digits.iter().collect();
                match n.parse::<u8>() {
                    Ok(n) if (1..=12).contains(&n) => Ok(KeySpec::Function(n)),
                    _ => Err(KeyParseError::BadFunction(s.to_string())),
                }
            }
            _ => Err(KeyParseError::Unknown(s.to_string())),
        }
    }
}

fn control_letter(c: char) -> Option<char> {
    let upper = c.to_ascii_uppercase();
    upper.is_ascii_uppercase().then_some(upper)
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySpec::Char(c) => write!(f, "{c}"),
            KeySpec::Ctrl(c) => write!(f, "^{c}"),
            KeySpec::CtrlShift(c) => write!(f, "^_{c}"),
            KeySpec::Meta(c) => write!(f, "M-{c}"),
            KeySpec::Function(n) => write!(f, "F{n}"),
            KeySpec::Named(k) => f.write_str(k.name()),
        }
    }
}

impl KeySpec {
    /// Translate a terminal key event; keys with no spelling return `None`
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        let mods = event.modifiers;
        let spec = match event.code {
            KeyCode::F(n) if (1..=12).contains(&n) => KeySpec::Function(n),
            KeyCode::Char(c) if mods.contains(KeyModifiers::CONTROL) => {
                let letter = control_letter(c)?;
                if mods.contains(KeyModifiers::SHIFT) {
                    KeySpec::CtrlShift(letter)
                } else {
                    KeySpec::Ctrl(letter)
                }
            }
            KeyCode::Char(c) if mods.contains(KeyModifiers::ALT) => KeySpec::Meta(c),
            KeyCode::Char(c) => KeySpec::Char(c),
            KeyCode::Up => KeySpec::Named(NamedKey::Up),
            KeyCode::Down => KeySpec::Named(NamedKey::Down),
            KeyCode::Left => KeySpec::Named(NamedKey::Left),
            KeyCode::Right => KeySpec::Named(NamedKey::Right),
            KeyCode::Home => KeySpec::Named(NamedKey::Home),
            KeyCode::End => KeySpec::Named(NamedKey::End),
            KeyCode::Backspace => KeySpec::Named(NamedKey::Backspace),
            KeyCode::Delete => KeySpec::Named(NamedKey::Delete),
            KeyCode::Tab => KeySpec::Named(NamedKey::Tab),
            KeyCode::Enter => KeySpec::Named(NamedKey::Enter),
            KeyCode::Esc => KeySpec::Named(NamedKey::Esc),
            _ => return None,
        };
        Some(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> KeySpec {
        s.parse().unwrap()
    }

    #[test]
    fn parses_control_keys_upper_cased() {
        assert_eq!(parse("^K"), KeySpec::Ctrl('K'));
        assert_eq!(parse("^k"), KeySpec::Ctrl('K'));
        assert_eq!(parse("^_w"), KeySpec::CtrlShift('W'));
        assert!(matches!("^1".parse::<KeySpec>(), Err(KeyParseError::BadControl(_))));
        assert!(matches!("^AB".parse::<KeySpec>(), Err(KeyParseError::BadControl(_))));
    }

    #[test]
    fn lone_caret_is_a_plain_char() {
        assert_eq!(parse("^"), KeySpec::Char('^'));
    }

    #[test]
    fn parses_function_keys() {
        assert_eq!(parse("F1"), KeySpec::Function(1));
        assert_eq!(parse("F12"), KeySpec::Function(12));
        assert_eq!(parse("F"), KeySpec::Char('F'));
        assert!(matches!("F0".parse::<KeySpec>(), Err(KeyParseError::BadFunction(_))));
        assert!(matches!("F13".parse::<KeySpec>(), Err(KeyParseError::BadFunction(_))));
    }

    #[test]
    fn parses_meta_keys() {
        assert_eq!(parse("M-d"), KeySpec::Meta('d'));
        assert_eq!(parse("M-D"), KeySpec::Meta('D'));
        assert_eq!(parse("M"), KeySpec::Char('M'));
        assert!(matches!("M-dd".parse::<KeySpec>(), Err(KeyParseError::BadMeta(_))));
        assert!(matches!("M-\n".parse::<KeySpec>(), Err(KeyParseError::BadMeta(_))));
        assert!(matches!("M-\u{1b}".parse::<KeySpec>(), Err(KeyParseError::BadMeta(_))));
    }

    #[test]
    fn parses_named_keys() {
        assert_eq!(parse("KEY_UP"), KeySpec::Named(NamedKey::Up));
        assert_eq!(parse("Tab"), KeySpec::Named(NamedKey::Tab));
        assert_eq!(parse("Enter"), KeySpec::Named(NamedKey::Enter));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!("".parse::<KeySpec>(), Err(KeyParseError::Empty));
        assert!(matches!("hello".parse::<KeySpec>(), Err(KeyParseError::Unknown(_))));
        assert!(matches!("\u{7}".parse::<KeySpec>(), Err(KeyParseError::Unknown(_))));
    }

    #[test]
    fn display_is_canonical_spelling() {
        for spec in ["^K", "^_Q", "F8", "M-d", "KEY_BACKSPACE", "x", "Esc"] {
            assert_eq!(parse(spec).to_string(), spec);
        }
        assert_eq!(parse("^x").to_string(), "^X");
    }

    #[test]
    fn converts_terminal_events() {
        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(KeySpec::from_event(&ctrl_k), Some(KeySpec::Ctrl('K')));

        let ctrl_shift = KeyEvent::new(
            KeyCode::Char('A'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        assert_eq!(KeySpec::from_event(&ctrl_shift), Some(KeySpec::CtrlShift('A')));

        let alt_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::ALT);
        assert_eq!(KeySpec::from_event(&alt_d), Some(KeySpec::Meta('d')));

        let f8 = KeyEvent::new(KeyCode::F(8), KeyModifiers::NONE);
        assert_eq!(KeySpec::from_event(&f8), Some(KeySpec::Function(8)));

        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(KeySpec::from_event(&up), Some(KeySpec::Named(NamedKey::Up)));

        let f20 = KeyEvent::new(KeyCode::F(20), KeyModifiers::NONE);
        assert_eq!(KeySpec::from_event(&f20), None);
    }
}
