//! Global shortcut value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::ShortcutParseError;

/// Shortcut the backend registers when none is configured
pub const DEFAULT_SHORTCUT: &str = "Ctrl+Shift+V";

/// Modifier keys held together with the main key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const fn is_empty(&self) -> bool {
        !(self.ctrl || self.shift || self.alt || self.meta)
    }
}

/// A validated key combination such as `Ctrl+Shift+V`.
///
/// Parsing is case-insensitive and accepts the aliases the backend accepts;
/// `Display` renders the canonical spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
    modifiers: Modifiers,
    key: &'static str,
}

impl Shortcut {
    /// Modifier keys of this shortcut
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Canonical name of the main key
    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl Default for Shortcut {
    fn default() -> Self {
        Self {
            modifiers: Modifiers {
                ctrl: true,
                shift: true,
                ..Default::default()
            },
            key: "V",
        }
    }
}

const LETTERS: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];
const DIGITS: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
const FUNCTION_KEYS: &[&str] = &[
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];

/// Resolve an upper-cased token to its canonical key name
fn canonical_key(token: &str) -> Option<&'static str> {
    if let Some(k) = LETTERS
        .iter()
        .chain(DIGITS)
        .chain(FUNCTION_KEYS)
        .find(|k| **k == token)
    {
        return Some(*k);
    }

    let key = match token {
        "SPACE" => "Space",
        "ENTER" | "RETURN" => "Enter",
        "TAB" => "Tab",
        "ESCAPE" | "ESC" => "Escape",
        "BACKSPACE" => "Backspace",
        "DELETE" | "DEL" => "Delete",
        "INSERT" | "INS" => "Insert",
        "HOME" => "Home",
        "END" => "End",
        "PAGEUP" => "PageUp",
        "PAGEDOWN" => "PageDown",
        "UP" | "ARROWUP" => "ArrowUp",
        "DOWN" | "ARROWDOWN" => "ArrowDown",
        "LEFT" | "ARROWLEFT" => "ArrowLeft",
        "RIGHT" | "ARROWRIGHT" => "ArrowRight",
        _ => return None,
    };
    Some(key)
}

impl FromStr for Shortcut {
    type Err = ShortcutParseError;

    /// Parse strings like "Ctrl+Shift+V", "alt+f4" or "Escape"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut key = None;

        for part in s.split('+').map(str::trim) {
            let token = part.to_uppercase();
            match token.as_str() {
                "CTRL" | "CONTROL" => modifiers.ctrl = true,
                "SHIFT" => modifiers.shift = true,
                "ALT" => modifiers.alt = true,
                "META" | "SUPER" | "CMD" | "COMMAND" => modifiers.meta = true,
                other => {
                    let resolved = canonical_key(other)
                        .ok_or_else(|| ShortcutParseError::UnknownKey(part.to_string()))?;
                    if key.replace(resolved).is_some() {
                        return Err(ShortcutParseError::MultipleKeys(s.to_string()));
                    }
                }
            }
        }

        let key = key.ok_or_else(|| ShortcutParseError::MissingKey(s.to_string()))?;
        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, label) in [
            (m.ctrl, "Ctrl"),
            (m.shift, "Shift"),
            (m.alt, "Alt"),
            (m.meta, "Meta"),
        ] {
            if held {
                write!(f, "{}+", label)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_shortcut() {
        let shortcut: Shortcut = DEFAULT_SHORTCUT.parse().unwrap();
        assert_eq!(shortcut, Shortcut::default());
        assert_eq!(shortcut.to_string(), "Ctrl+Shift+V");
    }

    #[test]
    fn parses_case_insensitive_with_aliases() {
        let shortcut: Shortcut = " control + cmd + pageup ".parse().unwrap();
        assert!(shortcut.modifiers().ctrl);
        assert!(shortcut.modifiers().meta);
        assert_eq!(shortcut.key(), "PageUp");
        assert_eq!(shortcut.to_string(), "Ctrl+Meta+PageUp");
    }

    #[test]
    fn key_without_modifiers() {
        let shortcut: Shortcut = "esc".parse().unwrap();
        assert!(shortcut.modifiers().is_empty());
        assert_eq!(shortcut.to_string(), "Escape");
    }

    #[test]
    fn function_and_digit_keys() {
        assert_eq!("alt+f4".parse::<Shortcut>().unwrap().to_string(), "Alt+F4");
        assert_eq!("Shift+7".parse::<Shortcut>().unwrap().to_string(), "Shift+7");
        assert_eq!("ctrl+left".parse::<Shortcut>().unwrap().key(), "ArrowLeft");
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!("".parse::<Shortcut>(), Err(ShortcutParseError::Empty));
        assert_eq!("  ".parse::<Shortcut>(), Err(ShortcutParseError::Empty));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert_eq!(
            "Ctrl+Hyper".parse::<Shortcut>(),
            Err(ShortcutParseError::UnknownKey("Hyper".into()))
        );
    }

    #[test]
    fn modifiers_only_is_rejected() {
        assert!(matches!(
            "Ctrl+Shift".parse::<Shortcut>(),
            Err(ShortcutParseError::MissingKey(_))
        ));
    }

    #[test]
    fn two_keys_are_rejected() {
        assert!(matches!(
            "Ctrl+A+B".parse::<Shortcut>(),
            Err(ShortcutParseError::MultipleKeys(_))
        ));
    }
}
