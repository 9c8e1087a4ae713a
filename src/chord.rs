//! Chord definition: a base key plus the modifiers that must be held.

use crate::key::{key_name, parse_key, KeyCode};
use crate::modifier::{ModifierKey, Modifiers};
use anyhow::{anyhow, Result};

/// A base key code together with a set of modifier keys.
///
/// Two chords are equal when they have the same key code and the same
/// modifier set, regardless of the order the modifiers were given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    key: KeyCode,
    modifiers: Modifiers,
}

impl Chord {
    /// Create a new chord with no modifiers.
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    /// Create a new chord with the given modifiers.
    pub fn with_modifiers(key: KeyCode, modifiers: impl Into<Modifiers>) -> Self {
        Self {
            key,
            modifiers: modifiers.into(),
        }
    }

    /// Create a chord from any sequence of modifier keys. Duplicates collapse.
    pub fn from_keys<I>(modifiers: I, key: KeyCode) -> Self
    where
        I: IntoIterator<Item = ModifierKey>,
    {
        Self {
            key,
            modifiers: modifiers.into_iter().collect(),
        }
    }

    /// The base key code.
    pub fn key(&self) -> KeyCode {
        self.key
    }

    /// The modifiers that must be held.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Check whether this chord satisfies `other`.
    ///
    /// True when both share a key code and every modifier `other` needs is
    /// present here. Extra modifiers in `self` are allowed.
    pub fn contains(&self, other: &Chord) -> bool {
        self.key == other.key && self.modifiers.contains(other.modifiers)
    }
}

impl std::fmt::Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        for modifier in [
            ModifierKey::Control,
            ModifierKey::Alt,
            ModifierKey::Shift,
            ModifierKey::Super,
        ] {
            if self.modifiers.contains(modifier.flag()) {
                parts.push(modifier.to_string());
            }
        }
        parts.push(key_name(self.key).unwrap_or_else(|| format!("0x{:02X}", self.key)));
        write!(f, "{}", parts.join("+"))
    }
}

impl std::str::FromStr for Chord {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_chord(s)
    }
}

/// Parse a chord string like "Ctrl+Shift+A" or "ScrollLock" into a Chord.
pub fn parse_chord(s: &str) -> Result<Chord> {
    let parts: Vec<&str> = s.split('+').map(str::trim).collect();
    let mut modifiers = Modifiers::empty();

    let Some((key_str, modifier_parts)) = parts.split_last() else {
        return Err(anyhow!("Empty chord string"));
    };

    for part in modifier_parts {
        let modifier = match part.to_uppercase().as_str() {
            "SHIFT" => ModifierKey::Shift,
            "CTRL" | "CONTROL" => ModifierKey::Control,
            "ALT" => ModifierKey::Alt,
            "SUPER" | "WIN" | "META" => ModifierKey::Super,
            _ => return Err(anyhow!("Unknown modifier: {}", part)),
        };
        modifiers |= modifier.flag();
    }

    let key = parse_key(key_str)?;

    Ok(Chord { key, modifiers })
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: KeyCode = 0x41;
    const B: KeyCode = 0x42;

    #[test]
    fn test_equality_ignores_order() {
        let a = Chord::from_keys([ModifierKey::Control, ModifierKey::Shift], A);
        let b = Chord::from_keys([ModifierKey::Shift, ModifierKey::Control], A);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(a, a);
    }

    #[test]
    fn test_equality_requires_same_key_and_set() {
        let ctrl_a = Chord::with_modifiers(A, ModifierKey::Control);
        assert_ne!(ctrl_a, Chord::with_modifiers(B, ModifierKey::Control));
        assert_ne!(ctrl_a, Chord::with_modifiers(A, Modifiers::CONTROL | Modifiers::SHIFT));
        assert_ne!(ctrl_a, Chord::new(A));
    }

    #[test]
    fn test_contains_is_reflexive() {
        let chord = Chord::with_modifiers(A, Modifiers::ALT | Modifiers::SUPER);
        assert!(chord.contains(&chord));
        assert!(Chord::new(A).contains(&Chord::new(A)));
    }

    #[test]
    fn test_contains_tolerates_extra_modifiers() {
        let held = Chord::with_modifiers(A, Modifiers::CONTROL | Modifiers::SHIFT | Modifiers::ALT);
        assert!(held.contains(&Chord::with_modifiers(A, Modifiers::CONTROL | Modifiers::SHIFT)));
        assert!(held.contains(&Chord::with_modifiers(A, ModifierKey::Control)));
        assert!(held.contains(&Chord::new(A)));
    }

    #[test]
    fn test_contains_is_not_symmetric() {
        let ctrl = Chord::with_modifiers(A, ModifierKey::Control);
        let ctrl_shift = Chord::with_modifiers(A, Modifiers::CONTROL | Modifiers::SHIFT);
        assert!(!ctrl.contains(&ctrl_shift));
        assert!(ctrl_shift.contains(&ctrl));
    }

    #[test]
    fn test_contains_requires_same_key() {
        let all = Modifiers::all();
        assert!(!Chord::with_modifiers(A, all).contains(&Chord::new(B)));
        assert!(!Chord::new(A).contains(&Chord::new(B)));
    }

    #[test]
    fn test_accessors() {
        let chord = Chord::from_keys([ModifierKey::Super], B);
        assert_eq!(chord.key(), B);
        assert_eq!(chord.modifiers(), Modifiers::SUPER);
        assert!(Chord::new(A).modifiers().is_empty());
    }

    #[test]
    fn test_parse_simple_key() {
        let chord = parse_chord("ScrollLock").unwrap();
        assert_eq!(chord.key(), 0x91);
        assert!(chord.modifiers().is_empty());
    }

    #[test]
    fn test_parse_with_multiple_modifiers() {
        let chord = parse_chord("Ctrl+Shift+A").unwrap();
        assert_eq!(chord.key(), A);
        assert_eq!(chord.modifiers(), Modifiers::CONTROL | Modifiers::SHIFT);
    }

    #[test]
    fn test_parse_case_insensitive() {
        let chord: Chord = "control + win + f8".parse().unwrap();
        assert_eq!(chord.key(), 0x77);
        assert_eq!(chord.modifiers(), Modifiers::CONTROL | Modifiers::SUPER);
    }

    #[test]
    fn test_parse_unknown_modifier() {
        assert!(parse_chord("Hyper+F8").is_err());
    }

    #[test]
    fn test_parse_unknown_key() {
        assert!(parse_chord("Ctrl+Nope").is_err());
        assert!(parse_chord("").is_err());
    }

    #[test]
    fn test_display() {
        let chord = Chord::from_keys([ModifierKey::Shift, ModifierKey::Control], A);
        assert_eq!(chord.to_string(), "Ctrl+Shift+A");
        assert_eq!(Chord::new(0xFF).to_string(), "0xFF");
        assert_eq!(parse_chord("Alt+Super+F4").unwrap().to_string(), "Alt+Super+F4");
    }
}
