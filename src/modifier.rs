//! Modifier keys and the set type used to track them.

use crate::key::KeyCode;

/// A logical modifier key, independent of its left/right physical variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKey {
    Alt,
    Control,
    Shift,
    /// The Windows/Super/Meta key.
    Super,
}

impl ModifierKey {
    /// All modifier keys, in flag order.
    pub const ALL: [ModifierKey; 4] = [
        ModifierKey::Alt,
        ModifierKey::Control,
        ModifierKey::Shift,
        ModifierKey::Super,
    ];

    /// The single-bit flag value for this modifier.
    pub fn flag(self) -> Modifiers {
        match self {
            ModifierKey::Alt => Modifiers::ALT,
            ModifierKey::Control => Modifiers::CONTROL,
            ModifierKey::Shift => Modifiers::SHIFT,
            ModifierKey::Super => Modifiers::SUPER,
        }
    }
}

impl std::fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModifierKey::Alt => write!(f, "Alt"),
            ModifierKey::Control => write!(f, "Ctrl"),
            ModifierKey::Shift => write!(f, "Shift"),
            ModifierKey::Super => write!(f, "Super"),
        }
    }
}

bitflags::bitflags! {
    /// A set of modifier keys.
    ///
    /// Flags combine with `|`, so `Modifiers::CONTROL | Modifiers::SHIFT` is
    /// the compact form of `{Control, Shift}`. Equality is set equality.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const ALT = 0b0001;
        const CONTROL = 0b0010;
        const SHIFT = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Decompose a compact bitmask into the modifiers it names.
    ///
    /// Bits that do not correspond to a modifier are ignored.
    pub fn expand(bits: u32) -> Self {
        ModifierKey::ALL
            .into_iter()
            .filter(|key| bits & u32::from(key.flag().bits()) != 0)
            .collect()
    }

    /// Iterate the individual modifier keys in this set.
    pub fn keys(self) -> impl Iterator<Item = ModifierKey> {
        ModifierKey::ALL
            .into_iter()
            .filter(move |key| self.contains(key.flag()))
    }
}

impl From<ModifierKey> for Modifiers {
    fn from(key: ModifierKey) -> Self {
        key.flag()
    }
}

impl FromIterator<ModifierKey> for Modifiers {
    fn from_iter<I: IntoIterator<Item = ModifierKey>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Modifiers::empty(), |set, key| set | key.flag())
    }
}

impl<const N: usize> From<[ModifierKey; N]> for Modifiers {
    fn from(keys: [ModifierKey; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl From<&[ModifierKey]> for Modifiers {
    fn from(keys: &[ModifierKey]) -> Self {
        keys.iter().copied().collect()
    }
}

impl From<Vec<ModifierKey>> for Modifiers {
    fn from(keys: Vec<ModifierKey>) -> Self {
        keys.into_iter().collect()
    }
}

/// Map a raw virtual-key code to the modifier it represents.
///
/// Left, right and generic variants all map to the same logical modifier.
pub fn classify(code: KeyCode) -> Option<ModifierKey> {
    match code {
        0x10 | 0xA0 | 0xA1 => Some(ModifierKey::Shift),
        0x11 | 0xA2 | 0xA3 => Some(ModifierKey::Control),
        0x12 | 0xA4 | 0xA5 => Some(ModifierKey::Alt),
        0x5B | 0x5C => Some(ModifierKey::Super),
        _ => None,
    }
}

/// Decompose a compact flags value into its modifier keys.
pub fn expand(bits: u32) -> Modifiers {
    Modifiers::expand(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_left_right_generic() {
        for code in [0x10, 0xA0, 0xA1] {
            assert_eq!(classify(code), Some(ModifierKey::Shift));
        }
        for code in [0x11, 0xA2, 0xA3] {
            assert_eq!(classify(code), Some(ModifierKey::Control));
        }
        for code in [0x12, 0xA4, 0xA5] {
            assert_eq!(classify(code), Some(ModifierKey::Alt));
        }
        for code in [0x5B, 0x5C] {
            assert_eq!(classify(code), Some(ModifierKey::Super));
        }
    }

    #[test]
    fn test_classify_non_modifier() {
        assert_eq!(classify(0x41), None);
        assert_eq!(classify(0x91), None);
        assert_eq!(classify(0), None);
        assert_eq!(classify(u32::MAX), None);
    }

    #[test]
    fn test_expand_flags() {
        let set = expand(0b0110);
        assert!(set.contains(ModifierKey::Control.flag()));
        assert!(set.contains(ModifierKey::Shift.flag()));
        assert!(!set.contains(ModifierKey::Alt.flag()));
        assert!(!set.contains(ModifierKey::Super.flag()));
        assert_eq!(
            set.keys().collect::<Vec<_>>(),
            vec![ModifierKey::Control, ModifierKey::Shift]
        );
    }

    #[test]
    fn test_expand_ignores_unknown_bits() {
        assert_eq!(expand(0b1_0000_0001), Modifiers::ALT);
        assert_eq!(expand(0), Modifiers::empty());
    }

    #[test]
    fn test_collect_deduplicates() {
        let set: Modifiers = [ModifierKey::Shift, ModifierKey::Shift, ModifierKey::Alt].into();
        assert_eq!(set, Modifiers::SHIFT | Modifiers::ALT);
        assert_eq!(set.keys().count(), 2);
    }
}
