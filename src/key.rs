//! Virtual-key codes.
//!
//! Base keys are opaque integer codes. The helpers here only give common
//! codes a name so chords can be written and printed as text.

use anyhow::{anyhow, Result};

/// A raw platform virtual-key code.
pub type KeyCode = u32;

pub const BACKSPACE: KeyCode = 0x08;
pub const TAB: KeyCode = 0x09;
pub const ENTER: KeyCode = 0x0D;
pub const PAUSE: KeyCode = 0x13;
pub const CAPS_LOCK: KeyCode = 0x14;
pub const ESCAPE: KeyCode = 0x1B;
pub const SPACE: KeyCode = 0x20;
pub const PAGE_UP: KeyCode = 0x21;
pub const PAGE_DOWN: KeyCode = 0x22;
pub const END: KeyCode = 0x23;
pub const HOME: KeyCode = 0x24;
pub const LEFT: KeyCode = 0x25;
pub const UP: KeyCode = 0x26;
pub const RIGHT: KeyCode = 0x27;
pub const DOWN: KeyCode = 0x28;
pub const PRINT_SCREEN: KeyCode = 0x2C;
pub const INSERT: KeyCode = 0x2D;
pub const DELETE: KeyCode = 0x2E;
pub const F1: KeyCode = 0x70;
pub const F24: KeyCode = 0x87;
pub const NUM_LOCK: KeyCode = 0x90;
pub const SCROLL_LOCK: KeyCode = 0x91;

const NAMED: &[(KeyCode, &str)] = &[
    (BACKSPACE, "Backspace"),
    (TAB, "Tab"),
    (ENTER, "Enter"),
    (PAUSE, "Pause"),
    (CAPS_LOCK, "CapsLock"),
    (ESCAPE, "Escape"),
    (SPACE, "Space"),
    (PAGE_UP, "PageUp"),
    (PAGE_DOWN, "PageDown"),
    (END, "End"),
    (HOME, "Home"),
    (LEFT, "Left"),
    (UP, "Up"),
    (RIGHT, "Right"),
    (DOWN, "Down"),
    (PRINT_SCREEN, "PrintScreen"),
    (INSERT, "Insert"),
    (DELETE, "Delete"),
    (NUM_LOCK, "NumLock"),
    (SCROLL_LOCK, "ScrollLock"),
];

/// Parse a key from a string like "A", "F8", "ScrollLock" or "0x91".
pub fn parse_key(s: &str) -> Result<KeyCode> {
    let upper = s.trim().to_uppercase();

    if let Some(hex) = upper.strip_prefix("0X") {
        return KeyCode::from_str_radix(hex, 16).map_err(|_| anyhow!("Invalid key code: {}", s));
    }

    let mut chars = upper.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            return Ok(c as KeyCode);
        }
    }

    if let Some(n) = upper.strip_prefix('F').and_then(|n| n.parse::<KeyCode>().ok()) {
        if (1..=24).contains(&n) {
            return Ok(F1 + n - 1);
        }
    }

    let alias = match upper.as_str() {
        "RETURN" => Some(ENTER),
        "ESC" => Some(ESCAPE),
        "DEL" => Some(DELETE),
        "SCROLL_LOCK" => Some(SCROLL_LOCK),
        "PGUP" => Some(PAGE_UP),
        "PGDN" => Some(PAGE_DOWN),
        _ => None,
    };
    if let Some(code) = alias {
        return Ok(code);
    }

    NAMED
        .iter()
        .find(|(_, name)| name.to_uppercase() == upper)
        .map(|(code, _)| *code)
        .ok_or_else(|| anyhow!("Unknown key: {}", s))
}

/// The display name of a key code, if it has one.
pub fn key_name(code: KeyCode) -> Option<String> {
    match code {
        0x30..=0x39 | 0x41..=0x5A => char::from_u32(code).map(String::from),
        F1..=F24 => Some(format!("F{}", code - F1 + 1)),
        _ => NAMED
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| name.to_string()),
    }
}
