#![forbid(unsafe_code)]

//! Canonical input vocabulary.
//!
//! Hosts translate their native keyboard and pointer events into these types
//! before handing them to a controller. Only the keys the dashboard widgets
//! react to are modelled; anything else maps to [`Key::Other`].

use serde::{Deserialize, Serialize};

/// A key press relevant to the dashboard controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "key", content = "char", rename_all = "snake_case")]
pub enum Key {
    /// A printable character.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Tab key.
    Tab,

    /// Any key without a dedicated variant.
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` string onto the vocabulary.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Backspace" => Self::Backspace,
            "ArrowUp" | "Up" => Self::Up,
            "ArrowDown" | "Down" => Self::Down,
            "Tab" => Self::Tab,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

/// Pointer button identity, following DOM `PointerEvent.button` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl PointerButton {
    /// Map a DOM `PointerEvent.button` ordinal.
    #[must_use]
    pub const fn from_dom_button(button: u8) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}
