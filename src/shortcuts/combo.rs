use std::fmt;

use thiserror::Error;

/// A parsed key combination: modifier flags plus a single key.
///
/// Combinations compare by their canonical string form, so `"ctrl+alt+m"`
/// and `"Ctrl+Alt+M"` are the same binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombination {
    /// Control modifier.
    pub ctrl: bool,
    /// Alt modifier.
    pub alt: bool,
    /// Shift modifier.
    pub shift: bool,
    /// Meta / Cmd / Win modifier.
    pub meta: bool,
    key: String,
}

/// Errors raised while parsing a combination string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComboParseError {
    /// The text holds modifiers only, or nothing at all.
    #[error("the combination names no key")]
    MissingKey,
    /// The text names more than one non-modifier key.
    #[error("the combination names more than one key")]
    MultipleKeys,
}

impl KeyCombination {
    /// Parse a `"Ctrl+Alt+M"`-style combination string.
    ///
    /// Modifier tokens are matched case-insensitively (`control`, `cmd`,
    /// `win`, `super` and `option` aliases included); exactly one remaining
    /// token is taken as the key.
    pub fn parse(text: &str) -> Result<Self, ComboParseError> {
        let mut combination = Self {
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
            key: String::new(),
        };
        for token in text.split('+').map(str::trim).filter(|t| !t.is_empty()) {
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => combination.ctrl = true,
                "alt" | "option" => combination.alt = true,
                "shift" => combination.shift = true,
                "meta" | "cmd" | "win" | "super" => combination.meta = true,
                _ => {
                    if !combination.key.is_empty() {
                        return Err(ComboParseError::MultipleKeys);
                    }
                    combination.key = canonical_key(token);
                }
            }
        }
        if combination.key.is_empty() {
            return Err(ComboParseError::MissingKey);
        }
        Ok(combination)
    }

    /// The non-modifier key, in canonical form.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether at least one of Ctrl, Alt, Shift or Meta is held.
    pub fn has_modifier(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.meta
    }

    /// Canonical string form: modifiers in Ctrl, Alt, Shift, Meta order,
    /// then the key, joined with `+`.
    pub fn canonical(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.meta {
            parts.push("Meta");
        }
        parts.push(&self.key);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

fn canonical_key(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
    }
}
