//! Key combinations, shortcut actions and the binding registry.
//!
//! Bindings are owned by an explicit [`ShortcutRegistry`] instance passed
//! to whoever needs to register or revoke them; there is no process-wide
//! singleton holding action handles.

mod combo;
mod registry;
mod set;


pub use combo::{ComboParseError, KeyCombination};
pub use registry::{
    DispatchTable, HostError, HostHandle, ShortcutCallback, ShortcutHost, ShortcutRegistry,
    validate_binding,
};
pub use set::{ShortcutAction, ShortcutSet};

use thiserror::Error;

/// Why a candidate binding was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShortcutError {
    /// The combination text could not be parsed at all.
    #[error("Shortcut {combination:?} could not be parsed: {source}")]
    Unparseable {
        /// The raw combination text as entered or stored.
        combination: String,
        #[source]
        source: ComboParseError,
    },
    /// The combination carries no modifier key.
    #[error("Shortcut {combination} must include a modifier key (Ctrl, Alt, Shift or Meta)")]
    MissingModifier {
        /// Canonical form of the rejected combination.
        combination: String,
    },
    /// The combination is already bound to a different action.
    #[error("Shortcut {combination} is already used by {owner}")]
    Duplicate {
        /// Canonical form of the colliding combination.
        combination: String,
        /// The action that already holds the combination.
        owner: ShortcutAction,
    },
}

/// A rejected binding found while validating a whole candidate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The action whose binding was rejected.
    pub action: ShortcutAction,
    /// Why it was rejected.
    pub error: ShortcutError,
}
