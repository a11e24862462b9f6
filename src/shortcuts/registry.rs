use std::rc::Rc;

use thiserror::Error;
use tracing::warn;

use super::{Conflict, KeyCombination, ShortcutAction, ShortcutError, ShortcutSet};

/// Zero-argument callback handed to the shortcut host.
pub type ShortcutCallback = Rc<dyn Fn()>;

/// Opaque handle for a binding registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostHandle(pub u64);

/// Failure reported by the shortcut host on registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Shortcut host rejected {combination}: {message}")]
pub struct HostError {
    /// Canonical form of the combination the host refused.
    pub combination: String,
    /// Host-provided failure description.
    pub message: String,
}

/// The host application's global-shortcut surface.
///
/// Registration hands over a key combination and a zero-argument callback;
/// the returned handle supports later disabling and removal.
pub trait ShortcutHost {
    /// Register a combination; the callback fires on every press.
    fn install(
        &mut self,
        combination: &KeyCombination,
        callback: ShortcutCallback,
    ) -> Result<HostHandle, HostError>;
    /// Enable or disable a registered binding.
    fn set_enabled(&mut self, handle: HostHandle, enabled: bool);
    /// Release a registered binding.
    fn remove(&mut self, handle: HostHandle);
}

/// Maps each shortcut action to the callback that should run for it.
#[derive(Default)]
pub struct DispatchTable {
    handlers: Vec<(ShortcutAction, ShortcutCallback)>,
}

impl DispatchTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the handler for an action.
    pub fn with(mut self, action: ShortcutAction, callback: impl Fn() + 'static) -> Self {
        self.handlers.retain(|(existing, _)| *existing != action);
        self.handlers.push((action, Rc::new(callback)));
        self
    }

    /// The handler for an action, if one was registered.
    pub fn get(&self, action: ShortcutAction) -> Option<ShortcutCallback> {
        self.handlers
            .iter()
            .find(|(existing, _)| *existing == action)
            .map(|(_, callback)| Rc::clone(callback))
    }
}

struct LiveBinding {
    action: ShortcutAction,
    combination: KeyCombination,
    handle: HostHandle,
}

/// Owns the set of active key-bindings and the handles registered with the
/// shortcut host.
pub struct ShortcutRegistry {
    host: Box<dyn ShortcutHost>,
    bindings: ShortcutSet,
    live: Vec<LiveBinding>,
}

impl ShortcutRegistry {
    /// Registry over a host with nothing bound yet.
    pub fn new(host: Box<dyn ShortcutHost>) -> Self {
        Self {
            host,
            bindings: ShortcutSet::default(),
            live: Vec::new(),
        }
    }

    /// The currently owned binding set.
    pub fn bindings(&self) -> &ShortcutSet {
        &self.bindings
    }

    /// Actions with a binding currently registered at the host.
    pub fn live_bindings(&self) -> impl Iterator<Item = (ShortcutAction, &KeyCombination)> {
        self.live
            .iter()
            .map(|binding| (binding.action, &binding.combination))
    }

    /// Validate a candidate binding for an action: it must parse, carry a
    /// modifier, and not collide with a different action's binding.
    pub fn validate(
        &self,
        action: ShortcutAction,
        text: &str,
    ) -> Result<KeyCombination, ShortcutError> {
        validate_binding(&self.bindings, action, text)
    }

    /// Bind an action to a combination, storing its canonical form.
    /// Rejected bindings leave the registry untouched.
    pub fn bind(&mut self, action: ShortcutAction, text: &str) -> Result<(), ShortcutError> {
        let combination = self.validate(action, text)?;
        self.bindings.set(action, combination.canonical());
        Ok(())
    }

    /// Remove an action's binding from the owned set.
    pub fn unbind(&mut self, action: ShortcutAction) {
        self.bindings.clear(action);
    }

    /// Remove every binding from the owned set.
    pub fn clear(&mut self) {
        self.bindings = ShortcutSet::default();
    }

    /// Validate a whole candidate set pairwise. Any invalid binding or any
    /// collision between two distinct actions rejects the set in full.
    pub fn resolve_conflicts(candidate: &ShortcutSet) -> Result<(), Vec<Conflict>> {
        let mut conflicts = Vec::new();
        let mut seen: Vec<(String, ShortcutAction)> = Vec::new();
        for (action, text) in candidate.bound() {
            match parse_candidate(text) {
                Err(error) => conflicts.push(Conflict { action, error }),
                Ok(combination) => {
                    let canonical = combination.canonical();
                    if let Some((_, owner)) =
                        seen.iter().find(|(existing, _)| *existing == canonical)
                    {
                        conflicts.push(Conflict {
                            action,
                            error: ShortcutError::Duplicate {
                                combination: canonical,
                                owner: *owner,
                            },
                        });
                    } else {
                        seen.push((canonical, action));
                    }
                }
            }
        }
        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(conflicts)
        }
    }

    /// Replace all live host registrations with the given set.
    ///
    /// Every previously registered binding is disabled and released before
    /// any new binding is installed, so a dispatch arriving mid-swap can
    /// never hit a stale handle. Blank bindings are skipped; bindings the
    /// host refuses are logged and skipped.
    pub fn activate(&mut self, set: &ShortcutSet, table: &DispatchTable) {
        for binding in self.live.drain(..) {
            self.host.set_enabled(binding.handle, false);
            self.host.remove(binding.handle);
        }
        for (action, text) in set.bound() {
            let combination = match parse_candidate(text) {
                Ok(combination) => combination,
                Err(error) => {
                    warn!(%action, %error, "skipping shortcut that failed validation");
                    continue;
                }
            };
            let Some(callback) = table.get(action) else {
                warn!(%action, "no handler registered for shortcut action");
                continue;
            };
            match self.host.install(&combination, callback) {
                Ok(handle) => self.live.push(LiveBinding {
                    action,
                    combination,
                    handle,
                }),
                Err(error) => warn!(%action, %error, "shortcut host refused binding"),
            }
        }
        self.bindings = set.clone();
    }
}

/// Validate a candidate binding for an action against an arbitrary set:
/// it must parse, carry a modifier, and not collide with a different
/// action's binding in that set.
pub fn validate_binding(
    set: &ShortcutSet,
    action: ShortcutAction,
    text: &str,
) -> Result<KeyCombination, ShortcutError> {
    let combination = parse_candidate(text)?;
    if let Some(owner) = duplicate_owner(set, action, &combination) {
        return Err(ShortcutError::Duplicate {
            combination: combination.canonical(),
            owner,
        });
    }
    Ok(combination)
}

fn parse_candidate(text: &str) -> Result<KeyCombination, ShortcutError> {
    let combination =
        KeyCombination::parse(text).map_err(|source| ShortcutError::Unparseable {
            combination: text.to_string(),
            source,
        })?;
    if !combination.has_modifier() {
        return Err(ShortcutError::MissingModifier {
            combination: combination.canonical(),
        });
    }
    Ok(combination)
}

fn duplicate_owner(
    bindings: &ShortcutSet,
    action: ShortcutAction,
    candidate: &KeyCombination,
) -> Option<ShortcutAction> {
    let canonical = candidate.canonical();
    bindings
        .bound()
        .filter(|(other, _)| *other != action)
        .find(|(_, text)| {
            KeyCombination::parse(text)
                .map(|existing| existing.canonical() == canonical)
                .unwrap_or(false)
        })
        .map(|(owner, _)| owner)
}
