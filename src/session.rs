//! Settings dialog edit sessions.
//!
//! A session edits a snapshot loaded at open time, never live global
//! state. Commit validates the whole shortcut set, persists, then swaps
//! the live bindings, in that order; cancel discards everything.

use thiserror::Error;
use tracing::debug;

use crate::params::{LOUDNESS_MAX, LOUDNESS_MIN, PlaybackParameters, VOLUME_FLOOR};
use crate::shortcuts::{
    Conflict, DispatchTable, ShortcutAction, ShortcutError, ShortcutRegistry, ShortcutSet,
    validate_binding,
};
use crate::speed::{self, SPEED_GRID_STEP, SPEED_MAX, SPEED_MIN};
use crate::store::ParameterStore;
use crate::volume;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Open and accepting edits.
    Editing,
    /// Closed after a successful commit.
    Committed,
    /// Closed without saving.
    Cancelled,
}

/// Why a commit was refused. The session stays in `Editing` either way.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The edited shortcut set has invalid or colliding bindings.
    #[error("shortcut set has {} conflicting binding(s)", .0.len())]
    Conflicts(Vec<Conflict>),
    /// The session was already committed or cancelled.
    #[error("session is closed")]
    Closed,
}

/// An editing session over a parameter snapshot.
pub struct SettingsSession {
    draft: PlaybackParameters,
    phase: SessionPhase,
    load_warning: Option<String>,
    syncing_speed: bool,
}

impl SettingsSession {
    /// Open a session over a fresh snapshot from the store.
    pub fn open(store: &ParameterStore) -> Self {
        let loaded = store.load();
        Self {
            draft: loaded.params,
            phase: SessionPhase::Editing,
            load_warning: loaded.warning,
            syncing_speed: false,
        }
    }

    /// The draft being edited.
    pub fn draft(&self) -> &PlaybackParameters {
        &self.draft
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Warning carried over from loading the snapshot, if any.
    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    /// Set the draft volume from the slider or the numeric entry.
    ///
    /// The value is clamped to the current ceiling. Landing on 0 forces
    /// the mute flag on; any positive value clears it, mirroring how the
    /// dialog couples the two controls.
    pub fn set_volume(&mut self, volume: i32) {
        let volume = volume.clamp(VOLUME_FLOOR, self.draft.max_volume());
        self.draft.volume = volume;
        self.draft.is_muted = volume == 0;
    }

    /// Set the draft mute flag. At volume 0 the flag is pinned on.
    pub fn set_muted(&mut self, muted: bool) {
        self.draft.is_muted = muted || self.draft.volume == 0;
    }

    /// Toggle boost permission. Disabling it clamps an out-of-range draft
    /// volume down to 100 in the same step.
    pub fn on_volume_boost_changed(&mut self, enabled: bool) {
        self.draft = volume::set_boost(self.draft.clone(), enabled);
    }

    /// Enable or disable loudness normalization.
    pub fn set_loudnorm_enabled(&mut self, enabled: bool) {
        self.draft.loudnorm.enabled = enabled;
    }

    /// Set the integrated-loudness target, clamped to the UI range.
    pub fn set_integrated_loudness(&mut self, value: i32) {
        self.draft.loudnorm.integrated_loudness = value.clamp(LOUDNESS_MIN, LOUDNESS_MAX);
    }

    /// Set the dual-mono treatment flag.
    pub fn set_dual_mono(&mut self, dual_mono: bool) {
        self.draft.loudnorm.dual_mono = dual_mono;
    }

    /// Handle slider movement (integer percent, 25..=200). Returns the
    /// snapped speed the numeric entry should mirror, or `None` when the
    /// draft is already there and no mirroring is needed.
    ///
    /// The no-change answer is what breaks the feedback loop between the
    /// two mirrored controls: the mirrored update re-enters here, finds
    /// nothing to change, and stops. A guard flag additionally drops
    /// re-entrant calls arriving while an update is still in progress.
    pub fn on_speed_slider_changed(&mut self, percent: i32) -> Option<f64> {
        if self.syncing_speed {
            return None;
        }
        self.syncing_speed = true;
        let result = self.update_speed(f64::from(percent) / 100.0);
        self.syncing_speed = false;
        result
    }

    /// Handle numeric speed entry. Returns the snapped speed the slider
    /// should mirror, or `None` when nothing changed; the same re-entrancy
    /// rules as [`Self::on_speed_slider_changed`] apply.
    pub fn on_speed_entry_changed(&mut self, value: f64) -> Option<f64> {
        if self.syncing_speed {
            return None;
        }
        self.syncing_speed = true;
        let result = self.update_speed(value);
        self.syncing_speed = false;
        result
    }

    fn update_speed(&mut self, raw: f64) -> Option<f64> {
        let snapped = speed::snap_to_grid(raw, SPEED_GRID_STEP).clamp(SPEED_MIN, SPEED_MAX);
        if (snapped - self.draft.playback_speed).abs() < 1e-9 {
            return None;
        }
        self.draft.playback_speed = snapped;
        Some(snapped)
    }

    /// Record a shortcut for an action, validated live against the rest of
    /// the draft set. Blank text unbinds. A rejected binding leaves the
    /// draft untouched; the rest of the session is unaffected.
    pub fn set_shortcut(
        &mut self,
        action: ShortcutAction,
        text: &str,
    ) -> Result<(), ShortcutError> {
        if text.trim().is_empty() {
            self.draft.shortcuts.clear(action);
            return Ok(());
        }
        let combination = validate_binding(&self.draft.shortcuts, action, text)?;
        self.draft.shortcuts.set(action, combination.canonical());
        Ok(())
    }

    /// Unbind an action in the draft.
    pub fn clear_shortcut(&mut self, action: ShortcutAction) {
        self.draft.shortcuts.clear(action);
    }

    /// Restore the factory default bindings into the draft.
    pub fn reset_shortcuts(&mut self) {
        self.draft.shortcuts = ShortcutSet::default_bindings();
    }

    /// Restore every draft field to its default.
    pub fn reset_all(&mut self) {
        self.draft = PlaybackParameters::default();
    }

    /// Validate, persist, then activate the edited shortcut set.
    ///
    /// Any conflict refuses the whole commit and the session keeps
    /// editing. On success the parameters are saved before the bindings
    /// are swapped, so a crash mid-activation still leaves the right
    /// values on disk for the next load. Returns the save warning, if the
    /// write degraded.
    pub fn commit(
        &mut self,
        store: &ParameterStore,
        registry: &mut ShortcutRegistry,
        table: &DispatchTable,
    ) -> Result<Option<String>, CommitError> {
        if self.phase != SessionPhase::Editing {
            return Err(CommitError::Closed);
        }
        ShortcutRegistry::resolve_conflicts(&self.draft.shortcuts)
            .map_err(CommitError::Conflicts)?;
        let warning = store.save(&self.draft);
        registry.activate(&self.draft.shortcuts, table);
        self.phase = SessionPhase::Committed;
        debug!("settings session committed");
        Ok(warning)
    }

    /// Discard the draft. No store or registry mutation occurs.
    pub fn cancel(&mut self) {
        if self.phase == SessionPhase::Editing {
            self.phase = SessionPhase::Cancelled;
        }
    }
}
