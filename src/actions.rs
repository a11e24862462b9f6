//! Shortcut-triggered entry points.
//!
//! Each entry point is one discrete operation: load the latest persisted
//! parameters, run the pure transition, write the result back, push it
//! onto the player, and return a feedback line for the host to surface.
//! Loading fresh every time keeps independently triggered shortcuts from
//! acting on stale state.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::params::PlaybackParameters;
use crate::player::{self, MediaPlayer};
use crate::session::SettingsSession;
use crate::shortcuts::{DispatchTable, ShortcutAction};
use crate::speed;
use crate::store::ParameterStore;
use crate::volume::{self, MuteOutcome};

/// Volume change applied by a single shortcut press.
pub const VOLUME_STEP: i32 = 10;

/// Nudge the volume up by [`VOLUME_STEP`].
pub fn volume_up(store: &ParameterStore, player: &mut dyn MediaPlayer) -> String {
    adjust_volume(store, player, VOLUME_STEP)
}

/// Nudge the volume down by [`VOLUME_STEP`].
pub fn volume_down(store: &ParameterStore, player: &mut dyn MediaPlayer) -> String {
    adjust_volume(store, player, -VOLUME_STEP)
}

/// Apply a volume delta and report the resulting level.
pub fn adjust_volume(
    store: &ParameterStore,
    player: &mut dyn MediaPlayer,
    delta: i32,
) -> String {
    let loaded = store.load();
    let params = volume::apply_delta(loaded.params, delta);
    store.save(&params);
    player::apply(&params, player);
    let status = volume_status(&params);
    info!(volume = params.volume, muted = params.is_muted, "volume adjusted");
    status
}

/// Flip the mute flag, refusing at volume 0.
pub fn toggle_mute(store: &ParameterStore, player: &mut dyn MediaPlayer) -> String {
    let loaded = store.load();
    match volume::toggle_mute(loaded.params) {
        MuteOutcome::Changed(params) => {
            store.save(&params);
            player::apply(&params, player);
            info!(muted = params.is_muted, "mute toggled");
            if params.is_muted {
                "Sound Muted".to_string()
            } else {
                "Sound Unmuted".to_string()
            }
        }
        MuteOutcome::IgnoredAtZeroVolume => "Cannot toggle mute when volume is 0".to_string(),
    }
}

/// Step the playback speed up the fixed table.
pub fn speed_up(store: &ParameterStore, player: &mut dyn MediaPlayer) -> String {
    adjust_speed(store, player, true)
}

/// Step the playback speed down the fixed table.
pub fn speed_down(store: &ParameterStore, player: &mut dyn MediaPlayer) -> String {
    adjust_speed(store, player, false)
}

fn adjust_speed(store: &ParameterStore, player: &mut dyn MediaPlayer, increasing: bool) -> String {
    let loaded = store.load();
    let mut params = loaded.params;
    params.playback_speed = speed::next_step(params.playback_speed, increasing);
    store.save(&params);
    player::apply(&params, player);
    info!(speed = params.playback_speed, "playback speed adjusted");
    format!("Speed: {:.2}x", params.playback_speed)
}

/// Open a settings editing session over a fresh snapshot.
pub fn open_settings(store: &ParameterStore) -> SettingsSession {
    SettingsSession::open(store)
}

/// Wire every shortcut action to its entry point over shared collaborators.
///
/// The settings action only signals the host (`on_open_settings`), since
/// presenting the dialog is the host's business.
pub fn dispatch_table(
    store: Rc<ParameterStore>,
    player: Rc<RefCell<dyn MediaPlayer>>,
    on_open_settings: impl Fn() + 'static,
) -> DispatchTable {
    let table = DispatchTable::new();
    let table = {
        let (store, player) = (Rc::clone(&store), Rc::clone(&player));
        table.with(ShortcutAction::VolumeUp, move || {
            volume_up(&store, &mut *player.borrow_mut());
        })
    };
    let table = {
        let (store, player) = (Rc::clone(&store), Rc::clone(&player));
        table.with(ShortcutAction::VolumeDown, move || {
            volume_down(&store, &mut *player.borrow_mut());
        })
    };
    let table = {
        let (store, player) = (Rc::clone(&store), Rc::clone(&player));
        table.with(ShortcutAction::ToggleMute, move || {
            toggle_mute(&store, &mut *player.borrow_mut());
        })
    };
    let table = {
        let (store, player) = (Rc::clone(&store), Rc::clone(&player));
        table.with(ShortcutAction::SpeedUp, move || {
            speed_up(&store, &mut *player.borrow_mut());
        })
    };
    let table = {
        let (store, player) = (Rc::clone(&store), Rc::clone(&player));
        table.with(ShortcutAction::SpeedDown, move || {
            speed_down(&store, &mut *player.borrow_mut());
        })
    };
    table.with(ShortcutAction::OpenSettings, on_open_settings)
}

fn volume_status(params: &PlaybackParameters) -> String {
    if params.is_muted {
        "Muted".to_string()
    } else {
        format!("Volume: {}%", params.volume)
    }
}
