//! Volume, mute and boost transition rules.
//!
//! Pure value-in/value-out transitions over [`PlaybackParameters`]; nothing
//! here touches the store or the player.

use crate::params::{PlaybackParameters, VOLUME_CEILING, VOLUME_FLOOR};

/// Outcome of a mute toggle request.
#[derive(Debug, Clone, PartialEq)]
pub enum MuteOutcome {
    /// The mute flag was flipped.
    Changed(PlaybackParameters),
    /// Volume is 0, where toggling mute is meaningless and rejected.
    IgnoredAtZeroVolume,
}

/// Apply a volume nudge, enforcing the boost ceiling and the mute
/// interaction rules.
///
/// The delta is clamped to the current ceiling first, so a single oversized
/// nudge cannot overshoot. Mute rules, in priority order: landing on 0
/// forces mute on; rising off 0 forces mute off; any positive nudge while
/// muted unmutes.
pub fn apply_delta(params: PlaybackParameters, delta: i32) -> PlaybackParameters {
    let mut params = params;
    let max_volume = params.max_volume();
    let delta = delta.clamp(-max_volume, max_volume);
    let new_volume = params.volume.saturating_add(delta).clamp(VOLUME_FLOOR, max_volume);

    if new_volume == 0 {
        params.is_muted = true;
    } else if params.volume == 0 {
        params.is_muted = false;
    } else if delta > 0 && params.is_muted {
        params.is_muted = false;
    }

    params.volume = new_volume;
    params
}

/// Flip the mute flag, unless volume is 0.
pub fn toggle_mute(params: PlaybackParameters) -> MuteOutcome {
    if params.volume == 0 {
        return MuteOutcome::IgnoredAtZeroVolume;
    }
    let mut params = params;
    params.is_muted = !params.is_muted;
    MuteOutcome::Changed(params)
}

/// Set the boost permission. Disabling boost while the stored volume is
/// above 100 clamps it to 100 in the same transition; this is the only
/// point where volume is clamped retroactively.
pub fn set_boost(params: PlaybackParameters, enabled: bool) -> PlaybackParameters {
    let mut params = params;
    params.allow_volume_boost = enabled;
    if !enabled && params.volume > VOLUME_CEILING {
        params.volume = VOLUME_CEILING;
    }
    params
}
