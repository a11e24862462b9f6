//! Playback parameter value types.
//!
//! `PlaybackParameters` is the whole persisted state: one value is loaded
//! fresh at the start of every discrete operation, transformed, and written
//! back. There is no long-lived mutable singleton.

use serde::Serialize;

use crate::shortcuts::ShortcutSet;

/// Lowest settable volume.
pub const VOLUME_FLOOR: i32 = 0;
/// Volume ceiling without boost.
pub const VOLUME_CEILING: i32 = 100;
/// Volume ceiling with boost allowed.
pub const VOLUME_CEILING_BOOSTED: i32 = 200;

/// Lowest integrated-loudness target offered by the settings UI.
pub const LOUDNESS_MIN: i32 = -50;
/// Highest integrated-loudness target offered by the settings UI.
pub const LOUDNESS_MAX: i32 = -14;

/// Loudness normalization filter settings.
///
/// Replaced wholesale on edit; the filter itself runs inside the player,
/// parameterized by the directive built in [`crate::player`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoudnormSettings {
    /// Whether the loudnorm filter is applied at all.
    pub enabled: bool,
    /// Target integrated loudness in dB. The settings UI constrains this to
    /// [`LOUDNESS_MIN`]..=[`LOUDNESS_MAX`]; the store does not clamp it.
    #[serde(rename = "i")]
    pub integrated_loudness: i32,
    /// Treat mono input as dual-mono.
    pub dual_mono: bool,
}

impl Default for LoudnormSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            integrated_loudness: -24,
            dual_mono: false,
        }
    }
}

/// The full set of user-adjustable playback parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackParameters {
    /// Stored volume in percent, 0..=200. Values above 100 require boost.
    pub volume: i32,
    /// Mute flag. The stored volume is kept while muted.
    pub is_muted: bool,
    /// Permission for volume to exceed 100%.
    pub allow_volume_boost: bool,
    /// Loudness normalization settings.
    pub loudnorm: LoudnormSettings,
    /// Playback speed factor. Interactive changes land on the step table in
    /// [`crate::speed`]; loaded values are taken as stored.
    pub playback_speed: f64,
    /// Key-combination bindings for the shortcut actions.
    pub shortcuts: ShortcutSet,
}

impl Default for PlaybackParameters {
    fn default() -> Self {
        Self {
            volume: 100,
            is_muted: false,
            allow_volume_boost: false,
            loudnorm: LoudnormSettings::default(),
            playback_speed: 1.0,
            shortcuts: ShortcutSet::default(),
        }
    }
}

impl PlaybackParameters {
    /// Current volume ceiling, depending only on the boost flag.
    pub fn max_volume(&self) -> i32 {
        if self.allow_volume_boost {
            VOLUME_CEILING_BOOSTED
        } else {
            VOLUME_CEILING
        }
    }

    /// The volume actually sent to the player: 0 while muted, else the
    /// stored volume. Computed at apply time, never stored.
    pub fn effective_volume(&self) -> i32 {
        if self.is_muted { 0 } else { self.volume }
    }
}
