//! The boundary where parameters become player property sets.
//!
//! [`apply`] is the only place internal state crosses into the external
//! player. It never propagates failures: a refused property set is logged
//! and the triggering shortcut or dialog carries on.

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::params::{LoudnormSettings, PlaybackParameters};

/// A value handed to the player's property surface.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Integer property, e.g. `volume`.
    Int(i64),
    /// Float property, e.g. `speed`.
    Float(f64),
    /// String property, e.g. the `af` filter directive.
    Text(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(value) => write!(f, "{value}"),
            PropertyValue::Float(value) => write!(f, "{value}"),
            PropertyValue::Text(value) => write!(f, "{value:?}"),
        }
    }
}

/// Failure reported by the player for a single property set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Player rejected property {property}: {message}")]
pub struct PlayerError {
    /// The property name that was refused.
    pub property: String,
    /// Player-provided failure description.
    pub message: String,
}

/// A property-settable media player owned by the host application.
pub trait MediaPlayer {
    /// Set a named property. Recognized names: `volume` (int), `af`
    /// (audio-filter string, empty clears), `speed` (float).
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PlayerError>;
}

/// The audio-filter directive for the given loudnorm settings.
pub fn loudnorm_filter(settings: &LoudnormSettings) -> String {
    format!(
        "loudnorm=I={}:dual_mono={}",
        settings.integrated_loudness, settings.dual_mono
    )
}

/// Push the current parameters onto the player.
///
/// Sets the effective volume, then the filter directive (cleared whenever
/// the output is silent, since normalization is moot then), then the
/// playback speed. Speed is set on every path, muted or not.
pub fn apply(params: &PlaybackParameters, player: &mut dyn MediaPlayer) {
    let volume = params.effective_volume();
    set_or_warn(player, "volume", PropertyValue::Int(volume.into()));

    let filter = if volume == 0 || params.is_muted {
        String::new()
    } else if params.loudnorm.enabled {
        loudnorm_filter(&params.loudnorm)
    } else {
        String::new()
    };
    set_or_warn(player, "af", PropertyValue::Text(filter));

    set_or_warn(player, "speed", PropertyValue::Float(params.playback_speed));
}

fn set_or_warn(player: &mut dyn MediaPlayer, name: &str, value: PropertyValue) {
    if let Err(error) = player.set_property(name, value) {
        warn!(%error, "player property set failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingPlayer {
        properties: Vec<(String, PropertyValue)>,
        fail_on: Option<&'static str>,
    }

    impl MediaPlayer for RecordingPlayer {
        fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PlayerError> {
            if self.fail_on == Some(name) {
                return Err(PlayerError {
                    property: name.to_string(),
                    message: "unavailable".into(),
                });
            }
            self.properties.push((name.to_string(), value));
            Ok(())
        }
    }

    fn property<'a>(player: &'a RecordingPlayer, name: &str) -> &'a PropertyValue {
        &player
            .properties
            .iter()
            .rev()
            .find(|(existing, _)| existing == name)
            .unwrap_or_else(|| panic!("property {name} never set"))
            .1
    }

    #[test]
    fn loudnorm_filter_has_the_wire_form() {
        let settings = LoudnormSettings {
            enabled: true,
            integrated_loudness: -24,
            dual_mono: true,
        };
        assert_eq!(loudnorm_filter(&settings), "loudnorm=I=-24:dual_mono=true");
        let settings = LoudnormSettings {
            dual_mono: false,
            ..settings
        };
        assert_eq!(loudnorm_filter(&settings), "loudnorm=I=-24:dual_mono=false");
    }

    #[test]
    fn apply_sets_volume_filter_and_speed() {
        let params = PlaybackParameters {
            volume: 80,
            playback_speed: 1.5,
            loudnorm: LoudnormSettings {
                enabled: true,
                integrated_loudness: -30,
                dual_mono: false,
            },
            ..PlaybackParameters::default()
        };
        let mut player = RecordingPlayer::default();
        apply(&params, &mut player);

        assert_eq!(property(&player, "volume"), &PropertyValue::Int(80));
        assert_eq!(
            property(&player, "af"),
            &PropertyValue::Text("loudnorm=I=-30:dual_mono=false".into())
        );
        assert_eq!(property(&player, "speed"), &PropertyValue::Float(1.5));
    }

    #[test]
    fn apply_clears_the_filter_when_muted_but_still_sets_speed() {
        let params = PlaybackParameters {
            volume: 80,
            is_muted: true,
            playback_speed: 1.2,
            loudnorm: LoudnormSettings {
                enabled: true,
                ..LoudnormSettings::default()
            },
            ..PlaybackParameters::default()
        };
        let mut player = RecordingPlayer::default();
        apply(&params, &mut player);

        assert_eq!(property(&player, "volume"), &PropertyValue::Int(0));
        assert_eq!(property(&player, "af"), &PropertyValue::Text(String::new()));
        assert_eq!(property(&player, "speed"), &PropertyValue::Float(1.2));
    }

    #[test]
    fn apply_clears_the_filter_when_loudnorm_is_disabled() {
        let params = PlaybackParameters {
            volume: 80,
            ..PlaybackParameters::default()
        };
        let mut player = RecordingPlayer::default();
        apply(&params, &mut player);
        assert_eq!(property(&player, "af"), &PropertyValue::Text(String::new()));
    }

    #[test]
    fn apply_survives_a_failing_property_set() {
        let params = PlaybackParameters::default();
        let mut player = RecordingPlayer {
            fail_on: Some("af"),
            ..RecordingPlayer::default()
        };
        apply(&params, &mut player);
        // The failure is swallowed; later properties still land.
        assert_eq!(property(&player, "speed"), &PropertyValue::Float(1.0));
    }
}
