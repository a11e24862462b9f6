//! Playback parameter state machine and shortcut binding manager.
//!
//! The host application owns the media player, the config storage and the
//! window/action system; this crate owns the logic in between: deriving
//! effective playback parameters (volume, mute, boost, loudness
//! normalization, speed) from persisted state, enforcing the interaction
//! rules between them, and managing the global shortcuts bound to them.

/// Shortcut-triggered entry points.
pub mod actions;
/// Application directory helpers.
pub mod app_dirs;
/// Logging setup.
pub mod logging;
/// Playback parameter value types and defaults.
pub mod params;
/// The boundary where parameters become player property sets.
pub mod player;
/// Settings dialog edit sessions.
pub mod session;
/// Key combinations, shortcut actions and the binding registry.
pub mod shortcuts;
/// Playback speed quantization.
pub mod speed;
/// Parameter persistence over a raw key-value backend.
pub mod store;
/// Volume, mute and boost transition rules.
pub mod volume;
