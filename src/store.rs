//! Parameter persistence over a raw key-value backend.
//!
//! [`ParameterStore::load`] never fails: malformed or missing data degrades
//! to defaults and the problem is surfaced as a warning on the returned
//! value. A malformed scalar (say, a volume that is not a number) throws
//! the entire load back to defaults; a malformed `loudnorm` section only
//! defaults that section. [`ParameterStore::save`] reports write failures
//! the same way instead of raising.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use toml::Value;
use tracing::{info, warn};

use crate::app_dirs;
use crate::params::{LoudnormSettings, PlaybackParameters};
use crate::shortcuts::ShortcutAction;

/// Filename used to store the playback parameters.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Legacy filename for migration support.
pub const LEGACY_CONFIG_FILE_NAME: &str = "config.json";

/// Errors that can occur at the persistence boundary.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to create the directory holding the config file.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to write the config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The config file is not valid TOML.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        source: toml::de::Error,
    },
    /// The legacy config file is not valid JSON.
    #[error("Invalid legacy config at {path}: {source}")]
    ParseJson {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },
    /// The legacy config could not be converted into the new layout.
    #[error("Failed to convert legacy config {path}: {source}")]
    ConvertLegacy {
        /// Legacy file being migrated.
        path: PathBuf,
        /// Conversion error.
        source: toml::ser::Error,
    },
    /// Parameters could not be serialized for writing.
    #[error("Failed to serialize config: {source}")]
    Serialize {
        /// Serializer error.
        source: toml::ser::Error,
    },
    /// No application directory could be resolved.
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
}

/// The raw config persistence boundary: a key-value mapping that may be
/// missing (`Ok(None)` on first run) or fail to load.
pub trait SettingsBackend {
    /// Load the raw mapping, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<toml::Table>, ConfigError>;
    /// Persist the raw mapping, replacing any previous contents.
    fn save(&self, table: &toml::Table) -> Result<(), ConfigError>;
}

/// File-backed settings storage under the application directory.
///
/// Stores TOML; a legacy `config.json` left behind by older versions is
/// migrated into the TOML layout on first load.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Backend over an explicit file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Backend over `config.toml` in the application directory.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        let dir = app_dirs::app_root_dir()?;
        Ok(Self::new(dir.join(CONFIG_FILE_NAME)))
    }

    fn legacy_path(&self) -> PathBuf {
        self.path.with_file_name(LEGACY_CONFIG_FILE_NAME)
    }

    fn migrate_legacy(&self, legacy_path: &Path) -> Result<Option<toml::Table>, ConfigError> {
        let text = std::fs::read_to_string(legacy_path).map_err(|source| ConfigError::Read {
            path: legacy_path.to_path_buf(),
            source,
        })?;
        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|source| ConfigError::ParseJson {
                path: legacy_path.to_path_buf(),
                source,
            })?;
        let table = toml::Table::try_from(json).map_err(|source| ConfigError::ConvertLegacy {
            path: legacy_path.to_path_buf(),
            source,
        })?;
        self.save(&table)?;
        info!(
            "Migrated legacy config {} to {}",
            legacy_path.display(),
            self.path.display()
        );
        Ok(Some(table))
    }
}

impl SettingsBackend for FileBackend {
    fn load(&self) -> Result<Option<toml::Table>, ConfigError> {
        if !self.path.exists() {
            let legacy_path = self.legacy_path();
            if legacy_path.exists() {
                return self.migrate_legacy(&legacy_path);
            }
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        let table = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(table))
    }

    fn save(&self, table: &toml::Table) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = toml::to_string_pretty(table)
            .map_err(|source| ConfigError::Serialize { source })?;
        std::fs::write(&self.path, text).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// A freshly loaded parameter snapshot plus any recoverable warning.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedParameters {
    /// Fully valid parameters; defaults stand in for anything malformed.
    pub params: PlaybackParameters,
    /// Human-readable description of whatever was wrong, if anything.
    pub warning: Option<String>,
}

/// Typed view over a [`SettingsBackend`].
pub struct ParameterStore {
    backend: Box<dyn SettingsBackend>,
}

impl ParameterStore {
    /// Store over the given backend.
    pub fn new(backend: Box<dyn SettingsBackend>) -> Self {
        Self { backend }
    }

    /// Store over `config.toml` in the application directory.
    pub fn open_default() -> Result<Self, ConfigError> {
        Ok(Self::new(Box::new(FileBackend::at_default_location()?)))
    }

    /// Load the current parameters. Never fails: backend failures and
    /// malformed data fall back to defaults, with the reason in `warning`.
    pub fn load(&self) -> LoadedParameters {
        let table = match self.backend.load() {
            Ok(Some(table)) => table,
            Ok(None) => {
                return LoadedParameters {
                    params: PlaybackParameters::default(),
                    warning: None,
                };
            }
            Err(error) => {
                warn!(%error, "configuration load failed; using defaults");
                return LoadedParameters {
                    params: PlaybackParameters::default(),
                    warning: Some(format!(
                        "Failed to load configuration: {error}. Resetting to defaults."
                    )),
                };
            }
        };
        match parse_table(&table) {
            Ok((params, warning)) => {
                if let Some(warning) = warning.as_deref() {
                    warn!(warning, "configuration partially malformed");
                }
                LoadedParameters { params, warning }
            }
            Err(error) => {
                warn!(%error, "configuration malformed; using defaults");
                LoadedParameters {
                    params: PlaybackParameters::default(),
                    warning: Some(format!("{error}. Resetting to defaults.")),
                }
            }
        }
    }

    /// Persist the parameters. Failures are logged and returned as a
    /// warning; in-memory state is unaffected either way.
    pub fn save(&self, params: &PlaybackParameters) -> Option<String> {
        let table = match to_table(params) {
            Ok(table) => table,
            Err(error) => {
                warn!(%error, "configuration serialization failed");
                return Some(format!("Failed to save configuration: {error}"));
            }
        };
        match self.backend.save(&table) {
            Ok(()) => None,
            Err(error) => {
                warn!(%error, "configuration save failed");
                Some(format!("Failed to save configuration: {error}"))
            }
        }
    }
}

/// One malformed scalar spoils the whole load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid configuration value for {key}: expected {expected}")]
struct CoerceError {
    key: &'static str,
    expected: &'static str,
}

fn parse_table(
    table: &toml::Table,
) -> Result<(PlaybackParameters, Option<String>), CoerceError> {
    let mut params = PlaybackParameters::default();
    let mut warning = None;

    if let Some(value) = table.get("volume") {
        params.volume = clamp_to_i32(coerce_int("volume", value)?);
    }
    if let Some(value) = table.get("is_muted") {
        params.is_muted = coerce_bool("is_muted", value)?;
    }
    if let Some(value) = table.get("allow_volume_boost") {
        params.allow_volume_boost = coerce_bool("allow_volume_boost", value)?;
    }
    if let Some(value) = table.get("playback_speed") {
        // Taken as stored: loaded speeds are not forced onto the step table.
        params.playback_speed = coerce_float("playback_speed", value)?;
    }
    for action in ShortcutAction::ALL {
        if let Some(value) = table.get(action.config_key()) {
            params
                .shortcuts
                .set(action, coerce_string(action.config_key(), value)?);
        }
    }

    match table.get("loudnorm") {
        None => {}
        Some(Value::Table(section)) => match parse_loudnorm(section) {
            Ok(loudnorm) => params.loudnorm = loudnorm,
            Err(error) => {
                warning = Some(format!("{error}. Using loudnorm defaults."));
            }
        },
        Some(_) => {
            warning = Some(
                "Invalid loudnorm section: expected a table. Using loudnorm defaults."
                    .to_string(),
            );
        }
    }

    Ok((params, warning))
}

fn parse_loudnorm(section: &toml::Table) -> Result<LoudnormSettings, CoerceError> {
    let mut loudnorm = LoudnormSettings::default();
    if let Some(value) = section.get("enabled") {
        loudnorm.enabled = coerce_bool("loudnorm.enabled", value)?;
    }
    if let Some(value) = section.get("i") {
        loudnorm.integrated_loudness = clamp_to_i32(coerce_int("loudnorm.i", value)?);
    }
    if let Some(value) = section.get("dual_mono") {
        loudnorm.dual_mono = coerce_bool("loudnorm.dual_mono", value)?;
    }
    Ok(loudnorm)
}

fn clamp_to_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn coerce_int(key: &'static str, value: &Value) -> Result<i64, CoerceError> {
    let expected = "an integer";
    match value {
        Value::Integer(v) => Ok(*v),
        Value::Float(v) => Ok(v.trunc() as i64),
        Value::String(s) => s.trim().parse().map_err(|_| CoerceError { key, expected }),
        _ => Err(CoerceError { key, expected }),
    }
}

fn coerce_float(key: &'static str, value: &Value) -> Result<f64, CoerceError> {
    let expected = "a number";
    match value {
        Value::Float(v) => Ok(*v),
        Value::Integer(v) => Ok(*v as f64),
        Value::String(s) => s.trim().parse().map_err(|_| CoerceError { key, expected }),
        _ => Err(CoerceError { key, expected }),
    }
}

fn coerce_bool(key: &'static str, value: &Value) -> Result<bool, CoerceError> {
    let expected = "a boolean";
    match value {
        Value::Boolean(v) => Ok(*v),
        Value::Integer(v) => Ok(*v != 0),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(CoerceError { key, expected }),
    }
}

fn coerce_string(key: &'static str, value: &Value) -> Result<String, CoerceError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(CoerceError {
            key,
            expected: "a string",
        }),
    }
}

#[derive(Serialize)]
struct RawSettings<'a> {
    volume: i32,
    is_muted: bool,
    allow_volume_boost: bool,
    mute_shortcut: &'a str,
    settings_shortcut: &'a str,
    volume_up_shortcut: &'a str,
    volume_down_shortcut: &'a str,
    speed_up_shortcut: &'a str,
    speed_down_shortcut: &'a str,
    playback_speed: f64,
    loudnorm: LoudnormSettings,
}

fn to_table(params: &PlaybackParameters) -> Result<toml::Table, ConfigError> {
    let shortcuts = &params.shortcuts;
    let raw = RawSettings {
        volume: params.volume,
        is_muted: params.is_muted,
        allow_volume_boost: params.allow_volume_boost,
        mute_shortcut: shortcuts.get(ShortcutAction::ToggleMute),
        settings_shortcut: shortcuts.get(ShortcutAction::OpenSettings),
        volume_up_shortcut: shortcuts.get(ShortcutAction::VolumeUp),
        volume_down_shortcut: shortcuts.get(ShortcutAction::VolumeDown),
        speed_up_shortcut: shortcuts.get(ShortcutAction::SpeedUp),
        speed_down_shortcut: shortcuts.get(ShortcutAction::SpeedDown),
        playback_speed: params.playback_speed,
        loudnorm: params.loudnorm,
    };
    toml::Table::try_from(raw).map_err(|source| ConfigError::Serialize { source })
}
