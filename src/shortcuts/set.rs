use std::fmt;

/// The closed set of logical actions a shortcut can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShortcutAction {
    /// Nudge the volume up.
    VolumeUp,
    /// Nudge the volume down.
    VolumeDown,
    /// Toggle the mute flag.
    ToggleMute,
    /// Open the settings dialog.
    OpenSettings,
    /// Step the playback speed up.
    SpeedUp,
    /// Step the playback speed down.
    SpeedDown,
}

impl ShortcutAction {
    /// Every action, in config-key order.
    pub const ALL: [ShortcutAction; 6] = [
        ShortcutAction::VolumeUp,
        ShortcutAction::VolumeDown,
        ShortcutAction::ToggleMute,
        ShortcutAction::OpenSettings,
        ShortcutAction::SpeedUp,
        ShortcutAction::SpeedDown,
    ];

    /// Key this action's binding is stored under in the config mapping.
    pub fn config_key(self) -> &'static str {
        match self {
            ShortcutAction::VolumeUp => "volume_up_shortcut",
            ShortcutAction::VolumeDown => "volume_down_shortcut",
            ShortcutAction::ToggleMute => "mute_shortcut",
            ShortcutAction::OpenSettings => "settings_shortcut",
            ShortcutAction::SpeedUp => "speed_up_shortcut",
            ShortcutAction::SpeedDown => "speed_down_shortcut",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            ShortcutAction::VolumeUp => "Volume Up",
            ShortcutAction::VolumeDown => "Volume Down",
            ShortcutAction::ToggleMute => "Toggle Mute",
            ShortcutAction::OpenSettings => "Settings",
            ShortcutAction::SpeedUp => "Speed Up",
            ShortcutAction::SpeedDown => "Speed Down",
        }
    }

    /// Factory combination installed by the reset-shortcuts operation.
    pub fn default_binding(self) -> &'static str {
        match self {
            ShortcutAction::VolumeUp => "Ctrl+Alt+Up",
            ShortcutAction::VolumeDown => "Ctrl+Alt+Down",
            ShortcutAction::ToggleMute => "Ctrl+Alt+M",
            ShortcutAction::OpenSettings => "Ctrl+Alt+V",
            ShortcutAction::SpeedUp => "Ctrl+Alt+Right",
            ShortcutAction::SpeedDown => "Ctrl+Alt+Left",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mapping from each [`ShortcutAction`] to an optional key-combination
/// string. An empty string means unbound; uniqueness of non-empty entries
/// is the registry's job, not the set's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutSet {
    bindings: [String; ShortcutAction::ALL.len()],
}

impl Default for ShortcutSet {
    fn default() -> Self {
        Self {
            bindings: std::array::from_fn(|_| String::new()),
        }
    }
}

impl ShortcutSet {
    /// The factory bindings (`Ctrl+Alt+…`) used by reset-shortcuts.
    pub fn default_bindings() -> Self {
        let mut set = Self::default();
        for action in ShortcutAction::ALL {
            set.set(action, action.default_binding());
        }
        set
    }

    /// The stored combination text for an action; empty when unbound.
    pub fn get(&self, action: ShortcutAction) -> &str {
        &self.bindings[action.index()]
    }

    /// Store a combination text for an action.
    pub fn set(&mut self, action: ShortcutAction, text: impl Into<String>) {
        self.bindings[action.index()] = text.into();
    }

    /// Unbind an action.
    pub fn clear(&mut self, action: ShortcutAction) {
        self.bindings[action.index()].clear();
    }

    /// Whether an action has a non-blank binding.
    pub fn is_bound(&self, action: ShortcutAction) -> bool {
        !self.get(action).trim().is_empty()
    }

    /// The non-blank bindings, in action order.
    pub fn bound(&self) -> impl Iterator<Item = (ShortcutAction, &str)> {
        ShortcutAction::ALL
            .into_iter()
            .filter(|action| self.is_bound(*action))
            .map(|action| (action, self.get(action)))
    }
}
