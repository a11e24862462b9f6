//! Shared fakes for the integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use volcue::player::{MediaPlayer, PlayerError, PropertyValue};
use volcue::shortcuts::{HostError, HostHandle, KeyCombination, ShortcutCallback, ShortcutHost};
use volcue::store::{ConfigError, SettingsBackend};

/// Chronological record of backend and host activity, shared between the
/// fakes so tests can assert cross-collaborator ordering.
pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// In-memory settings backend that notes every save in the shared log.
pub struct MemoryBackend {
    table: Rc<RefCell<Option<toml::Table>>>,
    log: EventLog,
}

impl MemoryBackend {
    pub fn new(log: EventLog) -> (Self, Rc<RefCell<Option<toml::Table>>>) {
        let table = Rc::new(RefCell::new(None));
        let backend = Self::over(Rc::clone(&table), log);
        (backend, table)
    }

    /// A second backend over an already-shared table, for reload checks.
    pub fn over(table: Rc<RefCell<Option<toml::Table>>>, log: EventLog) -> Self {
        Self { table, log }
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<Option<toml::Table>, ConfigError> {
        Ok(self.table.borrow().clone())
    }

    fn save(&self, table: &toml::Table) -> Result<(), ConfigError> {
        self.log.borrow_mut().push("save".to_string());
        *self.table.borrow_mut() = Some(table.clone());
        Ok(())
    }
}

/// Live bindings held by the fake host, keyed by canonical combination.
#[derive(Default)]
pub struct HostState {
    next_handle: u64,
    live: Vec<(HostHandle, String, ShortcutCallback)>,
}

impl HostState {
    pub fn live_combinations(&self) -> Vec<String> {
        self.live.iter().map(|(_, combo, _)| combo.clone()).collect()
    }
}

/// Fire the callback registered for a canonical combination.
///
/// The callback is cloned out first so it can freely re-enter other
/// fakes while running.
pub fn press(state: &Rc<RefCell<HostState>>, combination: &str) {
    let callback = state
        .borrow()
        .live
        .iter()
        .find(|(_, combo, _)| combo == combination)
        .map(|(_, _, callback)| Rc::clone(callback))
        .unwrap_or_else(|| panic!("no live binding for {combination}"));
    callback();
}

/// Shortcut host that records installs and removals in the shared log.
pub struct FakeHost {
    state: Rc<RefCell<HostState>>,
    log: EventLog,
}

impl FakeHost {
    pub fn new(log: EventLog) -> (Self, Rc<RefCell<HostState>>) {
        let state = Rc::new(RefCell::new(HostState::default()));
        let host = Self {
            state: Rc::clone(&state),
            log,
        };
        (host, state)
    }
}

impl ShortcutHost for FakeHost {
    fn install(
        &mut self,
        combination: &KeyCombination,
        callback: ShortcutCallback,
    ) -> Result<HostHandle, HostError> {
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        let handle = HostHandle(state.next_handle);
        self.log
            .borrow_mut()
            .push(format!("install {}", combination.canonical()));
        state.live.push((handle, combination.canonical(), callback));
        Ok(handle)
    }

    fn set_enabled(&mut self, handle: HostHandle, enabled: bool) {
        self.log
            .borrow_mut()
            .push(format!("set_enabled {} {enabled}", handle.0));
    }

    fn remove(&mut self, handle: HostHandle) {
        self.log.borrow_mut().push(format!("remove {}", handle.0));
        self.state
            .borrow_mut()
            .live
            .retain(|(live_handle, _, _)| *live_handle != handle);
    }
}

/// Player that records every property set for later inspection.
#[derive(Default)]
pub struct FakePlayer {
    pub properties: Vec<(String, PropertyValue)>,
}

impl FakePlayer {
    pub fn last(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .rev()
            .find(|(property, _)| property == name)
            .map(|(_, value)| value)
    }
}

impl MediaPlayer for FakePlayer {
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PlayerError> {
        self.properties.push((name.to_string(), value));
        Ok(())
    }
}
