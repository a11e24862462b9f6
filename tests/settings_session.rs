//! End-to-end flows over the store, registry and player boundaries.

mod support;

use std::cell::RefCell;
use std::rc::Rc;

use support::{FakeHost, FakePlayer, MemoryBackend, event_log, press};
use volcue::actions;
use volcue::params::PlaybackParameters;
use volcue::player::{MediaPlayer, PropertyValue};
use volcue::session::{CommitError, SessionPhase};
use volcue::shortcuts::{ShortcutAction, ShortcutRegistry, ShortcutSet};
use volcue::store::ParameterStore;

fn noop_table() -> volcue::shortcuts::DispatchTable {
    ShortcutAction::ALL
        .into_iter()
        .fold(volcue::shortcuts::DispatchTable::new(), |table, action| {
            table.with(action, || {})
        })
}

#[test]
fn commit_saves_before_activating() {
    let log = event_log();
    let (backend, _table) = MemoryBackend::new(Rc::clone(&log));
    let store = ParameterStore::new(Box::new(backend));
    let (host, _state) = FakeHost::new(Rc::clone(&log));
    let mut registry = ShortcutRegistry::new(Box::new(host));

    let mut session = actions::open_settings(&store);
    session.set_volume(60);
    session.reset_shortcuts();
    session
        .commit(&store, &mut registry, &noop_table())
        .unwrap();

    let events = log.borrow().clone();
    let save_at = events.iter().position(|event| event == "save").unwrap();
    let first_install = events
        .iter()
        .position(|event| event.starts_with("install"))
        .unwrap();
    assert!(save_at < first_install, "events: {events:?}");
}

#[test]
fn shortcut_press_adjusts_volume_and_reaches_the_player() {
    let log = event_log();
    let (backend, _table) = MemoryBackend::new(Rc::clone(&log));
    let store = Rc::new(ParameterStore::new(Box::new(backend)));
    let mut params = PlaybackParameters::default();
    params.volume = 50;
    params.shortcuts = ShortcutSet::default_bindings();
    store.save(&params);

    let (host, host_state) = FakeHost::new(Rc::clone(&log));
    let mut registry = ShortcutRegistry::new(Box::new(host));
    let player = Rc::new(RefCell::new(FakePlayer::default()));
    let dyn_player: Rc<RefCell<dyn MediaPlayer>> = player.clone();
    let opened = Rc::new(RefCell::new(0u32));
    let table = {
        let opened = Rc::clone(&opened);
        actions::dispatch_table(Rc::clone(&store), dyn_player, move || {
            *opened.borrow_mut() += 1;
        })
    };
    registry.activate(&params.shortcuts, &table);

    press(&host_state, "Ctrl+Alt+Up");
    press(&host_state, "Ctrl+Alt+Up");
    assert_eq!(store.load().params.volume, 70);
    assert_eq!(player.borrow().last("volume"), Some(&PropertyValue::Int(70)));

    press(&host_state, "Ctrl+Alt+M");
    assert!(store.load().params.is_muted);
    assert_eq!(player.borrow().last("volume"), Some(&PropertyValue::Int(0)));

    press(&host_state, "Ctrl+Alt+Right");
    assert_eq!(store.load().params.playback_speed, 1.1);
    assert_eq!(
        player.borrow().last("speed"),
        Some(&PropertyValue::Float(1.1))
    );

    press(&host_state, "Ctrl+Alt+V");
    assert_eq!(*opened.borrow(), 1);
}

#[test]
fn committed_edits_survive_a_reload() {
    let log = event_log();
    let (backend, table) = MemoryBackend::new(Rc::clone(&log));
    let store = ParameterStore::new(Box::new(backend));
    let (host, host_state) = FakeHost::new(Rc::clone(&log));
    let mut registry = ShortcutRegistry::new(Box::new(host));

    let mut session = actions::open_settings(&store);
    session.on_volume_boost_changed(true);
    session.set_volume(150);
    session.set_loudnorm_enabled(true);
    session.set_integrated_loudness(-30);
    session.on_speed_entry_changed(1.37);
    session
        .set_shortcut(ShortcutAction::ToggleMute, "Ctrl+Shift+M")
        .unwrap();
    session
        .commit(&store, &mut registry, &noop_table())
        .unwrap();
    assert_eq!(session.phase(), SessionPhase::Committed);

    // A second store over the same backend sees exactly what was saved.
    let reloaded =
        ParameterStore::new(Box::new(MemoryBackend::over(table, Rc::clone(&log)))).load();
    assert!(reloaded.warning.is_none());
    assert_eq!(reloaded.params.volume, 150);
    assert!(reloaded.params.allow_volume_boost);
    assert!(reloaded.params.loudnorm.enabled);
    assert_eq!(reloaded.params.loudnorm.integrated_loudness, -30);
    assert!((reloaded.params.playback_speed - 1.35).abs() < 1e-9);
    assert_eq!(
        reloaded.params.shortcuts.get(ShortcutAction::ToggleMute),
        "Ctrl+Shift+M"
    );

    let live = host_state.borrow().live_combinations();
    assert!(live.contains(&"Ctrl+Shift+M".to_string()));
    assert!(!live.contains(&"Ctrl+Alt+M".to_string()));
}

#[test]
fn recommitting_swaps_bindings_without_leftovers() {
    let log = event_log();
    let (backend, _table) = MemoryBackend::new(Rc::clone(&log));
    let store = ParameterStore::new(Box::new(backend));
    let (host, host_state) = FakeHost::new(Rc::clone(&log));
    let mut registry = ShortcutRegistry::new(Box::new(host));

    let mut session = actions::open_settings(&store);
    session.reset_shortcuts();
    session
        .commit(&store, &mut registry, &noop_table())
        .unwrap();

    let mut session = actions::open_settings(&store);
    session
        .set_shortcut(ShortcutAction::VolumeUp, "Ctrl+Shift+U")
        .unwrap();
    session
        .commit(&store, &mut registry, &noop_table())
        .unwrap();

    let live = host_state.borrow().live_combinations();
    assert_eq!(live.len(), ShortcutAction::ALL.len());
    assert!(live.contains(&"Ctrl+Shift+U".to_string()));
    assert!(!live.contains(&"Ctrl+Alt+Up".to_string()));
}

#[test]
fn conflicting_snapshot_blocks_commit_and_saves_nothing() {
    let log = event_log();
    let (backend, _table) = MemoryBackend::new(Rc::clone(&log));
    let store = ParameterStore::new(Box::new(backend));
    let mut params = PlaybackParameters::default();
    params.shortcuts.set(ShortcutAction::VolumeUp, "Ctrl+Alt+Up");
    params.shortcuts.set(ShortcutAction::SpeedUp, "Ctrl+Alt+Up");
    store.save(&params);
    log.borrow_mut().clear();

    let (host, host_state) = FakeHost::new(Rc::clone(&log));
    let mut registry = ShortcutRegistry::new(Box::new(host));
    let mut session = actions::open_settings(&store);
    let err = session
        .commit(&store, &mut registry, &noop_table())
        .unwrap_err();
    assert!(matches!(err, CommitError::Conflicts(_)));
    assert_eq!(session.phase(), SessionPhase::Editing);
    assert!(log.borrow().is_empty());
    assert!(host_state.borrow().live_combinations().is_empty());
}

#[test]
fn cancelled_session_touches_neither_store_nor_host() {
    let log = event_log();
    let (backend, _table) = MemoryBackend::new(Rc::clone(&log));
    let store = ParameterStore::new(Box::new(backend));

    let mut session = actions::open_settings(&store);
    session.set_volume(10);
    session.cancel();
    assert_eq!(session.phase(), SessionPhase::Cancelled);
    assert!(log.borrow().is_empty());
    assert_eq!(store.load().params, PlaybackParameters::default());
}
