use std::rc::Rc;

use crossterm::event::KeyModifiers;
use pretty_assertions::assert_eq;

use super::*;
use crate::host::{EditorSurfaces, InMemoryHost, PendingState, SearchState};
use crate::key::VirtualKey;
use crate::mode::EngineMode;

const SURFACE: SurfaceId = SurfaceId(1);
const WINDOW: WindowId = WindowId(1);
const EDITOR: ComponentId = ComponentId(10);
const OVERLAY_INPUT: ComponentId = ComponentId(20);

fn setup(text: &str) -> (Rc<InMemoryHost>, EventLoop, OverlaySessionManager) {
    let host = Rc::new(InMemoryHost::new());
    host.add_editor(SURFACE, text, EDITOR, WINDOW);
    host.add_component(OVERLAY_INPUT, WINDOW);
    host.set_ex_commands(["w[rite]", "wq", "s[ubstitute]"]);
    let events = EventLoop::new();
    let manager = OverlaySessionManager::new(
        host.clone(),
        WINDOW,
        events.clone(),
        OverlaySettings::default(),
        SuppressionHandle::new(),
    );
    (host, events, manager)
}

fn press(key: VirtualKey) -> KeyEvent {
    KeyEvent::pressed(key, KeyModifiers::NONE).from_component(OVERLAY_INPUT)
}

#[test]
fn test_rapid_triggers_open_one_session() {
    let (_host, _events, mut manager) = setup("text");
    assert!(manager.handle_trigger(OverlayMode::Command));
    manager.update_input("wq");
    assert!(manager.handle_trigger(OverlayMode::Command));
    assert!(manager.handle_trigger(OverlayMode::SearchForward));
    let session = manager.session().unwrap();
    assert_eq!(session.mode(), OverlayMode::Command);
    assert_eq!(session.input(), "wq");
}

#[test]
fn test_insert_mode_refuses_command_overlay() {
    let (host, _events, mut manager) = setup("text");
    host.set_engine_mode(Some(EngineMode::Insert));
    assert!(!manager.handle_trigger(OverlayMode::Command));
    assert!(!manager.handle_trigger(OverlayMode::SearchBackward));
    assert!(!manager.is_active());
    assert!(manager.handle_trigger(OverlayMode::Expression));
}

#[test]
fn test_unknown_engine_mode_refuses() {
    let (host, _events, mut manager) = setup("text");
    host.set_engine_mode(None);
    assert!(!manager.handle_trigger(OverlayMode::Command));
}

#[test]
fn test_no_usable_surface_refuses() {
    let (host, _events, mut manager) = setup("text");
    host.focus(None);
    assert!(!manager.handle_trigger(OverlayMode::Command));
    host.focus(Some(SURFACE));
    host.dispose_surface(SURFACE);
    assert!(!manager.handle_trigger(OverlayMode::Command));
}

#[test]
fn test_submit_records_history_and_replays_later() {
    let (host, events, mut manager) = setup("text");
    manager.handle_trigger(OverlayMode::Command);
    manager.update_input("wq");
    manager.submit();

    assert!(!manager.is_active());
    assert_eq!(host.focus_requests(), vec![SURFACE]);
    assert_eq!(
        manager.histories().bucket(OverlayMode::Command.history_bucket()).snapshot(),
        vec!["wq"]
    );
    assert!(host.executed().is_empty());
    events.run_pending();
    assert_eq!(host.executed(), vec![":wq"]);
}

#[test]
fn test_blank_submit_skips_history() {
    let (host, events, mut manager) = setup("text");
    manager.handle_trigger(OverlayMode::Command);
    manager.update_input("   ");
    manager.submit();
    events.run_pending();
    assert!(manager.histories().bucket(OverlayMode::Command.history_bucket()).is_empty());
    assert_eq!(host.executed(), vec![":   "]);
}

#[test]
fn test_empty_submit_closes_without_replay() {
    let (host, events, mut manager) = setup("text");
    manager.handle_trigger(OverlayMode::Command);
    manager.submit();
    events.run_pending();
    assert!(!manager.is_active());
    assert!(host.executed().is_empty());
    assert_eq!(host.focus_requests(), vec![SURFACE]);
}

#[test]
fn test_search_submit_lands_on_previewed_match() {
    let (host, events, mut manager) = setup("a foo b foo");
    manager.handle_trigger(OverlayMode::SearchForward);
    assert_eq!(host.incsearch_resets(), 1);
    manager.update_input("foo");
    assert!(manager.is_previewing(SURFACE));
    assert_eq!(manager.session().unwrap().indicator().label(), "1/2");
    events.run_pending();
    assert_eq!(host.caret_offset(SURFACE), 2);

    manager.submit();
    assert!(!manager.is_previewing(SURFACE));
    events.run_pending();
    assert_eq!(host.executed(), vec!["/foo"]);
    assert_eq!(host.caret_offset(SURFACE), 2);
    assert_eq!(host.current_search_state().last_pattern.as_deref(), Some("foo"));
}

#[test]
fn test_substitute_submit_runs_from_starting_line() {
    let (host, events, mut manager) = setup("one\ntwo\nhello");
    host.set_search_state(SearchState {
        last_pattern: Some("prev".into()),
        ..SearchState::default()
    });
    manager.handle_trigger(OverlayMode::Command);
    manager.update_input("s/hello/bye/");
    events.run_pending();
    assert_eq!(host.caret_offset(SURFACE), 8);

    manager.submit();
    assert!(!manager.is_previewing(SURFACE));
    events.run_pending();
    assert_eq!(host.executed(), vec![":s/hello/bye/"]);
    assert_eq!(host.caret_offset(SURFACE), 0);
    assert_eq!(host.highlight(SURFACE), None);
}

#[test]
fn test_cancel_rolls_back_without_replay() {
    let (host, events, mut manager) = setup("alpha beta");
    host.set_search_state(SearchState {
        last_pattern: Some("old".into()),
        ..SearchState::default()
    });
    manager.handle_trigger(OverlayMode::SearchForward);
    manager.update_input("beta");
    events.run_pending();
    assert_eq!(host.caret_offset(SURFACE), 6);

    manager.cancel();
    events.run_pending();
    assert!(!manager.is_active());
    assert!(host.executed().is_empty());
    assert_eq!(host.caret_offset(SURFACE), 0);
    assert_eq!(host.current_search_state().last_pattern.as_deref(), Some("old"));
    assert!(manager.histories().bucket(OverlayMode::SearchForward.history_bucket()).is_empty());
    assert_eq!(host.focus_requests(), vec![SURFACE]);
}

#[test]
fn test_overlay_keys_drive_the_session() {
    let (host, events, mut manager) = setup("text");
    manager.handle_trigger(OverlayMode::Command);
    for ch in "w".chars() {
        let mut typed = KeyEvent::typed(ch).from_component(OVERLAY_INPUT);
        assert!(manager.handle_overlay_key(&mut typed));
        assert!(typed.is_consumed());
    }
    let mut left = press(VirtualKey::Left);
    assert!(!manager.handle_overlay_key(&mut left));
    assert!(!left.is_consumed());

    let mut enter = press(VirtualKey::Enter);
    assert!(manager.handle_overlay_key(&mut enter));
    assert!(enter.is_consumed());
    assert!(!manager.is_active());
    events.run_pending();
    assert_eq!(host.executed(), vec![":w"]);
}

#[test]
fn test_escape_cancels_substitution_preview() {
    let (host, events, mut manager) = setup("say hello world");
    host.set_caret(SURFACE, 2);
    host.set_search_state(SearchState {
        last_pattern: Some("prev".into()),
        ..SearchState::default()
    });
    manager.handle_trigger(OverlayMode::Command);
    manager.update_input(":%s/hello/");
    assert_eq!(host.highlight(SURFACE).as_deref(), Some("hello"));

    let mut escape = press(VirtualKey::Escape);
    assert!(manager.handle_overlay_key(&mut escape));
    events.run_pending();
    assert!(!manager.is_active());
    assert_eq!(host.highlight(SURFACE), None);
    assert_eq!(host.caret_offset(SURFACE), 2);
    assert_eq!(host.current_search_state().last_pattern.as_deref(), Some("prev"));
    assert!(host.executed().is_empty());
}

#[test]
fn test_visual_mode_prefills_range() {
    let (host, _events, mut manager) = setup("text");
    host.set_engine_mode(Some(EngineMode::Visual));
    manager.handle_trigger(OverlayMode::Command);
    assert_eq!(manager.session().unwrap().input(), "'<,'>");
}

#[test]
fn test_search_history_shared_between_directions() {
    let (_host, events, mut manager) = setup("needle in hay");
    manager.handle_trigger(OverlayMode::SearchForward);
    manager.update_input("needle");
    manager.submit();
    events.run_pending();

    manager.handle_trigger(OverlayMode::SearchBackward);
    let mut up = press(VirtualKey::Up);
    assert!(manager.handle_overlay_key(&mut up));
    assert_eq!(manager.session().unwrap().input(), "needle");
}

#[test]
fn test_history_capacity_follows_settings() {
    let host = Rc::new(InMemoryHost::new());
    host.add_editor(SURFACE, "", EDITOR, WINDOW);
    let settings = OverlaySettings {
        history_capacity: 2,
        ..OverlaySettings::default()
    };
    let mut manager = OverlaySessionManager::new(
        host.clone(),
        WINDOW,
        EventLoop::new(),
        settings,
        SuppressionHandle::new(),
    );
    for cmd in ["a", "b", "c"] {
        manager.handle_trigger(OverlayMode::Command);
        manager.update_input(cmd);
        manager.submit();
    }
    assert_eq!(
        manager.histories().bucket(OverlayMode::Command.history_bucket()).snapshot(),
        vec!["c", "b"]
    );
}

#[test]
fn test_component_tracking() {
    let (host, _events, mut manager) = setup("text");
    host.add_component(ComponentId(99), WindowId(2));
    assert!(manager.owns_component(EDITOR));
    assert!(manager.owns_component(OVERLAY_INPUT));
    assert!(!manager.owns_component(ComponentId(99)));
    assert!(manager.is_editor_component(EDITOR));
    assert!(!manager.is_editor_component(OVERLAY_INPUT));

    manager.bind_overlay_component(OVERLAY_INPUT);
    assert!(!manager.is_overlay_component(OVERLAY_INPUT));
    manager.handle_trigger(OverlayMode::Command);
    manager.bind_overlay_component(OVERLAY_INPUT);
    assert!(manager.is_overlay_component(OVERLAY_INPUT));
    manager.cancel();
    assert!(!manager.is_overlay_component(OVERLAY_INPUT));
}

#[test]
fn test_surface_for_source() {
    let (host, _events, manager) = setup("text");
    assert_eq!(manager.surface_for(Some(EDITOR)), Some(SURFACE));
    assert_eq!(manager.surface_for(Some(OVERLAY_INPUT)), None);
    assert_eq!(manager.surface_for(None), Some(SURFACE));
    host.dispose_surface(SURFACE);
    assert_eq!(manager.surface_for(Some(EDITOR)), None);
}

#[test]
fn test_engine_busy_probe() {
    let (host, _events, mut manager) = setup("text");
    assert!(!manager.is_engine_busy(SURFACE));
    host.set_pending(Some(PendingState {
        operator_pending: true,
        ..PendingState::default()
    }));
    assert!(manager.is_engine_busy(SURFACE));
    host.set_pending(None);
    assert!(!manager.is_engine_busy(SURFACE));
    assert!(!manager.is_engine_busy(SURFACE));
}

#[test]
fn test_focus_lost_cancels() {
    let (host, events, mut manager) = setup("text");
    manager.handle_trigger(OverlayMode::Command);
    manager.update_input("w");
    manager.focus_lost();
    events.run_pending();
    assert!(!manager.is_active());
    assert!(host.executed().is_empty());
    manager.focus_lost();
}

#[test]
fn test_replay_falls_back_to_synthetic_events() {
    let (host, events, mut manager) = setup("text");
    host.set_key_budget(Some(1));
    manager.handle_trigger(OverlayMode::Command);
    manager.update_input("w");
    manager.submit();
    events.run_pending();
    assert_eq!(host.handled_keys().len(), 1);
    let typed: String = host
        .posted_events()
        .iter()
        .filter(|(_, e)| e.kind == crate::key::KeyEventKind::Typed)
        .filter_map(|(_, e)| e.ch)
        .collect();
    assert_eq!(typed, "w\n");
}
