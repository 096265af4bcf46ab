use std::fs;
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

use termform::controller::ListEntry;
use termform::form::QuestionnaireForm;
use termform::state::{AppState, InputMode};

fn load(fixture: &str) -> AppState {
    let content = fs::read_to_string(fixture).expect("Cannot read fixture");
    let q = termform::parser::parse_questionnaire(&content, fixture, "sha256:test").unwrap();
    AppState::new(QuestionnaireForm::new(q), None)
}

/// One pass of the event loop without a terminal.
fn frame(state: &mut AppState, area: Rect) {
    state.prepare_frame(area);
    state.finish_frame();
}

fn settle(state: &mut AppState) {
    state.view.tick(Instant::now() + Duration::from_secs(60));
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn test_initial_scroll_brings_first_open_question_up() {
    let mut state = load("fixtures/intake.yaml");
    let area = Rect::new(0, 1, 80, 10);

    frame(&mut state, area);
    assert!(state.controller.is_positioned());
    assert_eq!(state.controller.focus_index(), Some(2));
    assert!(state.view.is_animating());
    // target not built yet, so no focus
    assert_eq!(state.focused, None);

    settle(&mut state);
    frame(&mut state, area);

    // phq-1 is combined index 4 (two front matter entries)
    let row = state
        .view
        .visible_items()
        .into_iter()
        .find(|(i, _)| *i == 4)
        .map(|(_, row)| row);
    assert_eq!(row, Some(3));
    assert_eq!(state.focused, Some(2));
    assert_eq!(state.input_mode, InputMode::Navigation);
    assert!(state.controller.is_focussed());
}

#[test]
fn test_no_scroll_when_question_already_on_screen() {
    let mut state = load("fixtures/intake.yaml");
    let area = Rect::new(0, 1, 80, 50);

    frame(&mut state, area);
    assert!(state.controller.is_positioned());
    assert!(!state.view.is_animating());
    assert_eq!(state.view.offset_rows(), 0);
    assert_eq!(state.focused, Some(2));
    assert!(state
        .entries
        .iter()
        .any(|(e, _)| *e == ListEntry::Main { index: 2, autofocus: true }));
}

#[test]
fn test_fully_answered_form_focuses_first_editable() {
    let mut state = load("fixtures/answered.yaml");
    let area = Rect::new(0, 1, 60, 20);

    frame(&mut state, area);
    assert_eq!(state.controller.focus_index(), Some(2));
    assert_eq!(state.focused, Some(2));
    assert_eq!(state.input_mode, InputMode::TextInput);
}

#[test]
fn test_validation_marker_scrolls_to_first_invalid() {
    let mut state = load("fixtures/intake.yaml");
    let area = Rect::new(0, 1, 80, 10);
    frame(&mut state, area);
    settle(&mut state);
    frame(&mut state, area);

    state.form.set_answer(2, "1").unwrap();
    state.form.set_answer(3, "1").unwrap();
    state.form.set_answer(6, "99").unwrap();
    state.validate();
    assert_eq!(state.focused, Some(4));
    assert!(state.message.as_deref().unwrap_or("").contains("2 item(s)"));

    frame(&mut state, area);
    assert!(state.view.is_animating());
    settle(&mut state);
    frame(&mut state, area);

    // sleep-hours is combined index 6
    assert!(state
        .view
        .visible_items()
        .iter()
        .any(|(i, row)| *i == 6 && *row == 3));
}

#[test]
fn test_keyboard_editing() {
    let mut state = load("fixtures/intake.yaml");
    let area = Rect::new(0, 1, 80, 50);
    frame(&mut state, area);
    assert_eq!(state.focused, Some(2));

    termform::tui::handle_key(key(KeyCode::Right), &mut state);
    assert_eq!(state.form.answer("phq-1"), Some("0"));
    assert!(state.dirty);

    termform::tui::handle_key(key(KeyCode::Down), &mut state);
    termform::tui::handle_key(key(KeyCode::Down), &mut state);
    assert_eq!(state.focused, Some(4));
    assert_eq!(state.input_mode, InputMode::TextInput);
    for c in ['8', 'h'] {
        termform::tui::handle_key(key(KeyCode::Char(c)), &mut state);
    }
    assert_eq!(state.form.answer("sleep-hours"), Some("8"));

    termform::tui::handle_key(key(KeyCode::Down), &mut state);
    termform::tui::handle_key(key(KeyCode::Char(' ')), &mut state);
    assert_eq!(state.form.answer("naps"), Some("yes"));

    termform::tui::handle_key(
        KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL),
        &mut state,
    );
    assert_eq!(state.form.answer("naps"), None);

    // read-only items are skipped going up
    for _ in 0..10 {
        termform::tui::handle_key(key(KeyCode::Up), &mut state);
    }
    assert_eq!(state.focused, Some(2));
}

#[test]
fn test_navigating_during_initial_scroll_keeps_chosen_focus() {
    let mut state = load("fixtures/intake.yaml");
    let area = Rect::new(0, 1, 80, 10);
    frame(&mut state, area);
    assert_eq!(state.focused, None);

    for code in [KeyCode::Down, KeyCode::Down, KeyCode::Down, KeyCode::Up, KeyCode::Down] {
        termform::tui::handle_key(key(code), &mut state);
    }
    assert_eq!(state.focused, Some(4));

    settle(&mut state);
    frame(&mut state, area);
    frame(&mut state, area);
    assert_eq!(state.focused, Some(4));
    assert!(state
        .entries
        .iter()
        .all(|(e, _)| !matches!(e, ListEntry::Main { autofocus: true, .. })));
}

#[test]
fn test_dispose_releases_listeners() {
    use termform::form::FormModel;
    use termform::scroll::VirtualList;

    let mut state = load("fixtures/intake.yaml");
    frame(&mut state, Rect::new(0, 1, 80, 10));
    assert_eq!(state.form.markers().subscriber_count(), 1);

    state.dispose();
    assert_eq!(state.form.markers().subscriber_count(), 0);
    assert_eq!(state.view.item_positions().subscriber_count(), 0);
}
