use std::io;
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::Rect;
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;

use crate::form::is_read_only;
use crate::model::ItemKind;
use crate::persist;
use crate::state::*;

const IDLE_POLL: Duration = Duration::from_millis(100);
const ANIMATION_POLL: Duration = Duration::from_millis(16);
const WHEEL_ROWS: i32 = 3;

pub fn run_tui(mut state: AppState, jump: Option<String>) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Cannot enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| format!("Cannot enter alternate screen: {}", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("Cannot create terminal: {}", e))?;

    let result = main_loop(&mut terminal, &mut state, jump);

    state.dispose();

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    mut jump: Option<String>,
) -> Result<(), String> {
    loop {
        let size = terminal.size().map_err(|e| format!("Size error: {}", e))?;
        let area = Rect::new(0, 0, size.width, size.height);
        let layout = crate::ui::layout::compute_layout(area);

        state.prepare_frame(layout.list);
        terminal
            .draw(|f| crate::ui::draw(f, state))
            .map_err(|e| format!("Draw error: {}", e))?;

        // Markers raised before the controller subscribed are never seen.
        if state.controller.is_loaded() {
            if let Some(link_id) = jump.take() {
                state.form.raise_marker(&link_id);
            }
        }

        state.finish_frame();

        if state.should_quit {
            break;
        }

        let animating = state.view.tick(Instant::now());
        let timeout = if animating { ANIMATION_POLL } else { IDLE_POLL };

        if event::poll(timeout).map_err(|e| format!("Poll error: {}", e))? {
            match event::read().map_err(|e| format!("Read error: {}", e))? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    handle_key(key, state);
                    if state.dirty {
                        autosave(state);
                    }
                }
                Event::Mouse(mouse) => handle_mouse(mouse, state, layout.list),
                _ => {}
            }
        }
    }

    Ok(())
}

fn autosave(state: &mut AppState) {
    if let Err(e) = save(state) {
        log::warn!("autosave failed: {}", e);
        state.message = Some(e);
    }
}

fn save(state: &mut AppState) -> Result<(), String> {
    if let Some(ref dir) = state.state_dir {
        persist::save_answers(&state.form, dir)?;
    }
    state.dirty = false;
    Ok(())
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        handle_control_key(key.code, state);
        return;
    }

    match key.code {
        KeyCode::Up | KeyCode::BackTab => state.move_focus(-1),
        KeyCode::Down | KeyCode::Tab => state.move_focus(1),
        KeyCode::PageUp => {
            let rows = page_rows(state);
            state.view.scroll_by(-rows);
        }
        KeyCode::PageDown => {
            let rows = page_rows(state);
            state.view.scroll_by(rows);
        }
        _ => {
            if let Some(index) = state.focused {
                if let Err(e) = edit_focused(key.code, index, state) {
                    state.message = Some(e);
                }
            }
        }
    }
}

fn handle_control_key(code: KeyCode, state: &mut AppState) {
    match code {
        KeyCode::Char('q') => {
            if let Err(e) = save(state) {
                log::warn!("save on quit failed: {}", e);
            }
            state.should_quit = true;
        }
        KeyCode::Char('s') => {
            state.message = Some(match save(state) {
                Ok(()) => "Answers saved".to_string(),
                Err(e) => e,
            });
        }
        KeyCode::Char('v') => state.validate(),
        KeyCode::Char('d') => {
            if let Some(index) = state.focused {
                match state.form.clear_answer(index) {
                    Ok(()) => mark_edited(state),
                    Err(e) => state.message = Some(e),
                }
            }
        }
        _ => {}
    }
}

fn edit_focused(code: KeyCode, index: usize, state: &mut AppState) -> Result<(), String> {
    let kind = match state.form.item(index) {
        Some(item) => item.kind,
        None => return Ok(()),
    };

    let edited = match (kind, code) {
        (ItemKind::String | ItemKind::Integer | ItemKind::Text, KeyCode::Char(c)) => {
            state.form.push_char(index, c)?;
            true
        }
        (ItemKind::Text, KeyCode::Enter) => {
            state.form.push_char(index, '\n')?;
            true
        }
        (ItemKind::String | ItemKind::Integer | ItemKind::Text, KeyCode::Backspace) => {
            state.form.pop_char(index)?;
            true
        }
        (ItemKind::Boolean, KeyCode::Char(' ')) => {
            state.form.toggle_boolean(index)?;
            true
        }
        (ItemKind::Boolean, KeyCode::Char('y')) => {
            state.form.set_answer(index, crate::model::BOOLEAN_YES)?;
            true
        }
        (ItemKind::Boolean, KeyCode::Char('n')) => {
            state.form.set_answer(index, crate::model::BOOLEAN_NO)?;
            true
        }
        (ItemKind::Choice, KeyCode::Right | KeyCode::Char(' ')) => {
            state.form.cycle_choice(index, 1)?;
            true
        }
        (ItemKind::Choice, KeyCode::Left) => {
            state.form.cycle_choice(index, -1)?;
            true
        }
        (_, KeyCode::Enter) => {
            state.move_focus(1);
            false
        }
        _ => false,
    };

    if edited {
        mark_edited(state);
    }
    Ok(())
}

fn mark_edited(state: &mut AppState) {
    state.dirty = true;
    state.message = None;
}

fn page_rows(state: &AppState) -> i32 {
    (state.view.viewport_height() as i32 - 2).max(1)
}

fn handle_mouse(mouse: MouseEvent, state: &mut AppState, list_area: Rect) {
    match mouse.kind {
        MouseEventKind::ScrollUp => state.view.scroll_by(-WHEEL_ROWS),
        MouseEventKind::ScrollDown => state.view.scroll_by(WHEEL_ROWS),
        MouseEventKind::Down(MouseButton::Left) => {
            let inside = mouse.column >= list_area.x
                && mouse.column < list_area.x + list_area.width
                && mouse.row >= list_area.y
                && mouse.row < list_area.y + list_area.height;
            if !inside {
                return;
            }
            let row = mouse.row - list_area.y;
            if let Some(index) = crate::ui::form::item_at_row(state, row) {
                if state.form.item(index).is_some_and(|item| !is_read_only(item)) {
                    state.set_focus(index);
                }
            }
        }
        _ => {}
    }
}
