pub mod form;
pub mod keybar;
pub mod layout;
pub mod statusbar;
pub mod titlebar;

use ratatui::Frame;

use crate::state::AppState;

/// Draw one frame. `AppState::prepare_frame` must already have run for
/// the list area of this frame size.
pub fn draw(f: &mut Frame, state: &AppState) {
    let layout = layout::compute_layout(f.area());

    titlebar::draw_titlebar(f, layout.titlebar, state);
    form::draw_form(f, layout.list, state);
    statusbar::draw_statusbar(f, layout.statusbar, state);
    keybar::draw_keybar(f, layout.keybar, state);
}
