use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::model::ItemKind;
use crate::state::{AppState, InputMode};

pub fn draw_keybar(f: &mut Frame, area: Rect, state: &AppState) {
    let focused_kind = state
        .focused
        .and_then(|i| state.form.item(i))
        .map(|item| item.kind);

    let mut bindings: Vec<(&str, &str)> = vec![("↑/↓", "item")];
    match (&state.input_mode, focused_kind) {
        (InputMode::TextInput, _) => {
            bindings.push(("type", "answer"));
            bindings.push(("Bksp", "delete"));
        }
        (_, Some(ItemKind::Boolean)) => bindings.push(("Space", "yes/no")),
        (_, Some(ItemKind::Choice)) => bindings.push(("←/→", "choose")),
        _ => {}
    }
    bindings.extend([
        ("PgUp/PgDn", "scroll"),
        ("Ctrl+D", "clear"),
        ("Ctrl+V", "validate"),
        ("Ctrl+S", "save"),
        ("Ctrl+Q", "quit"),
    ]);

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    let line = Line::from(spans);
    let widget = Paragraph::new(line).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(widget, area);
}
