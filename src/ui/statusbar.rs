use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::AppState;

pub fn draw_statusbar(f: &mut Frame, area: Rect, state: &AppState) {
    let counts = state.status_counts();

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            format!("✓ {} answered", counts.answered),
            Style::default().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("○ {} open", counts.unanswered),
            Style::default().fg(Color::White),
        ),
        Span::raw("   "),
        Span::styled(
            format!("! {} invalid", counts.invalid),
            Style::default().fg(Color::Red),
        ),
        Span::raw("   "),
        Span::styled(
            format!("· {} read-only", counts.read_only),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let Some(ref message) = state.message {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    } else if state.dirty {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("unsaved", Style::default().fg(Color::DarkGray)));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(30, 30, 30)));
    f.render_widget(widget, area);
}
