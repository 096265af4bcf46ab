use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::controller::ListEntry;
use crate::form::is_read_only;
use crate::list::Segment;
use crate::model::{ItemKind, BOOLEAN_NO, BOOLEAN_YES};
use crate::state::{AppState, InputMode};

const INDENT: usize = 2;
const ANSWER_INDENT: usize = 6;

/// Rows an entry occupies at `width`.
pub fn entry_height(state: &AppState, segment: Segment, width: u16) -> u16 {
    entry_lines(state, segment, width).len().min(u16::MAX as usize) as u16
}

pub fn entry_lines(state: &AppState, segment: Segment, width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    let q = &state.form.questionnaire;
    match segment {
        Segment::Front(i) => {
            let style = if i == 0 {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            paragraph_lines(&q.front_matter[i], width, style)
        }
        Segment::Back(i) => paragraph_lines(
            &q.back_matter[i],
            width,
            Style::default().fg(Color::DarkGray),
        ),
        Segment::Main(i) => item_lines(state, i, width),
    }
}

fn paragraph_lines(text: &str, width: usize, style: Style) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for raw in text.lines() {
        for wline in wrap_text(raw, width.saturating_sub(INDENT * 2)) {
            lines.push(Line::from(Span::styled(
                format!("{}{}", " ".repeat(INDENT), wline),
                style,
            )));
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines
}

fn item_lines(state: &AppState, index: usize, width: usize) -> Vec<Line<'static>> {
    let Some(item) = state.form.item(index) else {
        return vec![Line::from("")];
    };
    let focused = state.is_focused(index);
    let answer = state.form.answer(&item.link_id).unwrap_or("").to_string();
    let read_only = is_read_only(item);

    let mut lines: Vec<Line<'static>> = Vec::new();

    // Header: cursor + text, required marker at the end
    let cursor = if focused { " ▸ " } else { "   " };
    let header_style = if item.kind == ItemKind::Display {
        Style::default().fg(Color::Gray)
    } else if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let mut text = item.text.clone();
    if item.required {
        text.push_str(" *");
    }
    for (n, wline) in wrap_text(&text, width.saturating_sub(cursor.chars().count() + 1))
        .into_iter()
        .enumerate()
    {
        let lead = if n == 0 { cursor.to_string() } else { "   ".to_string() };
        lines.push(Line::from(vec![
            Span::styled(lead, Style::default().fg(Color::Cyan)),
            Span::styled(wline, header_style),
        ]));
    }

    let pad = " ".repeat(ANSWER_INDENT);
    let inner = width.saturating_sub(ANSWER_INDENT + 2);
    let editing = focused && state.input_mode == InputMode::TextInput;
    let answer_style = if read_only {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::LightBlue)
    };

    match item.kind {
        ItemKind::Display => {}
        ItemKind::Boolean => {
            let mark = |v: &str| if answer == v { "(●)" } else { "( )" };
            lines.push(Line::from(Span::styled(
                format!("{}{} yes   {} no", pad, mark(BOOLEAN_YES), mark(BOOLEAN_NO)),
                answer_style,
            )));
        }
        ItemKind::Choice => {
            for option in &item.options {
                let selected = answer == option.code;
                let style = if selected {
                    answer_style.add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let mark = if selected { "(●)" } else { "( )" };
                for (n, wline) in wrap_text(&option.display, inner.saturating_sub(4))
                    .into_iter()
                    .enumerate()
                {
                    let lead = if n == 0 { mark } else { "   " };
                    lines.push(Line::from(Span::styled(
                        format!("{}{} {}", pad, lead, wline),
                        style,
                    )));
                }
            }
        }
        ItemKind::String | ItemKind::Integer => {
            lines.push(input_line(&pad, &answer, inner, editing, answer_style));
        }
        ItemKind::Text => {
            let mut rows: Vec<String> = Vec::new();
            for raw in answer.split('\n') {
                rows.extend(wrap_text(raw, inner.saturating_sub(2)));
            }
            let last = rows.len().saturating_sub(1);
            for (n, row) in rows.into_iter().enumerate() {
                let mut spans = vec![
                    Span::raw(pad.clone()),
                    Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                    Span::styled(row, answer_style),
                ];
                if editing && n == last {
                    spans.push(cursor_span());
                }
                lines.push(Line::from(spans));
            }
        }
    }

    if read_only && item.kind != ItemKind::Display {
        lines.push(Line::from(Span::styled(
            format!("{}(read-only)", pad),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    if let Some(problem) = state.form.problem(index) {
        lines.push(Line::from(Span::styled(
            format!("{}! {}", pad, problem),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(""));
    lines
}

fn input_line(pad: &str, answer: &str, inner: usize, editing: bool, style: Style) -> Line<'static> {
    let mut spans = vec![Span::raw(pad.to_string()), Span::raw("[ ")];
    if answer.is_empty() && !editing {
        spans.push(Span::styled(
            "Type your answer...",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        // Keep the end of long answers in view
        let chars: Vec<char> = answer.chars().collect();
        let room = inner.saturating_sub(5).max(1);
        let start = chars.len().saturating_sub(room);
        spans.push(Span::styled(chars[start..].iter().collect::<String>(), style));
        if editing {
            spans.push(cursor_span());
        }
    }
    spans.push(Span::raw(" ]"));
    Line::from(spans)
}

fn cursor_span() -> Span<'static> {
    Span::styled(" ", Style::default().fg(Color::Black).bg(Color::White))
}

pub fn draw_form(f: &mut Frame, area: Rect, state: &AppState) {
    let width = area.width.saturating_sub(1);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut skip = 0u16;

    for (n, (entry, row)) in state.entries.iter().enumerate() {
        if n == 0 && *row < 0 {
            skip = row.unsigned_abs().min(u16::MAX as u32) as u16;
        }
        let segment = match *entry {
            ListEntry::Front(i) => Segment::Front(i),
            ListEntry::Main { index, .. } => Segment::Main(index),
            ListEntry::Back(i) => Segment::Back(i),
        };
        lines.extend(entry_lines(state, segment, width));
    }

    let list_area = Rect {
        width,
        ..area
    };
    f.render_widget(Paragraph::new(lines).scroll((skip, 0)), list_area);

    let content = state.view.content_height();
    let visible = area.height as usize;
    if content > visible {
        let mut scrollbar_state = ScrollbarState::new(content.saturating_sub(visible))
            .position(state.view.offset_rows())
            .viewport_content_length(visible);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

/// Item under a list row, used for mouse focus.
pub fn item_at_row(state: &AppState, row: u16) -> Option<usize> {
    let global = state.view.item_at_row(row)?;
    state.controller.composition().global_to_main(global)
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            result.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}
