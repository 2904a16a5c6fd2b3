//! Describe view
//!
//! Pretty-printed JSON of the selected entry merged with its fetched
//! properties, with light syntax highlighting and scrolling.

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let json = app
        .describe_json()
        .unwrap_or_else(|| "No item selected".to_string());

    let lines: Vec<Line> = json.lines().map(highlight_json_line).collect();
    let total_lines = lines.len();

    let title = match app.focused_kind() {
        Some(kind) => format!(" {} Details ", kind.display_name()),
        None => " Details ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible_lines = inner.height as usize;
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let scroll = app.describe_scroll.min(max_scroll);

    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);

    if total_lines > visible_lines {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state =
            ScrollbarState::new(max_scroll + visible_lines).position(scroll);
        f.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
    }
}

/// Color one line of pretty-printed JSON: keys cyan, string values green,
/// numbers light blue, booleans magenta, null dark gray.
fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find('"') {
        let (before, tail) = rest.split_at(start);
        if !before.is_empty() {
            spans.push(value_span(before));
        }

        // Find the closing quote, honoring escapes.
        let bytes = tail.as_bytes();
        let mut end = None;
        let mut i = 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'"' => {
                    end = Some(i);
                    break;
                }
                _ => i += 1,
            }
        }

        let Some(end) = end else {
            spans.push(value_span(tail));
            return Line::from(spans);
        };

        let (literal, after) = tail.split_at(end + 1);
        let is_key = after.trim_start().starts_with(':');
        let style = if is_key {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Green)
        };
        spans.push(Span::styled(literal.to_string(), style));
        rest = after;
    }

    if !rest.is_empty() {
        spans.push(value_span(rest));
    }

    Line::from(spans)
}

fn value_span(text: &str) -> Span<'static> {
    let bare = text.trim().trim_end_matches(',').trim();
    let style = if bare == "null" {
        Style::default().fg(Color::DarkGray)
    } else if bare == "true" || bare == "false" {
        Style::default().fg(Color::Magenta)
    } else if !bare.is_empty() && bare.parse::<f64>().is_ok() {
        Style::default().fg(Color::LightBlue)
    } else {
        Style::default().fg(Color::White)
    };
    Span::styled(text.to_string(), style)
}
