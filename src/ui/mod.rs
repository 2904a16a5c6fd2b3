//! Terminal User Interface rendering module
//!
//! This module handles all UI rendering for mladmin using the ratatui
//! framework. The layout is a header bar, a tabbed content area (resource
//! sections as tables, or the logs view), and a one-line footer.
//!
//! Resource sections render as soon as their list fetch settles; rows whose
//! properties are still in flight show a per-item pending indicator, so a
//! slow detail fan-out never blocks the list.

mod detail;
mod header;
mod help;
mod logs;
mod sections;

use crate::app::{App, Mode, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header (multi-line)
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);

    match app.mode {
        Mode::Describe => detail::render(f, app, chunks[1]),
        _ => match app.tab {
            Tab::Logs => logs::render(f, app, chunks[1]),
            _ => sections::render(f, app, chunks[1]),
        },
    }

    render_footer(f, app, chunks[2]);

    if app.mode == Mode::Help {
        help::render(f, app);
    }
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    if app.filter_active || !app.filter_text.is_empty() {
        let cursor_style = if app.filter_active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let display = if app.filter_active {
            format!("/{}_", app.filter_text)
        } else {
            format!("/{}", app.filter_text)
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(display, cursor_style))),
            area,
        );
        return;
    }

    let mut crumb = vec![Span::styled(
        format!(" {}", app.tab.title()),
        Style::default().fg(Color::Cyan),
    )];
    if let Some(kind) = app.focused_kind() {
        crumb.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        crumb.push(Span::styled(
            kind.display_name(),
            Style::default().fg(Color::White),
        ));
    } else if app.tab == Tab::Logs {
        crumb.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        crumb.push(Span::styled(
            app.logs.selected_file.clone(),
            Style::default().fg(Color::White),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(crumb)), area);
}
