//! Logs view
//!
//! A file selector beside a tail view of the selected log. Content is plain
//! text; the most recent lines are kept in view.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    render_file_list(f, app, chunks[0]);
    render_content(f, app, chunks[1]);
}

fn render_file_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" Log Files [{}] ", app.logs.files.len()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    if app.logs.files.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new("Listing log files...").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .logs
        .files
        .iter()
        .map(|file| {
            let style = if *file == app.logs.selected_file {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(format!(" {}", file), style)))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(Some(app.logs.cursor.min(app.logs.files.len() - 1)));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_content(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", app.logs.selected_file),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.logs.loading {
        f.render_widget(
            Paragraph::new("Loading logs...").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    if let Some(error) = &app.logs.error {
        f.render_widget(
            Paragraph::new(format!("Error loading logs: {}", error))
                .style(Style::default().fg(Color::Red)),
            inner,
        );
        return;
    }

    let Some(content) = &app.logs.content else {
        f.render_widget(
            Paragraph::new("No logs available").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    // Tail view: keep the most recent lines on screen.
    let visible = inner.height as usize;
    let lines: Vec<Line> = content
        .lines()
        .rev()
        .take(visible)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|l| Line::from(l.to_string()))
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
