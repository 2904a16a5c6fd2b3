//! Header Component
//!
//! Displays the cluster origin, combined dashboard status and tab bar.

use crate::app::{App, Tab};
use crate::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" mladmin v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Row 1: Cluster origin and combined status
    let status = if app.combined_loading() {
        Span::styled(
            "Loading...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else if let Some(error) = app.combined_error() {
        Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )
    } else {
        Span::styled(
            "Ready",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    };

    let cluster_line = Line::from(vec![
        Span::styled(" Cluster: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.client.base().to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        status,
    ]);
    f.render_widget(Paragraph::new(cluster_line), rows[0]);

    // Row 2: Tab bar
    let mut tab_spans = vec![Span::raw(" ")];
    for (idx, tab) in Tab::ALL.into_iter().enumerate() {
        let label = format!("[{}] {}  ", idx + 1, tab.title());
        let style = if tab == app.tab {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tab_spans.push(Span::styled(label, style));
    }
    f.render_widget(Paragraph::new(Line::from(tab_spans)), rows[1]);

    // Row 3: Help hint
    let help_line = Line::from(Span::styled(
        " ?:help  /:filter  Tab:section  1-4:tabs  R:refresh  q:quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(help_line), rows[2]);
}
