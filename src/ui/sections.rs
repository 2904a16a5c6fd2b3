//! Resource section tables
//!
//! Each tab stacks one table per resource kind. A section renders a loading
//! line until its list settles, a red error line on list-level failure, and
//! otherwise its entries with a per-row properties indicator.

use crate::app::{App, DetailStatus};
use crate::resource::{EntryField, ListEntry, LoadState, ResourceKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let kinds = app.tab.sections();
    if kinds.is_empty() {
        return;
    }

    let per_section = (100 / kinds.len() as u16).max(1);
    let constraints: Vec<Constraint> = kinds
        .iter()
        .map(|_| Constraint::Percentage(per_section))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, kind) in kinds.iter().enumerate() {
        render_section(f, app, *kind, idx == app.section, chunks[idx]);
    }
}

fn render_section(f: &mut Frame, app: &App, kind: ResourceKind, focused: bool, area: Rect) {
    let entries = app.visible_entries(kind);

    let title = format!(" {} [{}] ", kind.display_name(), entries.len());
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.state(kind) {
        LoadState::Idle | LoadState::Loading => {
            let msg = format!("Loading {}...", kind.display_name().to_lowercase());
            f.render_widget(
                Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
                inner,
            );
        }
        LoadState::Failed { error } => {
            f.render_widget(
                Paragraph::new(format!("Error: {}", error))
                    .style(Style::default().fg(Color::Red)),
                inner,
            );
        }
        LoadState::Loaded { .. } => {
            render_table(f, app, kind, focused, &entries, inner);
        }
    }
}

fn render_table(
    f: &mut Frame,
    app: &App,
    kind: ResourceKind,
    focused: bool,
    entries: &[&ListEntry],
    area: Rect,
) {
    let columns = kind.def().columns;

    let mut header_cells: Vec<Cell> = columns
        .iter()
        .map(|col| {
            Cell::from(format!(" {}", col.header)).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    header_cells.push(Cell::from(" Properties").style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            let mut cells: Vec<Cell> = columns
                .iter()
                .map(|col| Cell::from(format!(" {}", entry_field(entry, col.field))))
                .collect();
            cells.push(detail_cell(app.detail_status(kind, entry)));
            Row::new(cells)
        })
        .collect();

    let mut widths: Vec<Constraint> = columns
        .iter()
        .map(|col| Constraint::Percentage(col.width))
        .collect();
    let used: u16 = columns.iter().map(|col| col.width).sum();
    widths.push(Constraint::Percentage(100u16.saturating_sub(used)));

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    if focused && !entries.is_empty() {
        state.select(Some(app.selected.min(entries.len() - 1)));
    }

    f.render_stateful_widget(table, area, &mut state);
}

fn entry_field(entry: &ListEntry, field: EntryField) -> String {
    let value = match field {
        EntryField::Name => entry.nameref.as_deref(),
        EntryField::Id => entry.idref.as_deref(),
        EntryField::GroupName => entry.groupnameref.as_deref(),
    };
    value.unwrap_or("-").to_string()
}

fn detail_cell(status: DetailStatus) -> Cell<'static> {
    match status {
        DetailStatus::Ready => {
            Cell::from(" loaded").style(Style::default().fg(Color::Green))
        }
        DetailStatus::Pending => {
            Cell::from(" Loading details...").style(Style::default().fg(Color::Yellow))
        }
        DetailStatus::Unavailable => {
            Cell::from(" unavailable").style(Style::default().fg(Color::DarkGray))
        }
        DetailStatus::NotAddressable => {
            Cell::from(" -").style(Style::default().fg(Color::DarkGray))
        }
    }
}
