//! Event Handling
//!
//! Keyboard and event handling for mladmin.

use crate::app::{App, Mode, Tab};
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use std::time::Duration;

/// Handle events, returns true if app should quit
pub fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::from_millis(100))? {
        if let Event::Key(key) = read()? {
            return handle_key_event(app, key.code, key.modifiers);
        }
    }
    Ok(false)
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers),
        Mode::Help => handle_help_mode(app, code),
        Mode::Describe => handle_describe_mode(app, code, modifiers),
    }
}

fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Handle filter input first
    if app.filter_active {
        match code {
            KeyCode::Esc => {
                app.clear_filter();
            }
            KeyCode::Enter => {
                app.filter_active = false;
            }
            KeyCode::Backspace => {
                app.filter_text.pop();
                app.apply_filter();
            }
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.filter_text.push(c);
                app.apply_filter();
            }
            _ => {}
        }
        return Ok(false);
    }

    match code {
        // Quit
        KeyCode::Char('q') => return Ok(true),

        // Navigation - vim style + accessible alternatives
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),

        // Tabs
        KeyCode::Char('1') => app.activate_tab(Tab::Data),
        KeyCode::Char('2') => app.activate_tab(Tab::Infrastructure),
        KeyCode::Char('3') => app.activate_tab(Tab::Security),
        KeyCode::Char('4') => app.activate_tab(Tab::Logs),
        KeyCode::Char('l') | KeyCode::Right => app.next_tab(),
        KeyCode::Char('h') | KeyCode::Left => app.prev_tab(),

        // Section focus within a tab
        KeyCode::Tab => app.next_section(),

        // Refresh
        KeyCode::Char('R') => app.refresh(),

        // Describe / open log file
        KeyCode::Enter | KeyCode::Char('d') => {
            if app.tab == Tab::Logs {
                app.select_log_file();
            } else {
                app.enter_describe_mode();
            }
        }

        // Filter
        KeyCode::Char('/') => {
            if app.tab != Tab::Logs {
                app.filter_active = true;
            }
        }

        // Help
        KeyCode::Char('?') => {
            app.mode = Mode::Help;
        }

        _ => {}
    }

    Ok(false)
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.exit_mode();
        }
        _ => {}
    }
    Ok(false)
}

fn handle_describe_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
            app.exit_mode();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.describe_scroll = app.describe_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.describe_scroll = app.describe_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => {
            app.describe_scroll = app.describe_scroll.saturating_add(10);
        }
        KeyCode::PageUp => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        }
        KeyCode::Char('d') => {
            if modifiers.contains(KeyModifiers::CONTROL) {
                app.describe_scroll = app.describe_scroll.saturating_add(10);
            } else {
                app.exit_mode();
            }
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.describe_scroll = 0;
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.describe_scroll_to_bottom(30); // Approximate visible lines
        }
        _ => {}
    }
    Ok(false)
}
