//! Application State
//!
//! Central state for mladmin: one load state per resource kind, the lazily
//! loaded logs view, and the combined dashboard state derived from the six
//! aggregated resources. Loader tasks run in the background and publish
//! transitions over an mpsc channel; the event loop drains the channel
//! between frames, so a list renders as soon as it settles while its
//! per-item properties are still in flight.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::manage::{logs, ManageClient};
use crate::resource::{
    fetch_details, fetch_list, ListEntries, ListEntry, LoadState, ResourceKind,
};

/// Application modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,   // Viewing lists
    Help,     // ? help popup
    Describe, // Viewing JSON details of selected item
}

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Data,
    Infrastructure,
    Security,
    Logs,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Data, Tab::Infrastructure, Tab::Security, Tab::Logs];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Data => "Data",
            Tab::Infrastructure => "Infrastructure",
            Tab::Security => "Security",
            Tab::Logs => "Logs",
        }
    }

    /// Resource sections shown on this tab, top to bottom.
    pub fn sections(self) -> &'static [ResourceKind] {
        match self {
            Tab::Data => &[ResourceKind::Database, ResourceKind::Forest],
            Tab::Infrastructure => &[
                ResourceKind::Host,
                ResourceKind::Group,
                ResourceKind::Server,
            ],
            Tab::Security => &[ResourceKind::User, ResourceKind::Role],
            Tab::Logs => &[],
        }
    }
}

/// Per-row detail availability, shown in the rightmost list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailStatus {
    /// Properties merged and ready to describe.
    Ready,
    /// Detail fetches for the resource are still in flight.
    Pending,
    /// The detail fetch settled without this entry (failed or skipped).
    Unavailable,
    /// The entry lacks the kind's detail key; it is never fetched.
    NotAddressable,
}

/// Lazily loaded logs view state. Content is fetched once on first tab
/// activation, guarded against reentry; the file listing is fetched once
/// and degrades silently to conventional names.
#[derive(Debug, Clone, Default)]
pub struct LogsState {
    pub content: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub files: Vec<String>,
    pub files_requested: bool,
    pub selected_file: String,
    pub cursor: usize,
}

/// State transitions published by background tasks.
///
/// Every update carries the generation it was spawned under; updates from a
/// superseded generation (a refresh happened in between) are dropped, so
/// two loads of the same resource can never race.
#[derive(Debug)]
pub enum AppUpdate {
    ListSettled {
        kind: ResourceKind,
        generation: u64,
        state: LoadState,
    },
    DetailsSettled {
        kind: ResourceKind,
        generation: u64,
        details: HashMap<String, serde_json::Value>,
    },
    LogFiles {
        generation: u64,
        files: Vec<String>,
    },
    LogContent {
        generation: u64,
        filename: String,
        result: Result<String, String>,
    },
}

/// Spawn the two-phase loader for one resource kind. The list outcome is
/// published as soon as it settles so the entries render while details are
/// still in flight. Nothing is published after `cancel` fires.
pub fn spawn_resource_loader(
    kind: ResourceKind,
    client: ManageClient,
    tx: UnboundedSender<AppUpdate>,
    cancel: CancellationToken,
    generation: u64,
) {
    tokio::spawn(async move {
        let state = fetch_list(kind, &client).await;
        if cancel.is_cancelled() {
            return;
        }

        let entries = match &state {
            LoadState::Loaded {
                entries: ListEntries::Present(entries),
                ..
            } if !entries.is_empty() => Some(entries.clone()),
            _ => None,
        };

        if tx
            .send(AppUpdate::ListSettled {
                kind,
                generation,
                state,
            })
            .is_err()
        {
            return;
        }

        let Some(entries) = entries else {
            return;
        };

        let details = fetch_details(kind, &client, &entries).await;
        if cancel.is_cancelled() {
            return;
        }
        let _ = tx.send(AppUpdate::DetailsSettled {
            kind,
            generation,
            details,
        });
    });
}

fn spawn_log_content_fetch(
    client: ManageClient,
    filename: String,
    tx: UnboundedSender<AppUpdate>,
    cancel: CancellationToken,
    generation: u64,
) {
    tokio::spawn(async move {
        let result = logs::fetch_log(&client, &filename)
            .await
            .map_err(|e| e.to_string());
        if cancel.is_cancelled() {
            return;
        }
        let _ = tx.send(AppUpdate::LogContent {
            generation,
            filename,
            result,
        });
    });
}

fn spawn_log_file_listing(
    client: ManageClient,
    tx: UnboundedSender<AppUpdate>,
    cancel: CancellationToken,
    generation: u64,
) {
    tokio::spawn(async move {
        let files = logs::list_log_files(&client).await;
        if cancel.is_cancelled() {
            return;
        }
        let _ = tx.send(AppUpdate::LogFiles { generation, files });
    });
}

/// Main application state
pub struct App {
    pub client: ManageClient,
    pub config: Config,

    // One load state per resource kind
    states: HashMap<ResourceKind, LoadState>,
    pub logs: LogsState,

    // Navigation state
    pub tab: Tab,
    pub section: usize,
    pub selected: usize,
    pub mode: Mode,
    pub describe_scroll: usize,
    pub filter_text: String,
    pub filter_active: bool,

    // Background task plumbing
    tx: UnboundedSender<AppUpdate>,
    cancel: CancellationToken,
    generation: u64,
}

impl App {
    pub fn new(client: ManageClient, config: Config, tx: UnboundedSender<AppUpdate>) -> Self {
        let selected_file = config.effective_log_file();
        Self {
            client,
            config,
            states: ResourceKind::ALL
                .into_iter()
                .map(|k| (k, LoadState::Idle))
                .collect(),
            logs: LogsState {
                selected_file,
                ..LogsState::default()
            },
            tab: Tab::Data,
            section: 0,
            selected: 0,
            mode: Mode::Normal,
            describe_scroll: 0,
            filter_text: String::new(),
            filter_active: false,
            tx,
            cancel: CancellationToken::new(),
            generation: 0,
        }
    }

    // =========================================================================
    // Loader fleet
    // =========================================================================

    /// Kick off the loader fleet: every resource kind starts loading
    /// concurrently. The logs view stays untouched; it loads on first
    /// activation of its tab.
    pub fn start_loaders(&mut self) {
        for kind in ResourceKind::ALL {
            self.states.insert(kind, LoadState::Loading);
            spawn_resource_loader(
                kind,
                self.client.clone(),
                self.tx.clone(),
                self.cancel.clone(),
                self.generation,
            );
        }
    }

    /// Cancel the in-flight generation and respawn the fleet.
    pub fn refresh(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.generation += 1;
        self.selected = 0;
        self.start_loaders();
    }

    /// Cancel all in-flight work. Called on exit so no task outlives the
    /// terminal.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn state(&self, kind: ResourceKind) -> &LoadState {
        self.states.get(&kind).unwrap_or(&LoadState::Idle)
    }

    /// Fold one background update into the state. Stale generations are
    /// dropped.
    pub fn apply(&mut self, update: AppUpdate) {
        match update {
            AppUpdate::ListSettled {
                kind,
                generation,
                state,
            } => {
                if generation != self.generation {
                    return;
                }
                self.states.insert(kind, state);
                self.clamp_selection();
            }
            AppUpdate::DetailsSettled {
                kind,
                generation,
                details: merged,
            } => {
                if generation != self.generation {
                    return;
                }
                if let Some(LoadState::Loaded {
                    details,
                    details_pending,
                    ..
                }) = self.states.get_mut(&kind)
                {
                    *details = merged;
                    *details_pending = false;
                }
            }
            AppUpdate::LogFiles { generation, files } => {
                if generation != self.generation {
                    return;
                }
                self.logs.cursor = files
                    .iter()
                    .position(|f| *f == self.logs.selected_file)
                    .unwrap_or(0);
                self.logs.files = files;
            }
            AppUpdate::LogContent {
                generation,
                filename,
                result,
            } => {
                if generation != self.generation || filename != self.logs.selected_file {
                    return;
                }
                self.logs.loading = false;
                match result {
                    Ok(content) => {
                        self.logs.content = Some(content);
                        self.logs.error = None;
                    }
                    Err(message) => {
                        self.logs.content = None;
                        self.logs.error = Some(format!("Logs: {}", message));
                    }
                }
            }
        }
    }

    // =========================================================================
    // Combined dashboard state
    // =========================================================================

    /// True until every aggregated resource's list fetch has settled.
    /// Detail fetches do not gate this: lists render while rows still show
    /// pending properties.
    pub fn combined_loading(&self) -> bool {
        ResourceKind::AGGREGATED
            .into_iter()
            .any(|kind| !self.state(kind).list_settled())
    }

    /// The single error line for the dashboard: every failed aggregated
    /// resource's message, in fixed order, joined with `"; "`. Resources
    /// without an error contribute nothing.
    pub fn combined_error(&self) -> Option<String> {
        let mut parts = Vec::new();
        for kind in ResourceKind::ERROR_ORDER {
            if let Some(error) = self.state(kind).error() {
                match kind.error_label() {
                    Some(label) => parts.push(format!("{}: {}", label, error)),
                    None => parts.push(error.to_string()),
                }
            }
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }

    // =========================================================================
    // Logs view
    // =========================================================================

    /// First activation fetches the selected log and the file listing;
    /// repeated activation is a no-op while content exists or a fetch is in
    /// flight.
    fn ensure_logs_loaded(&mut self) {
        if self.logs.content.is_none() && !self.logs.loading {
            self.logs.loading = true;
            self.logs.error = None;
            spawn_log_content_fetch(
                self.client.clone(),
                self.logs.selected_file.clone(),
                self.tx.clone(),
                self.cancel.clone(),
                self.generation,
            );
        }
        if !self.logs.files_requested {
            self.logs.files_requested = true;
            spawn_log_file_listing(
                self.client.clone(),
                self.tx.clone(),
                self.cancel.clone(),
                self.generation,
            );
        }
    }

    /// Load the log file under the selector cursor.
    pub fn select_log_file(&mut self) {
        if self.logs.loading {
            return;
        }
        let Some(filename) = self.logs.files.get(self.logs.cursor).cloned() else {
            return;
        };
        if filename == self.logs.selected_file && self.logs.content.is_some() {
            return;
        }
        self.logs.selected_file = filename.clone();
        self.logs.loading = true;
        self.logs.error = None;
        spawn_log_content_fetch(
            self.client.clone(),
            filename,
            self.tx.clone(),
            self.cancel.clone(),
            self.generation,
        );
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn activate_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.section = 0;
        self.selected = 0;
        self.clear_filter();
        if tab == Tab::Logs {
            self.ensure_logs_loaded();
        }
    }

    pub fn next_tab(&mut self) {
        let idx = Tab::ALL.iter().position(|t| *t == self.tab).unwrap_or(0);
        self.activate_tab(Tab::ALL[(idx + 1) % Tab::ALL.len()]);
    }

    pub fn prev_tab(&mut self) {
        let idx = Tab::ALL.iter().position(|t| *t == self.tab).unwrap_or(0);
        self.activate_tab(Tab::ALL[(idx + Tab::ALL.len() - 1) % Tab::ALL.len()]);
    }

    pub fn next_section(&mut self) {
        let sections = self.tab.sections();
        if sections.is_empty() {
            return;
        }
        self.section = (self.section + 1) % sections.len();
        self.selected = 0;
        self.clear_filter();
    }

    /// Resource kind of the focused section, if the current tab has one.
    pub fn focused_kind(&self) -> Option<ResourceKind> {
        self.tab.sections().get(self.section).copied()
    }

    /// Displayable entries of a section, narrowed by the filter when the
    /// section is focused.
    pub fn visible_entries(&self, kind: ResourceKind) -> Vec<&ListEntry> {
        let entries = self.state(kind).display_entries();
        if self.focused_kind() != Some(kind) || self.filter_text.is_empty() {
            return entries;
        }
        let filter = self.filter_text.to_lowercase();
        entries
            .into_iter()
            .filter(|e| {
                e.display_name()
                    .map(|n| n.to_lowercase().contains(&filter))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&ListEntry> {
        let kind = self.focused_kind()?;
        self.visible_entries(kind).get(self.selected).copied()
    }

    pub fn next(&mut self) {
        if self.tab == Tab::Logs {
            if !self.logs.files.is_empty() {
                self.logs.cursor = (self.logs.cursor + 1).min(self.logs.files.len() - 1);
            }
            return;
        }
        if let Some(kind) = self.focused_kind() {
            let len = self.visible_entries(kind).len();
            if len > 0 {
                self.selected = (self.selected + 1).min(len - 1);
            }
        }
    }

    pub fn previous(&mut self) {
        if self.tab == Tab::Logs {
            self.logs.cursor = self.logs.cursor.saturating_sub(1);
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        if let Some(kind) = self.focused_kind() {
            let len = self.visible_entries(kind).len();
            if self.selected >= len {
                self.selected = len.saturating_sub(1);
            }
        }
    }

    pub fn apply_filter(&mut self) {
        self.clamp_selection();
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    // =========================================================================
    // Describe view
    // =========================================================================

    pub fn enter_describe_mode(&mut self) {
        if self.selected_entry().is_some() {
            self.mode = Mode::Describe;
            self.describe_scroll = 0;
        }
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
        self.describe_scroll = 0;
    }

    /// Detail availability for one row of a section.
    pub fn detail_status(&self, kind: ResourceKind, entry: &ListEntry) -> DetailStatus {
        let Some(key) = kind.detail_store_key(entry) else {
            return DetailStatus::NotAddressable;
        };
        match self.state(kind) {
            LoadState::Loaded {
                details,
                details_pending,
                ..
            } => {
                if details.contains_key(&key) {
                    DetailStatus::Ready
                } else if *details_pending {
                    DetailStatus::Pending
                } else {
                    DetailStatus::Unavailable
                }
            }
            _ => DetailStatus::Pending,
        }
    }

    /// Pretty JSON for the describe view: the list entry as listed, plus
    /// its merged properties when the detail fetch succeeded.
    pub fn describe_json(&self) -> Option<String> {
        let kind = self.focused_kind()?;
        let entry = self.selected_entry()?;

        let mut doc = serde_json::Map::new();
        doc.insert("summary".to_string(), serde_json::to_value(entry).ok()?);
        if let Some(key) = kind.detail_store_key(entry) {
            if let Some(properties) = self.state(kind).details().and_then(|d| d.get(&key)) {
                doc.insert("properties".to_string(), properties.clone());
            }
        }

        serde_json::to_string_pretty(&serde_json::Value::Object(doc)).ok()
    }

    pub fn describe_line_count(&self) -> usize {
        self.describe_json().map(|s| s.lines().count()).unwrap_or(0)
    }

    pub fn describe_scroll_to_bottom(&mut self, visible_lines: usize) {
        let total = self.describe_line_count();
        self.describe_scroll = total.saturating_sub(visible_lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tokio::sync::mpsc;

    fn test_app() -> (App, mpsc::UnboundedReceiver<AppUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ManageClient::new("http://127.0.0.1:9").unwrap();
        (App::new(client, Config::default(), tx), rx)
    }

    fn loaded(entries: Vec<Value>, details_pending: bool) -> LoadState {
        LoadState::Loaded {
            data: Value::Null,
            entries: ListEntries::Present(
                entries
                    .into_iter()
                    .map(|v| serde_json::from_value(v).unwrap())
                    .collect(),
            ),
            details: HashMap::new(),
            details_pending,
        }
    }

    fn failed(message: &str) -> LoadState {
        LoadState::Failed {
            error: message.to_string(),
        }
    }

    fn settle(app: &mut App, kind: ResourceKind, state: LoadState) {
        app.apply(AppUpdate::ListSettled {
            kind,
            generation: 0,
            state,
        });
    }

    #[test]
    fn combined_loading_gates_on_lists_not_details() {
        let (mut app, _rx) = test_app();
        assert!(app.combined_loading());

        for kind in ResourceKind::AGGREGATED {
            settle(
                &mut app,
                kind,
                loaded(vec![json!({ "nameref": "x", "idref": "1" })], true),
            );
        }

        // Every list settled, every detail still pending.
        assert!(!app.combined_loading());
    }

    #[test]
    fn combined_loading_ignores_hosts() {
        let (mut app, _rx) = test_app();
        for kind in ResourceKind::AGGREGATED {
            settle(&mut app, kind, loaded(vec![], false));
        }
        // Hosts never settled; the combined state does not care.
        assert!(app.state(ResourceKind::Host).error().is_none());
        assert!(!app.combined_loading());
    }

    #[test]
    fn combined_error_joins_in_fixed_order() {
        let (mut app, _rx) = test_app();
        settle(&mut app, ResourceKind::Database, failed("HTTP 500: Internal Server Error"));
        settle(&mut app, ResourceKind::Forest, failed("HTTP 404: Not Found"));
        settle(&mut app, ResourceKind::Server, failed("connection refused"));
        settle(&mut app, ResourceKind::Group, failed("HTTP 502: Bad Gateway"));
        settle(&mut app, ResourceKind::User, failed("HTTP 401: Unauthorized"));
        settle(&mut app, ResourceKind::Role, failed("HTTP 403: Forbidden"));

        assert_eq!(
            app.combined_error().unwrap(),
            "Forests: HTTP 404: Not Found; \
             Servers: connection refused; \
             Groups: HTTP 502: Bad Gateway; \
             Users: HTTP 401: Unauthorized; \
             Roles: HTTP 403: Forbidden; \
             HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn combined_error_skips_healthy_resources() {
        let (mut app, _rx) = test_app();
        for kind in ResourceKind::AGGREGATED {
            settle(&mut app, kind, loaded(vec![], false));
        }
        assert_eq!(app.combined_error(), None);

        settle(&mut app, ResourceKind::Forest, failed("HTTP 404: Not Found"));
        assert_eq!(
            app.combined_error().unwrap(),
            "Forests: HTTP 404: Not Found"
        );
    }

    #[test]
    fn stale_generation_updates_are_dropped() {
        let (mut app, _rx) = test_app();
        settle(&mut app, ResourceKind::Database, loaded(vec![], false));

        app.cancel.cancel();
        app.generation += 1;

        app.apply(AppUpdate::ListSettled {
            kind: ResourceKind::Database,
            generation: 0,
            state: failed("HTTP 500: Internal Server Error"),
        });
        assert!(app.state(ResourceKind::Database).error().is_none());
    }

    #[test]
    fn details_merge_into_loaded_state() {
        let (mut app, _rx) = test_app();
        settle(
            &mut app,
            ResourceKind::Database,
            loaded(vec![json!({ "nameref": "Documents", "idref": "doc-123" })], true),
        );
        assert!(app.state(ResourceKind::Database).loading());

        let mut details = HashMap::new();
        details.insert("doc-123".to_string(), json!({ "enabled": true }));
        app.apply(AppUpdate::DetailsSettled {
            kind: ResourceKind::Database,
            generation: 0,
            details,
        });

        let state = app.state(ResourceKind::Database);
        assert!(!state.loading());
        assert!(state.details().unwrap().contains_key("doc-123"));
    }

    #[test]
    fn detail_status_reflects_merge_progress() {
        let (mut app, _rx) = test_app();
        settle(
            &mut app,
            ResourceKind::Database,
            loaded(
                vec![
                    json!({ "nameref": "Documents", "idref": "doc-123" }),
                    json!({ "nameref": "Modules" }),
                ],
                true,
            ),
        );

        let keyed: ListEntry =
            serde_json::from_value(json!({ "nameref": "Documents", "idref": "doc-123" })).unwrap();
        let keyless: ListEntry = serde_json::from_value(json!({ "nameref": "Modules" })).unwrap();

        assert_eq!(
            app.detail_status(ResourceKind::Database, &keyed),
            DetailStatus::Pending
        );
        assert_eq!(
            app.detail_status(ResourceKind::Database, &keyless),
            DetailStatus::NotAddressable
        );

        app.apply(AppUpdate::DetailsSettled {
            kind: ResourceKind::Database,
            generation: 0,
            details: HashMap::new(),
        });
        assert_eq!(
            app.detail_status(ResourceKind::Database, &keyed),
            DetailStatus::Unavailable
        );
    }

    #[test]
    fn logs_activation_is_guarded() {
        let (mut app, mut rx) = test_app();
        app.logs.content = Some("2026-01-01 ok".to_string());
        app.logs.files_requested = true;

        app.activate_tab(Tab::Logs);
        app.activate_tab(Tab::Logs);

        // Content present: no fetch was spawned.
        assert!(!app.logs.loading);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn log_error_is_prefixed_and_clears_content() {
        let (mut app, _rx) = test_app();
        app.logs.selected_file = "ErrorLog.txt".to_string();
        app.logs.loading = true;
        app.apply(AppUpdate::LogContent {
            generation: 0,
            filename: "ErrorLog.txt".to_string(),
            result: Err("HTTP 404: Not Found".to_string()),
        });
        assert_eq!(
            app.logs.error.as_deref(),
            Some("Logs: HTTP 404: Not Found")
        );
        assert_eq!(app.logs.content, None);
        assert!(!app.logs.loading);
    }

    #[test]
    fn log_content_for_other_file_is_ignored() {
        let (mut app, _rx) = test_app();
        app.logs.selected_file = "AuditLog.txt".to_string();
        app.logs.loading = true;
        app.apply(AppUpdate::LogContent {
            generation: 0,
            filename: "ErrorLog.txt".to_string(),
            result: Ok("stale".to_string()),
        });
        assert_eq!(app.logs.content, None);
        assert!(app.logs.loading);
    }

    #[test]
    fn filter_narrows_focused_section() {
        let (mut app, _rx) = test_app();
        settle(
            &mut app,
            ResourceKind::Database,
            loaded(
                vec![
                    json!({ "nameref": "Documents", "idref": "d1" }),
                    json!({ "nameref": "Security", "idref": "d2" }),
                ],
                false,
            ),
        );
        app.filter_text = "sec".to_string();
        let visible = app.visible_entries(ResourceKind::Database);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].display_name(), Some("Security"));
    }
}
