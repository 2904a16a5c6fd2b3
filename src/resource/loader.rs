//! Resource Loader
//!
//! One load per resource kind: fetch the list endpoint, keep the raw
//! payload, extract the typed entry array, then fetch every addressable
//! entry's `properties` concurrently and merge the successes into a keyed
//! map. A list-level failure is terminal for the resource; a detail-level
//! failure is logged and silently skipped.

use std::collections::HashMap;

use futures::future::join_all;
use serde_json::Value;

use super::registry::{ListEntry, ResourceKind};
use crate::manage::ManageClient;

/// Outcome of looking for the `list-items`/`list-item` array inside a list
/// response. `Missing` is a legitimate state, not an error: the raw payload
/// is kept and no detail fetches are issued.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntries {
    Present(Vec<ListEntry>),
    Missing,
}

impl ListEntries {
    pub fn as_slice(&self) -> &[ListEntry] {
        match self {
            ListEntries::Present(entries) => entries,
            ListEntries::Missing => &[],
        }
    }
}

/// Load lifecycle of one resource.
///
/// `Loading -> Loaded | Failed`, with detail fetching tracked as the
/// `details_pending` sub-state of `Loaded`: the entry list is renderable as
/// soon as the list settles, while per-item properties may still be in
/// flight.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded {
        /// Raw list response, stored unconditionally (even when the
        /// envelope is malformed).
        data: Value,
        entries: ListEntries,
        details: HashMap<String, Value>,
        details_pending: bool,
    },
    Failed {
        error: String,
    },
}

impl LoadState {
    /// True once the list fetch has settled, successfully or not. Detail
    /// fetches do not gate this.
    pub fn list_settled(&self) -> bool {
        matches!(self, LoadState::Loaded { .. } | LoadState::Failed { .. })
    }

    /// True from load start until every detail fetch has settled (or until
    /// list-level failure).
    pub fn loading(&self) -> bool {
        match self {
            LoadState::Loading => true,
            LoadState::Loaded {
                details_pending, ..
            } => *details_pending,
            LoadState::Idle | LoadState::Failed { .. } => false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            LoadState::Loaded { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&HashMap<String, Value>> {
        match self {
            LoadState::Loaded { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Entries that carry a nameref, in list order. This is the display
    /// filter: keyless entries stay (they just never get details), nameless
    /// entries are dropped from view while remaining in the raw payload.
    pub fn display_entries(&self) -> Vec<&ListEntry> {
        match self {
            LoadState::Loaded { entries, .. } => entries
                .as_slice()
                .iter()
                .filter(|e| e.display_name().is_some())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Walk `<envelope-root>`.`list-items`.`list-item` and deserialize the
/// array elements. Anything other than an array at that path is `Missing`.
/// Elements that are not objects are dropped from the typed view (they can
/// never carry a nameref or a detail key) but survive in the raw payload.
pub fn extract_entries(kind: ResourceKind, data: &Value) -> ListEntries {
    let items = data
        .get(kind.def().envelope_root)
        .and_then(|v| v.get("list-items"))
        .and_then(|v| v.get("list-item"));

    match items {
        Some(Value::Array(items)) => ListEntries::Present(
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
        ),
        _ => ListEntries::Missing,
    }
}

/// Fetch one resource's list endpoint.
///
/// On success the raw body is stored as-is and the envelope is extracted;
/// `details_pending` is set when there are entries to fetch properties for.
/// On failure the error message becomes the resource's terminal state.
pub async fn fetch_list(kind: ResourceKind, client: &ManageClient) -> LoadState {
    match client.get_json(kind.def().list_path).await {
        Ok(data) => {
            let entries = extract_entries(kind, &data);
            let details_pending = matches!(&entries, ListEntries::Present(e) if !e.is_empty());
            LoadState::Loaded {
                data,
                entries,
                details: HashMap::new(),
                details_pending,
            }
        }
        Err(err) => {
            tracing::error!("{} list fetch failed: {}", kind, err);
            LoadState::Failed {
                error: err.to_string(),
            }
        }
    }
}

/// Fetch `properties` for every entry that carries this kind's detail key.
///
/// Requests run concurrently and are joined regardless of individual
/// outcome; a failed or malformed response is logged as a warning and
/// skipped, without touching its siblings or the resource's error state.
pub async fn fetch_details(
    kind: ResourceKind,
    client: &ManageClient,
    entries: &[ListEntry],
) -> HashMap<String, Value> {
    let requests: Vec<_> = entries
        .iter()
        .filter_map(|entry| {
            let path = kind.detail_path(entry)?;
            let key = kind.detail_store_key(entry)?;
            let name = entry
                .display_name()
                .map(str::to_string)
                .unwrap_or_else(|| key.clone());
            Some(async move {
                match client.get_json(&path).await {
                    Ok(detail) => Some((key, detail)),
                    Err(err) => {
                        tracing::warn!(
                            "failed to fetch {} properties for {}: {}",
                            kind,
                            name,
                            err
                        );
                        None
                    }
                }
            })
        })
        .collect();

    join_all(requests).await.into_iter().flatten().collect()
}

/// Run both phases to completion and return the final state. Used where
/// incremental updates are not needed.
pub async fn load(kind: ResourceKind, client: &ManageClient) -> LoadState {
    match fetch_list(kind, client).await {
        LoadState::Loaded {
            data,
            entries: ListEntries::Present(list),
            ..
        } => {
            let details = fetch_details(kind, client, &list).await;
            LoadState::Loaded {
                data,
                entries: ListEntries::Present(list),
                details,
                details_pending: false,
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn db_list(items: Value) -> Value {
        json!({ "database-default-list": { "list-items": { "list-item": items } } })
    }

    #[test]
    fn extract_entries_from_well_formed_envelope() {
        let data = db_list(json!([
            { "nameref": "Documents", "idref": "doc-123" },
            { "nameref": "Security", "idref": "sec-1" }
        ]));
        let entries = extract_entries(ResourceKind::Database, &data);
        assert_eq!(entries.as_slice().len(), 2);
        assert_eq!(entries.as_slice()[0].display_name(), Some("Documents"));
    }

    #[test]
    fn non_array_envelope_is_missing() {
        for items in [json!("oops"), json!(42), json!({ "nameref": "x" }), Value::Null] {
            let entries = extract_entries(ResourceKind::Database, &db_list(items));
            assert_eq!(entries, ListEntries::Missing);
        }
        // Envelope absent entirely.
        let entries = extract_entries(ResourceKind::Database, &json!({}));
        assert_eq!(entries, ListEntries::Missing);
    }

    #[test]
    fn wrong_kind_envelope_is_missing() {
        let data = json!({ "forest-default-list": { "list-items": { "list-item": [] } } });
        assert_eq!(
            extract_entries(ResourceKind::Database, &data),
            ListEntries::Missing
        );
    }

    #[test]
    fn non_object_elements_are_dropped_from_typed_view() {
        let data = db_list(json!([
            { "nameref": "Documents", "idref": "doc-123" },
            "stray-string",
            17
        ]));
        let entries = extract_entries(ResourceKind::Database, &data);
        assert_eq!(entries.as_slice().len(), 1);
    }

    #[test]
    fn display_filter_drops_nameless_entries() {
        let state = LoadState::Loaded {
            data: Value::Null,
            entries: ListEntries::Present(vec![
                serde_json::from_value(json!({ "nameref": "Documents", "idref": "doc-123" }))
                    .unwrap(),
                serde_json::from_value(json!({ "someOtherField": "value" })).unwrap(),
            ]),
            details: HashMap::new(),
            details_pending: false,
        };
        let shown = state.display_entries();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].display_name(), Some("Documents"));
    }

    #[test]
    fn loading_tracks_detail_sub_state() {
        assert!(LoadState::Loading.loading());
        assert!(!LoadState::Loading.list_settled());

        let pending = LoadState::Loaded {
            data: Value::Null,
            entries: ListEntries::Missing,
            details: HashMap::new(),
            details_pending: true,
        };
        assert!(pending.loading());
        assert!(pending.list_settled());

        let failed = LoadState::Failed {
            error: "HTTP 404: Not Found".to_string(),
        };
        assert!(!failed.loading());
        assert!(failed.list_settled());
        assert_eq!(failed.error(), Some("HTTP 404: Not Found"));
    }
}
