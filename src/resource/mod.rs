//! Resource abstraction layer
//!
//! The Management API repeats one shape across every resource kind: a list
//! endpoint wrapping its entries in a `<kind>-default-list` envelope, and a
//! per-item `properties` endpoint addressed by a kind-specific key. This
//! module factors that shape into a single generic loader parameterized by
//! a static per-kind definition.
//!
//! - [`registry`] - per-kind definitions (paths, envelope roots, detail-key
//!   rules, display columns)
//! - [`loader`] - list fetch, envelope extraction, concurrent detail
//!   fetch-and-merge, and the per-resource load state machine

pub mod loader;
pub mod registry;

pub use loader::{extract_entries, fetch_details, fetch_list, load, ListEntries, LoadState};
pub use registry::{ColumnDef, DetailKey, EntryField, ListEntry, ResourceDef, ResourceKind};
