//! mladmin - Terminal UI for MarkLogic clusters
//!
//! Browses a cluster's Management REST API: databases, forests, app
//! servers, groups, hosts, users, roles and error logs. All resource lists
//! load concurrently on startup; per-item properties stream in behind them.

pub mod app;
pub mod config;
pub mod event;
pub mod manage;
pub mod resource;
pub mod ui;

/// Version injected at compile time via MLADMIN_VERSION env var (set by
/// CI/CD), or "dev" for local builds.
pub const VERSION: &str = match option_env!("MLADMIN_VERSION") {
    Some(v) => v,
    None => "dev",
};
