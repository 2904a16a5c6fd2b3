//! Management API access layer
//!
//! - [`client`] - HTTP client bound to the API origin
//! - [`logs`] - log file listing and plain-text content

pub mod client;
pub mod logs;

pub use client::{FetchError, ManageClient};
