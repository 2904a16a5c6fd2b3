//! Log file access
//!
//! The logs endpoint is the one part of the Management API that does not
//! speak the list/detail envelope dialect: the listing returns a flat
//! `log-files` array and the content endpoint returns plain text.

use super::client::{FetchError, ManageClient};

/// Log file opened when the logs view is first activated.
pub const DEFAULT_LOG_FILE: &str = "ErrorLog.txt";

/// Conventional log names used when the listing endpoint is unavailable.
pub const FALLBACK_LOG_FILES: [&str; 5] = [
    "ErrorLog.txt",
    "ErrorLog_1.txt",
    "AuditLog.txt",
    "AuditLog_1.txt",
    "CrashLog.txt",
];

fn fallback_files() -> Vec<String> {
    FALLBACK_LOG_FILES.iter().map(|f| f.to_string()).collect()
}

/// List the log files the cluster exposes.
///
/// Never fails: a request failure or a response without a `log-files` array
/// degrades silently to [`FALLBACK_LOG_FILES`].
pub async fn list_log_files(client: &ManageClient) -> Vec<String> {
    match client.get_json("/manage/v2/logs?format=json").await {
        Ok(data) => match data.get("log-files").and_then(|v| v.as_array()) {
            Some(files) => files
                .iter()
                .filter_map(|f| f.as_str().map(str::to_string))
                .collect(),
            None => {
                tracing::warn!("log listing had no log-files array, using conventional names");
                fallback_files()
            }
        },
        Err(err) => {
            tracing::warn!("log listing failed, using conventional names: {}", err);
            fallback_files()
        }
    }
}

/// Fetch one log file's content as plain text.
pub async fn fetch_log(client: &ManageClient, filename: &str) -> Result<String, FetchError> {
    let path = format!(
        "/manage/v2/logs?filename={}&format=text",
        urlencoding::encode(filename)
    );
    client.get_text(&path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_covers_conventional_names() {
        let files = fallback_files();
        assert_eq!(files.len(), 5);
        assert_eq!(files[0], DEFAULT_LOG_FILE);
        assert!(files.contains(&"CrashLog.txt".to_string()));
    }
}
