use crate::error::{GifFetchError, Result};
use std::time::Duration;

/// Browser-like identifier sent with every request; some media hosts
/// reject the default reqwest user agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the shared client used for every source attempt in a run.
///
/// The timeout covers the whole request, body included.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(GifFetchError::Client)
}

/// Human readable size, in megabytes with two decimals.
pub fn format_size(size_bytes: u64) -> String {
    format!("{:.2} MB", size_bytes as f64 / (1024.0 * 1024.0))
}
