//! Plain-text catalog: one `Exercise Name | URL` per line.

use super::{Catalog, Item};
use crate::error::{GifFetchError, Result};
use std::path::Path;

pub const TEMPLATE: &str = "# Exercise GIF URLs
# Format: Exercise Name | URL
# Lines starting with # are ignored
# Repeat a name to give it fallback URLs, tried in order

# Example:
# Bench Press | https://example.com/bench-press.gif
# Squat | https://example.com/squat.gif
# Deadlift | https://example.com/deadlift.gif

# Add your URLs below:

";

/// Parse list-format content. Malformed lines are skipped with a warning.
pub fn parse_list(content: &str) -> Catalog {
    let mut items: Vec<Item> = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_num = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split('|').map(str::trim).collect();
        let [name, url] = parts.as_slice() else {
            tracing::warn!(line = line_num, "Skipping line: invalid format (use: Name | URL)");
            continue;
        };

        if !url.starts_with("http") {
            tracing::warn!(
                line = line_num,
                "Skipping line: URL must start with http:// or https://"
            );
            continue;
        }

        match items.iter_mut().find(|item| item.name == *name) {
            Some(item) => item.sources.push(url.to_string()),
            None => items.push(Item::new(*name, vec![url.to_string()])),
        }
    }

    Catalog {
        patterns: Vec::new(),
        items,
    }
}

/// Write the commented template to `path` unless a file is already there.
///
/// Returns whether a new file was written.
pub fn write_template(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GifFetchError::io(parent, e))?;
    }
    std::fs::write(path, TEMPLATE).map_err(|e| GifFetchError::io(path, e))?;
    Ok(true)
}
