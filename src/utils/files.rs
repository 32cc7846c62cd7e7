use crate::error::{GifFetchError, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Derive the cache filename stem for an item name.
///
/// Lower-cases the name and replaces every run of whitespace, underscores or
/// path separators with a single `-`. Hyphens already present are kept as
/// they are, so `"Push-ups"` stays `push-ups`. Leading dots and hyphens are
/// dropped, so the result is always a plain file name inside the cache
/// directory.
pub fn normalize_name(name: &str) -> String {
    let joined = name
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, '_' | '/' | '\\'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    joined
        .trim_start_matches(|c: char| c == '.' || c == '-')
        .to_string()
}

/// Full path of the cached file for `name` inside `cache_dir`.
pub fn target_path(cache_dir: &Path, name: &str, extension: &str) -> PathBuf {
    cache_dir.join(format!("{}.{}", normalize_name(name), extension))
}

/// Sibling path used while a download is in flight.
pub fn part_path(target: &Path) -> PathBuf {
    let mut file_name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    file_name.push(".part");
    target.with_file_name(file_name)
}

/// Create the cache directory (and parents) if it does not exist yet.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|e| GifFetchError::io(path, e))?;
    tracing::info!(path = %path.display(), "Created directory");
    Ok(())
}

/// Check which item names already have a cached file.
pub fn batch_check_cached(cache_dir: &Path, names: &[String], extension: &str) -> Vec<bool> {
    names
        .par_iter()
        .map(|name| target_path(cache_dir, name, extension).exists())
        .collect()
}

/// An in-progress download written next to its final target.
///
/// The file is removed when the guard is dropped unless it was committed,
/// so an abandoned source or a cancelled run never leaves bytes behind.
pub struct PartFile {
    path: PathBuf,
    file: Option<tokio::fs::File>,
    committed: bool,
}

impl PartFile {
    pub async fn create(target: &Path) -> Result<Self> {
        let path = part_path(target);
        let file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| GifFetchError::io(&path, e))?;

        Ok(Self {
            path,
            file: Some(file),
            committed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(chunk)
                .await
                .map_err(|e| GifFetchError::io(&self.path, e))?;
        }
        Ok(())
    }

    /// Flush and close the handle, returning the size on disk.
    pub async fn finish(&mut self) -> Result<u64> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .await
                .map_err(|e| GifFetchError::io(&self.path, e))?;
            file.sync_all()
                .await
                .map_err(|e| GifFetchError::io(&self.path, e))?;
        }

        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| GifFetchError::io(&self.path, e))?;
        Ok(metadata.len())
    }

    /// Move the finished file into place.
    pub async fn commit(mut self, target: &Path) -> Result<()> {
        self.file.take();
        tokio::fs::rename(&self.path, target)
            .await
            .map_err(|e| GifFetchError::io(target, e))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.file.take();
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to clean up partial download"
                );
            }
        }
    }
}
