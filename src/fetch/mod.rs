//! Fetch-and-cache-by-name: the per-item download with source fallback.

pub mod http;
pub mod run;

use crate::catalog::Item;
use crate::error::{FetchError, GifFetchError, Result};
use crate::utils::files::{target_path, PartFile};
use crate::utils::images::validate_gif;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use std::future::Future;
use std::path::Path;

pub const DEFAULT_MIN_SIZE: u64 = 1000;
pub const DEFAULT_EXTENSION: &str = "gif";

/// Response body of a successful request.
pub type ByteStream = BoxStream<'static, std::result::Result<Bytes, FetchError>>;

/// Where bodies come from. `open` resolves once the response status is known
/// and yields the body as a stream of chunks.
pub trait Source {
    fn open(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<ByteStream, FetchError>> + Send;
}

/// Result of resolving one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The cached file was already present; nothing was fetched.
    Skipped,
    /// A source delivered this many bytes.
    Downloaded(u64),
    /// Every source failed.
    Failed,
}

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Bodies smaller than this are treated as error or placeholder pages.
    pub min_size: u64,
    pub extension: String,
    /// Decode the body and require a GIF.
    pub verify: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            extension: DEFAULT_EXTENSION.to_string(),
            verify: false,
        }
    }
}

enum AttemptError {
    Source(FetchError),
    Fatal(GifFetchError),
}

impl From<FetchError> for AttemptError {
    fn from(e: FetchError) -> Self {
        AttemptError::Source(e)
    }
}

impl From<GifFetchError> for AttemptError {
    fn from(e: GifFetchError) -> Self {
        AttemptError::Fatal(e)
    }
}

/// Make sure `cache_dir` holds the file for `item`, trying its sources in
/// order until one delivers a plausible body.
///
/// An existing file short-circuits to [`Outcome::Skipped`] without touching
/// the network. Source failures are logged and move on to the next source;
/// only filesystem faults in `cache_dir` are returned as errors.
pub async fn resolve<S: Source>(
    source: &S,
    item: &Item,
    cache_dir: &Path,
    options: &ResolveOptions,
) -> Result<Outcome> {
    let target = target_path(cache_dir, &item.name, &options.extension);

    let exists = tokio::fs::try_exists(&target)
        .await
        .map_err(|e| GifFetchError::io(&target, e))?;
    if exists {
        tracing::debug!(item = %item.name, path = %target.display(), "Already cached");
        return Ok(Outcome::Skipped);
    }

    for url in &item.sources {
        tracing::debug!(item = %item.name, %url, "Trying source");

        match attempt(source, url, &target, options).await {
            Ok(size) => {
                tracing::debug!(item = %item.name, %url, size, "Downloaded");
                return Ok(Outcome::Downloaded(size));
            }
            Err(AttemptError::Source(e)) => {
                tracing::debug!(item = %item.name, %url, error = %e, "Source failed");
            }
            Err(AttemptError::Fatal(e)) => return Err(e),
        }
    }

    tracing::warn!(item = %item.name, tried = item.sources.len(), "All sources failed");
    Ok(Outcome::Failed)
}

async fn attempt<S: Source>(
    source: &S,
    url: &str,
    target: &Path,
    options: &ResolveOptions,
) -> std::result::Result<u64, AttemptError> {
    let mut body = source.open(url).await?;

    // Dropped on every early return, taking the partial bytes with it.
    let mut part = PartFile::create(target).await?;
    while let Some(chunk) = body.next().await {
        part.write_chunk(&chunk?).await?;
    }
    let size = part.finish().await?;

    if size < options.min_size {
        return Err(FetchError::too_small(size, options.min_size).into());
    }

    if options.verify {
        let path = part.path().to_path_buf();
        tokio::task::spawn_blocking(move || validate_gif(&path))
            .await
            .map_err(|e| FetchError::InvalidContent {
                reason: format!("GIF check did not complete: {}", e),
            })??;
    }

    part.commit(target).await?;
    Ok(size)
}
