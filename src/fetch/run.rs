use super::{resolve, Outcome, ResolveOptions, Source};
use crate::catalog::Item;
use crate::error::{GifFetchError, Result};
use crate::utils::files::ensure_directory;
use crate::utils::http::format_size;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Caller-side policy around `resolve`: how politely to walk the catalog.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub resolve: ResolveOptions,
    /// Pause after each successful download.
    pub delay: Duration,
    /// Take a longer pause every `batch_size` items; 0 disables it.
    pub batch_size: usize,
    pub batch_pause: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            resolve: ResolveOptions::default(),
            delay: Duration::from_millis(500),
            batch_size: 10,
            batch_pause: Duration::from_secs(1),
        }
    }
}

/// Per-run outcome counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes: u64,
}

impl RunSummary {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Skipped => self.skipped += 1,
            Outcome::Downloaded(size) => {
                self.downloaded += 1;
                self.bytes += size;
            }
            Outcome::Failed => self.failed += 1,
        }
    }

    /// Items that have a file in the cache after this run.
    pub fn total_cached(&self) -> usize {
        self.downloaded + self.skipped
    }

    pub fn print(&self, cache_dir: &Path) {
        println!("\n{}", "=".repeat(60));
        println!("Downloaded: {} ({})", self.downloaded, format_size(self.bytes));
        println!("Skipped (already exist): {}", self.skipped);
        println!("Failed: {}", self.failed);
        println!("{}", "=".repeat(60));
        println!("Total GIFs: {}", self.total_cached());
        println!("Location: {}", cache_dir.display());
    }
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Skipped => "skipped (already exists)".to_string(),
        Outcome::Downloaded(size) => format!("done ({})", format_size(size)),
        Outcome::Failed => "failed".to_string(),
    }
}

/// Fetch every item in order, stopping early if `interrupt` completes.
///
/// An interrupt drops the in-flight attempt, which removes its partial
/// file, and returns [`GifFetchError::Interrupted`].
pub async fn run<S, F>(
    source: &S,
    items: &[Item],
    cache_dir: &Path,
    options: &RunOptions,
    interrupt: F,
) -> Result<RunSummary>
where
    S: Source,
    F: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = interrupt => Err(GifFetchError::Interrupted),
        result = run_items(source, items, cache_dir, options) => result,
    }
}

async fn run_items<S: Source>(
    source: &S,
    items: &[Item],
    cache_dir: &Path,
    options: &RunOptions,
) -> Result<RunSummary> {
    ensure_directory(cache_dir)?;

    let total = items.len();
    tracing::info!(items = total, path = %cache_dir.display(), "Starting downloads");

    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut summary = RunSummary::default();

    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        pb.set_message(item.name.clone());

        let outcome = resolve(source, item, cache_dir, &options.resolve).await?;
        summary.record(outcome);

        pb.suspend(|| {
            println!("[{}/{}] {}... {}", position, total, item.name, describe(outcome))
        });
        pb.inc(1);

        if matches!(outcome, Outcome::Downloaded(_)) && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }

        if options.batch_size > 0 && position % options.batch_size == 0 && position < total {
            tokio::time::sleep(options.batch_pause).await;
        }
    }

    pb.finish_and_clear();
    tracing::info!(
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        failed = summary.failed,
        "Run complete"
    );

    Ok(summary)
}
