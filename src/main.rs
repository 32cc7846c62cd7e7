use clap::{ArgAction, Parser, Subcommand};
use gif_fetch::catalog::list::write_template;
use gif_fetch::fetch::{DEFAULT_EXTENSION, DEFAULT_MIN_SIZE};
use gif_fetch::utils::files::batch_check_cached;
use gif_fetch::utils::http::DEFAULT_USER_AGENT;
use gif_fetch::{Catalog, GifFetchError, HttpSource, Item, ResolveOptions, RunOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Download exercise demonstration GIFs with per-exercise URL fallbacks
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download every item in a catalog that is not cached yet
    Fetch {
        /// Catalog file: `.json`, or a `Name | URL` list
        catalog: PathBuf,

        /// Directory where GIFs are saved
        #[arg(short, long, default_value = "exercise-gifs")]
        path: PathBuf,

        /// Per-request timeout in seconds
        #[arg(short, long, default_value_t = 10)]
        timeout: u64,

        /// Smallest body in bytes accepted as a real GIF
        #[arg(long, default_value_t = DEFAULT_MIN_SIZE)]
        min_size: u64,

        /// Pause after each successful download, in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,

        /// Take a longer pause every N items (0 disables)
        #[arg(long, default_value_t = 10)]
        batch_size: usize,

        /// Length of the batch pause, in milliseconds
        #[arg(long, default_value_t = 1000)]
        batch_pause_ms: u64,

        /// User-Agent header sent with every request
        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        user_agent: String,

        /// File extension for cached files
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Extra URL template ({title}, {kebab}) tried after each item's sources
        #[arg(long = "pattern")]
        patterns: Vec<String>,

        /// Decode each download and reject anything that is not a GIF
        #[arg(long, default_value_t = false)]
        verify: bool,
    },
    /// Show which catalog items are already cached
    Status {
        /// Catalog file: `.json`, or a `Name | URL` list
        catalog: PathBuf,

        /// Directory where GIFs are saved
        #[arg(short, long, default_value = "exercise-gifs")]
        path: PathBuf,

        /// File extension for cached files
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Extra URL template ({title}, {kebab}) tried after each item's sources
        #[arg(long = "pattern")]
        patterns: Vec<String>,
    },
    /// Write a commented `Name | URL` list template
    Init {
        /// Where to write the template
        #[arg(default_value = "gif-urls.txt")]
        list: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

fn load_items(catalog: &Path, patterns: &[String]) -> gif_fetch::Result<Vec<Item>> {
    Catalog::load(catalog)?.with_patterns(patterns).into_items()
}

fn report_template(list: &Path) -> gif_fetch::Result<()> {
    if write_template(list)? {
        println!("Created template: {}", list.display());
        println!("Edit this file and add your exercise URLs, then run the download again.");
    } else {
        println!("{} already exists, leaving it untouched", list.display());
    }
    Ok(())
}

async fn execute(command: Commands) -> gif_fetch::Result<()> {
    match command {
        Commands::Fetch {
            catalog,
            path,
            timeout,
            min_size,
            delay_ms,
            batch_size,
            batch_pause_ms,
            user_agent,
            extension,
            patterns,
            verify,
        } => {
            let is_list = catalog
                .extension()
                .map_or(true, |ext| !ext.eq_ignore_ascii_case("json"));
            if is_list && !catalog.exists() {
                println!("Catalog not found: {}", catalog.display());
                return report_template(&catalog);
            }

            let items = load_items(&catalog, &patterns)?;
            if items.is_empty() {
                println!("No valid items found in {}", catalog.display());
                println!("Each line needs the format: Exercise Name | URL");
                return Ok(());
            }

            println!("Catalog: {}", catalog.display());
            println!("Path: {}", path.display());
            println!("Fetching {} exercises\n", items.len());

            let source = HttpSource::new(&user_agent, Duration::from_secs(timeout))?;
            let options = RunOptions {
                resolve: ResolveOptions {
                    min_size,
                    extension,
                    verify,
                },
                delay: Duration::from_millis(delay_ms),
                batch_size,
                batch_pause: Duration::from_millis(batch_pause_ms),
            };

            let interrupt = async {
                if tokio::signal::ctrl_c().await.is_err() {
                    tracing::warn!("Could not listen for Ctrl-C; run will not be interruptible");
                    std::future::pending::<()>().await;
                }
            };

            let summary = gif_fetch::run(&source, &items, &path, &options, interrupt).await?;
            summary.print(&path);
        }
        Commands::Status {
            catalog,
            path,
            extension,
            patterns,
        } => {
            let items = load_items(&catalog, &patterns)?;
            let names: Vec<String> = items.iter().map(|item| item.name.clone()).collect();
            let cached = batch_check_cached(&path, &names, &extension);

            let missing: Vec<&String> = names
                .iter()
                .zip(&cached)
                .filter(|(_, is_cached)| !**is_cached)
                .map(|(name, _)| name)
                .collect();

            println!("Cached: {}/{}", names.len() - missing.len(), names.len());
            if !missing.is_empty() {
                println!("Missing:");
                for name in missing {
                    println!("  - {}", name);
                }
            }
        }
        Commands::Init { list } => report_template(&list)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = execute(args.command).await {
        match &e {
            GifFetchError::Interrupted => eprintln!("\nCancelled by user"),
            other => eprintln!("Error: {}", other),
        }
        std::process::exit(e.exit_code());
    }
}
