//! Download exercise demonstration GIFs into a local cache, one item at a
//! time, falling back through each item's candidate URLs.

pub mod catalog;
pub mod error;
pub mod fetch;
pub mod utils;

pub use catalog::{Catalog, Item};
pub use error::{FetchError, GifFetchError, Result};
pub use fetch::http::HttpSource;
pub use fetch::run::{run, RunOptions, RunSummary};
pub use fetch::{resolve, Outcome, ResolveOptions, Source};
