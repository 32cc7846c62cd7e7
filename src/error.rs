// Error types for gif-fetch.
// FetchError covers a single source attempt and is never fatal to a run;
// GifFetchError aborts the run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why one candidate source was abandoned.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("transfer interrupted: {0}")]
    Stream(String),

    #[error("HTTP {status} for URL: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("{reason}")]
    InvalidContent { reason: String },
}

impl FetchError {
    pub fn too_small(size: u64, min_size: u64) -> Self {
        FetchError::InvalidContent {
            reason: format!("body too small ({size} bytes, need at least {min_size})"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GifFetchError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog item '{name}' has no usable sources")]
    NoSources { name: String },

    #[error("Catalog item '{name}' normalizes to an empty filename")]
    EmptyName { name: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Interrupted by user")]
    Interrupted,
}

impl GifFetchError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GifFetchError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            GifFetchError::Interrupted => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, GifFetchError>;
