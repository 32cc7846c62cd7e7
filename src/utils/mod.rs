//! Utility modules for gif-fetch
//!
//! - `files`: cache paths, name normalization and partial-download handling
//! - `http`: HTTP client construction
//! - `images`: GIF content checks

pub mod files;
pub mod http;
pub mod images;
