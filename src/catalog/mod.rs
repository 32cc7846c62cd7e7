//! Exercise catalogs: which items to fetch and where to look for them.

pub mod list;
pub mod patterns;

use crate::error::{GifFetchError, Result};
use crate::utils::files::normalize_name;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// A named exercise and its candidate URLs, in the order they are tried.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            name: name.into(),
            sources,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Catalog {
    /// Load a catalog; `.json` files are parsed as JSON, anything else as a
    /// `Name | URL` list.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GifFetchError::io(path, e))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content).map_err(|source| GifFetchError::CatalogParse {
                path: path.to_path_buf(),
                source,
            })
        } else {
            Ok(list::parse_list(&content))
        }
    }

    pub fn with_patterns(mut self, extra: &[String]) -> Self {
        self.patterns.extend(extra.iter().cloned());
        self
    }

    /// Expand patterns into each item's sources and validate the result.
    ///
    /// Generated URLs go after the explicit ones; repeated URLs keep only
    /// their first position.
    pub fn into_items(self) -> Result<Vec<Item>> {
        let Catalog { patterns, items } = self;

        items
            .into_iter()
            .map(|item| {
                if normalize_name(&item.name).is_empty() {
                    return Err(GifFetchError::EmptyName { name: item.name });
                }

                let generated = patterns::expand_all(&patterns, &item.name);
                let mut seen = HashSet::new();
                let sources: Vec<String> = item
                    .sources
                    .into_iter()
                    .chain(generated)
                    .filter(|url| !url.trim().is_empty())
                    .filter(|url| seen.insert(url.clone()))
                    .collect();

                if sources.is_empty() {
                    return Err(GifFetchError::NoSources { name: item.name });
                }

                Ok(Item::new(item.name, sources))
            })
            .collect()
    }
}
