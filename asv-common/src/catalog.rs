//! Reference catalog: common name -> taxonomic fields
//!
//! Loaded once at process start from a TOML table and immutable afterwards.
//! The specimen selector is populated from `all_common_names()`, so every
//! name a client can submit is expected to resolve through `lookup()`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One immutable catalog row, keyed by common name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Primary specimen identifier shown in the selector
    pub common_name: String,
    pub class: String,
    pub order: String,
    pub family: String,
    /// Genus, or the sentinel "Unknown" for unidentified specimens
    pub genus: String,
    /// Species epithet, or the sentinel "Unknown"
    pub species: String,
    /// Free-text identification notes shown on the specimen card
    #[serde(default)]
    pub id_notes: String,
}

/// On-disk catalog file layout: `[[entry]]` tables
#[derive(Debug, Deserialize)]
struct CatalogFile {
    entry: Vec<CatalogEntry>,
}

/// Read-only lookup table from common name to taxonomic fields.
///
/// Backed by a BTreeMap so `all_common_names()` comes out in ascending
/// lexical order without a separate sort.
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

/// Default catalog shipped with the service
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

impl ReferenceCatalog {
    /// Build a catalog from already-parsed entries.
    ///
    /// Rejects duplicate common names: the common name is the key the whole
    /// engine resolves taxonomy through.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for entry in entries {
            let key = entry.common_name.clone();
            if map.insert(key.clone(), entry).is_some() {
                return Err(Error::Catalog(format!(
                    "Duplicate common name in catalog: {}",
                    key
                )));
            }
        }
        Ok(Self { entries: map })
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text)
            .map_err(|e| Error::Catalog(format!("Failed to parse catalog TOML: {}", e)))?;
        Self::from_entries(file.entry)
    }

    /// Load a catalog from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            entries = catalog.len(),
            "Reference catalog loaded"
        );
        Ok(catalog)
    }

    /// The catalog compiled into the binary, used when no catalog file is
    /// configured.
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_CATALOG).expect("built-in catalog must parse")
    }

    /// Exact-match lookup by common name
    pub fn lookup(&self, common_name: &str) -> Option<&CatalogEntry> {
        self.entries.get(common_name)
    }

    /// All common names in ascending lexical order (specimen selector)
    pub fn all_common_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
