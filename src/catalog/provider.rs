//! Catalog loading.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use super::types::{Catalog, CompatibilityTable, Ingredient};
use crate::error::Result;

/// Supplies the immutable catalog before the search begins.
///
/// Loading is a blocking, one-shot read; the engine has no notion of a
/// partially loaded catalog.
pub trait CatalogProvider {
    /// Loads the ingredient list and compatibility table.
    fn load_catalog(&self) -> Result<Catalog>;

    /// Names of ingredients that are already available without purchase.
    ///
    /// The default implementation reports none.
    fn load_available(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(rename = "match", default)]
    matches: HashMap<String, RawMatch>,
    indi: Vec<Ingredient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatch {
    #[serde(default)]
    by_name: HashMap<String, i32>,
}

/// Parses a catalog document: `{"match": {...}, "indi": [...]}`.
pub fn parse_catalog(json: &str) -> Result<Catalog> {
    let raw: RawCatalog = serde_json::from_str(json)?;
    let table: CompatibilityTable = raw
        .matches
        .into_iter()
        .map(|(name, m)| (name, m.by_name))
        .collect::<HashMap<_, _>>()
        .into();
    Catalog::new(raw.indi, table)
}

/// Parses a JSON array of ingredient names.
pub fn parse_available(json: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(json)?)
}

/// Reads the catalog and the default-available list from JSON files.
#[derive(Debug, Clone)]
pub struct JsonCatalogProvider {
    catalog_path: PathBuf,
    available_path: Option<PathBuf>,
}

impl JsonCatalogProvider {
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            available_path: None,
        }
    }

    /// Sets the file listing ingredients that are available for free.
    pub fn with_available(mut self, path: impl Into<PathBuf>) -> Self {
        self.available_path = Some(path.into());
        self
    }
}

impl CatalogProvider for JsonCatalogProvider {
    fn load_catalog(&self) -> Result<Catalog> {
        let contents = std::fs::read_to_string(&self.catalog_path)?;
        let catalog = parse_catalog(&contents)?;
        tracing::info!(
            event = "catalog_loaded",
            path = %self.catalog_path.display(),
            ingredients = catalog.len(),
            pairings = catalog.compatibility().len(),
        );
        Ok(catalog)
    }

    fn load_available(&self) -> Result<Vec<String>> {
        match &self.available_path {
            Some(path) => parse_available(&std::fs::read_to_string(path)?),
            None => Ok(Vec::new()),
        }
    }
}
