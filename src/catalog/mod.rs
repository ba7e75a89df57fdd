//! Ingredient catalog and pairwise compatibility table.
//!
//! The catalog is immutable reference data loaded once before the search
//! starts. Each ingredient's position in the catalog is also its bit
//! position in a recipe's identity, so the catalog order must not change
//! for the lifetime of a search.

mod provider;
mod types;

pub use provider::{parse_available, parse_catalog, CatalogProvider, JsonCatalogProvider};
pub use types::{
    from_cost_units, to_cost_units, Catalog, CompatibilityTable, Ingredient, COST_SCALE,
    MISSING_PAIRING,
};
