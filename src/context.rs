//! Immutable search context.
//!
//! Bundles everything the transition and scoring functions read: the
//! catalog, the constraint profile and the set of ingredients the user
//! already has. Built once at startup and passed by reference.

use crate::catalog::Catalog;
use crate::profile::ConstraintProfile;

/// Read-only inputs shared by every transition and evaluator.
#[derive(Debug, Clone)]
pub struct SearchContext {
    catalog: Catalog,
    profile: ConstraintProfile,
    possessed: Vec<bool>,
    referenced: Vec<bool>,
}

impl SearchContext {
    pub fn new(catalog: Catalog, profile: ConstraintProfile) -> Self {
        let referenced = catalog
            .ingredients()
            .iter()
            .map(|ing| profile.references(ing))
            .collect();
        let possessed = vec![false; catalog.len()];
        Self {
            catalog,
            profile,
            possessed,
            referenced,
        }
    }

    /// Marks ingredients as already available (no purchase needed).
    ///
    /// Names missing from the catalog are logged and skipped.
    pub fn with_possessed<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            match self.catalog.index_of(name) {
                Some(i) => self.possessed[i] = true,
                None => tracing::warn!(ingredient = name, "possessed ingredient not in catalog"),
            }
        }
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn profile(&self) -> &ConstraintProfile {
        &self.profile
    }

    /// True if the ingredient at `index` needs no purchase.
    pub fn is_possessed(&self, index: usize) -> bool {
        self.possessed[index]
    }

    pub fn possessed_count(&self) -> usize {
        self.possessed.iter().filter(|&&p| p).count()
    }

    /// True if some must-have or perk condition names the ingredient.
    pub fn is_referenced(&self, index: usize) -> bool {
        self.referenced[index]
    }
}
