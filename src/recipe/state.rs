//! Recipe state and transition.

use super::bits::RecipeBits;
use crate::catalog::{from_cost_units, Catalog};
use crate::error::Result;

/// An ingredient subset with its running flavor and base cost.
///
/// States are immutable: [`toggle`](RecipeState::toggle) builds a new state
/// and leaves the parent untouched, so both can sit in the frontier.
///
/// Equality compares the identity bits, flavor and cost; the insertion
/// order of `ingredients` is not part of a state's identity.
#[derive(Debug, Clone)]
pub struct RecipeState {
    ingredients: Vec<usize>,
    bits: RecipeBits,
    flavor: i64,
    cost_units: i64,
}

impl RecipeState {
    /// The recipe with no ingredients.
    pub fn empty(catalog: &Catalog) -> Self {
        Self {
            ingredients: Vec::new(),
            bits: RecipeBits::empty(catalog.len()),
            flavor: 0,
            cost_units: 0,
        }
    }

    /// Builds a state by adding catalog positions in order; repeats are
    /// ignored.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of the catalog's range.
    pub fn from_indices(catalog: &Catalog, indices: &[usize]) -> Self {
        indices.iter().fold(Self::empty(catalog), |state, &i| {
            if state.contains(i) {
                state
            } else {
                state.toggle(catalog, i)
            }
        })
    }

    /// Builds a state from ingredient names.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownIngredient`](crate::error::ChefError::UnknownIngredient)
    /// for a name without a bit assignment.
    pub fn from_names<I, S>(catalog: &Catalog, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let indices = names
            .into_iter()
            .map(|name| catalog.require_index(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_indices(catalog, &indices))
    }

    /// Adjacent state with ingredient `index` added or removed.
    ///
    /// Flavor moves by twice the pairing score against every other present
    /// ingredient (zero for aroma-neutral pairs) and cost by the toggled
    /// ingredient's minimal cost. Runs in O(|state|).
    pub fn toggle(&self, catalog: &Catalog, index: usize) -> Self {
        let delta: i64 = self
            .ingredients
            .iter()
            .filter(|&&other| other != index)
            .map(|&other| catalog.flavor_between(other, index))
            .sum();
        let cost = catalog.min_cost_units(index);

        if self.contains(index) {
            Self {
                ingredients: self
                    .ingredients
                    .iter()
                    .copied()
                    .filter(|&i| i != index)
                    .collect(),
                bits: self.bits.toggled(index),
                flavor: self.flavor - delta,
                cost_units: self.cost_units - cost,
            }
        } else {
            let mut ingredients = Vec::with_capacity(self.ingredients.len() + 1);
            ingredients.extend_from_slice(&self.ingredients);
            ingredients.push(index);
            Self {
                ingredients,
                bits: self.bits.toggled(index),
                flavor: self.flavor + delta,
                cost_units: self.cost_units + cost,
            }
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.bits.contains(index)
    }

    /// Catalog positions in insertion order.
    pub fn ingredients(&self) -> &[usize] {
        &self.ingredients
    }

    pub fn bits(&self) -> &RecipeBits {
        &self.bits
    }

    pub fn flavor(&self) -> i64 {
        self.flavor
    }

    /// Sum of minimal costs.
    pub fn cost(&self) -> f64 {
        from_cost_units(self.cost_units)
    }

    pub fn cost_units(&self) -> i64 {
        self.cost_units
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Flavor recomputed over every pair, ignoring the running total.
    pub fn recompute_flavor(&self, catalog: &Catalog) -> i64 {
        let items = &self.ingredients;
        let mut flavor = 0;
        for (k, &a) in items.iter().enumerate() {
            for &b in &items[k + 1..] {
                flavor += catalog.flavor_between(a, b);
            }
        }
        flavor
    }

    /// Base cost units recomputed from the ingredient list.
    pub fn recompute_cost_units(&self, catalog: &Catalog) -> i64 {
        self.ingredients
            .iter()
            .map(|&i| catalog.min_cost_units(i))
            .sum()
    }
}

impl PartialEq for RecipeState {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits && self.flavor == other.flavor && self.cost_units == other.cost_units
    }
}

impl Eq for RecipeState {}
