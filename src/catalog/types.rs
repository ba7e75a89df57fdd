//! Catalog data types.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{ChefError, Result};

/// Pairing score used when neither direction of a pair is in the table.
pub const MISSING_PAIRING: i32 = -1;

/// Fixed-point scale for costs carried on recipe states.
///
/// Incremental cost updates add and subtract integers, so toggling an
/// ingredient in and out never drifts from the from-scratch sum.
pub const COST_SCALE: f64 = 10_000.0;

/// Converts a cost into fixed-point units.
pub fn to_cost_units(cost: f64) -> i64 {
    (cost * COST_SCALE).round() as i64
}

/// Converts fixed-point units back into a cost.
pub fn from_cost_units(units: i64) -> f64 {
    units as f64 / COST_SCALE
}

/// A single catalog entry.
///
/// Field names follow the catalog JSON (`Name`, `CookingTime`, ...); fields
/// the search does not use are ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ingredient {
    /// Unique key.
    pub name: String,
    /// Minutes; a recipe takes as long as its slowest ingredient.
    pub cooking_time: u32,
    pub calories: i32,
    pub min_portion: i32,
    pub max_portion: i32,
    /// Cost per portion unit.
    pub unit_cost: f64,
    /// Cost at `min_portion`.
    pub min_cost: f64,
    /// Aroma-neutral ingredients neither give nor receive pairing score.
    pub aroma_neutral: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Ingredient {
    /// Creates an ingredient with unit portions and no tags.
    ///
    /// Mostly useful for tests and synthetic catalogs; chain the `with_*`
    /// setters to fill in the rest.
    pub fn new(name: impl Into<String>, cooking_time: u32, unit_cost: f64) -> Self {
        Self {
            name: name.into(),
            cooking_time,
            calories: 0,
            min_portion: 1,
            max_portion: 1,
            unit_cost,
            min_cost: unit_cost,
            aroma_neutral: false,
            tags: BTreeSet::new(),
        }
    }

    /// Sets the portion bounds and recomputes `min_cost` from `unit_cost`.
    pub fn with_portions(mut self, min_portion: i32, max_portion: i32) -> Self {
        self.min_portion = min_portion;
        self.max_portion = max_portion;
        self.min_cost = self.unit_cost * min_portion as f64;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_aroma_neutral(mut self, aroma_neutral: bool) -> Self {
        self.aroma_neutral = aroma_neutral;
        self
    }

    pub fn with_calories(mut self, calories: i32) -> Self {
        self.calories = calories;
        self
    }

    /// Returns true if `key` is this ingredient's name or one of its tags.
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.tags.contains(key)
    }

    /// Returns true if the name or any tag is in `keys`.
    pub fn matches_any(&self, keys: &BTreeSet<String>) -> bool {
        keys.contains(&self.name) || self.tags.iter().any(|tag| keys.contains(tag))
    }

    /// Returns true if the ingredient can be served at `portion` or more.
    pub fn reaches_portion(&self, portion: i32) -> bool {
        self.max_portion >= portion
    }

    /// Extra cost of serving `portion` instead of the minimal portion.
    ///
    /// Never negative: asking for less than the minimal portion costs the
    /// same as the minimal portion.
    pub fn extra_cost_at(&self, portion: i32) -> f64 {
        (self.unit_cost * portion as f64 - self.min_cost).max(0.0)
    }
}

/// Pairwise compatibility scores keyed by ingredient name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompatibilityTable {
    by_name: HashMap<String, HashMap<String, i32>>,
}

impl CompatibilityTable {
    /// Creates an empty table; every pair scores [`MISSING_PAIRING`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the score of pairing `partner` into a recipe holding `name`.
    pub fn insert(&mut self, name: impl Into<String>, partner: impl Into<String>, score: i32) {
        self.by_name
            .entry(name.into())
            .or_default()
            .insert(partner.into(), score);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_pair(mut self, name: &str, partner: &str, score: i32) -> Self {
        self.insert(name, partner, score);
        self
    }

    /// Returns the score stored under `name → partner`, if any.
    pub fn directed(&self, name: &str, partner: &str) -> Option<i32> {
        self.by_name.get(name)?.get(partner).copied()
    }

    /// Symmetric pairing score of two ingredients.
    ///
    /// Looks up `first → second`, then `second → first`, and falls back to
    /// [`MISSING_PAIRING`].
    pub fn pairing(&self, first: &str, second: &str) -> i32 {
        self.directed(first, second)
            .or_else(|| self.directed(second, first))
            .unwrap_or(MISSING_PAIRING)
    }

    /// Number of ingredients with at least one recorded partner.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if no pairing is recorded.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl From<HashMap<String, HashMap<String, i32>>> for CompatibilityTable {
    fn from(by_name: HashMap<String, HashMap<String, i32>>) -> Self {
        Self { by_name }
    }
}

/// The immutable ingredient catalog.
///
/// Assigns every ingredient a bit position (its index), offers O(1) name
/// lookup and precomputes a dense pairing matrix so transitions never touch
/// the string-keyed table.
#[derive(Debug, Clone)]
pub struct Catalog {
    ingredients: Vec<Ingredient>,
    index: HashMap<String, usize>,
    compatibility: CompatibilityTable,
    pairing: Vec<i32>,
    min_cost_units: Vec<i64>,
}

impl Catalog {
    /// Builds a catalog, assigning bit positions in list order.
    ///
    /// # Errors
    ///
    /// Returns [`ChefError::DuplicateIngredient`] if two entries share a name.
    pub fn new(ingredients: Vec<Ingredient>, compatibility: CompatibilityTable) -> Result<Self> {
        let mut index = HashMap::with_capacity(ingredients.len());
        for (i, ingredient) in ingredients.iter().enumerate() {
            if index.insert(ingredient.name.clone(), i).is_some() {
                return Err(ChefError::DuplicateIngredient(ingredient.name.clone()));
            }
        }

        let n = ingredients.len();
        let mut pairing = vec![0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                // Earlier ingredient's entry wins when both directions exist.
                let score = compatibility.pairing(&ingredients[i].name, &ingredients[j].name);
                pairing[i * n + j] = score;
                pairing[j * n + i] = score;
            }
        }

        let min_cost_units = ingredients
            .iter()
            .map(|ing| to_cost_units(ing.min_cost))
            .collect();

        Ok(Self {
            ingredients,
            index,
            compatibility,
            pairing,
            min_cost_units,
        })
    }

    /// Number of ingredients, which is also the bit width of a recipe.
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    /// Returns true if the catalog has no ingredients.
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Ingredients in bit-position order.
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Ingredient at bit position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn get(&self, index: usize) -> &Ingredient {
        &self.ingredients[index]
    }

    /// Bit position of an ingredient, if it is in the catalog.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Bit position of an ingredient that must be in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ChefError::UnknownIngredient`] if `name` has no entry.
    pub fn require_index(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| ChefError::UnknownIngredient(name.to_string()))
    }

    /// Ingredient with this name, if any.
    pub fn by_name(&self, name: &str) -> Option<&Ingredient> {
        self.index_of(name).map(|i| &self.ingredients[i])
    }

    /// The string-keyed table the pairing matrix was built from.
    pub fn compatibility(&self) -> &CompatibilityTable {
        &self.compatibility
    }

    /// Symmetric pairing score between two catalog positions.
    ///
    /// Zero on the diagonal; aroma neutrality is not applied here.
    pub fn pairing(&self, a: usize, b: usize) -> i32 {
        self.pairing[a * self.ingredients.len() + b]
    }

    /// Contribution of the pair to a recipe's flavor: twice the pairing
    /// score, or zero when either side is aroma-neutral.
    pub fn flavor_between(&self, a: usize, b: usize) -> i64 {
        if a == b || self.ingredients[a].aroma_neutral || self.ingredients[b].aroma_neutral {
            0
        } else {
            2 * self.pairing(a, b) as i64
        }
    }

    /// Minimal cost of an ingredient in fixed-point units.
    pub fn min_cost_units(&self, index: usize) -> i64 {
        self.min_cost_units[index]
    }
}
