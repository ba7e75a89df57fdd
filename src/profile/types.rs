//! Constraint types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Ingredient;

/// Requires `count` ingredients matching any of `keys` at `portion` or more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MustHave {
    pub keys: BTreeSet<String>,
    pub count: usize,
    pub portion: i32,
}

impl MustHave {
    pub fn new<I, S>(keys: I, count: usize, portion: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            count,
            portion,
        }
    }

    /// Name or tag match, regardless of portion.
    pub fn matches(&self, ingredient: &Ingredient) -> bool {
        ingredient.matches_any(&self.keys)
    }

    /// Match that can also reach the required portion.
    pub fn qualifies(&self, ingredient: &Ingredient) -> bool {
        ingredient.reaches_portion(self.portion) && self.matches(ingredient)
    }
}

/// A bonus condition.
///
/// With a blank `key` the perk tests the total ingredient count: at least
/// `count` when `count >= 0`, at most `|count|` otherwise. With a name or tag
/// it asks for at least `count` matching ingredients at `portion` or more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perk {
    pub key: String,
    pub count: i32,
    pub portion: i32,
}

impl Perk {
    pub fn new(key: impl Into<String>, count: i32, portion: i32) -> Self {
        Self {
            key: key.into(),
            count,
            portion,
        }
    }

    /// True for the "total ingredient count" form.
    pub fn is_total_count(&self) -> bool {
        self.key.trim().is_empty()
    }

    pub fn matches(&self, ingredient: &Ingredient) -> bool {
        !self.is_total_count() && ingredient.matches(&self.key)
    }

    pub fn qualifies(&self, ingredient: &Ingredient) -> bool {
        ingredient.reaches_portion(self.portion) && self.matches(ingredient)
    }
}

/// A tag the search should include, with a target share of total mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredTag {
    pub tag: String,
    /// Target percentage in `[0, 100]`.
    pub percent: f64,
}

impl RequiredTag {
    pub fn new(tag: impl Into<String>, percent: f64) -> Self {
        Self {
            tag: tag.into(),
            percent,
        }
    }
}

/// All user constraints, immutable once the search starts.
///
/// # Examples
///
/// ```
/// use chef_search::profile::{ConstraintProfile, MustHave, Perk};
///
/// let profile = ConstraintProfile::default()
///     .with_must_have(MustHave::new(["Fat"], 1, 20))
///     .with_avoid("Meat")
///     .with_perk(Perk::new("", -4, 0));
/// assert_eq!(profile.must_have.len(), 1);
/// assert!(profile.avoid.contains("Meat"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintProfile {
    #[serde(default)]
    pub must_have: Vec<MustHave>,
    #[serde(default)]
    pub avoid: BTreeSet<String>,
    #[serde(default)]
    pub perks: Vec<Perk>,
    #[serde(default)]
    pub required_tags: Vec<RequiredTag>,
}

impl ConstraintProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a must-have condition, replacing one with the same key set.
    pub fn with_must_have(mut self, condition: MustHave) -> Self {
        self.must_have.retain(|c| c.keys != condition.keys);
        self.must_have.push(condition);
        self
    }

    pub fn with_avoid(mut self, key: impl Into<String>) -> Self {
        self.avoid.insert(key.into());
        self
    }

    /// Adds a perk, replacing one with the same key.
    pub fn with_perk(mut self, perk: Perk) -> Self {
        self.perks.retain(|p| p.key != perk.key);
        self.perks.push(perk);
        self
    }

    /// Adds a required tag, replacing one with the same tag.
    pub fn with_required_tag(mut self, required: RequiredTag) -> Self {
        self.required_tags.retain(|r| r.tag != required.tag);
        self.required_tags.push(required);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.must_have.is_empty()
            && self.avoid.is_empty()
            && self.perks.is_empty()
            && self.required_tags.is_empty()
    }

    /// True if the ingredient is named by any must-have or perk condition.
    ///
    /// Aroma-neutral ingredients that are not referenced this way add
    /// nothing to a recipe.
    pub fn references(&self, ingredient: &Ingredient) -> bool {
        self.must_have.iter().any(|c| c.matches(ingredient))
            || self.perks.iter().any(|p| p.matches(ingredient))
    }
}
