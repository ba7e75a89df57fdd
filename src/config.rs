//! Run configuration loaded from TOML.
//!
//! Constraint conditions are written in the same option-group syntax the
//! command line accepts, so a config file and a flag are interchangeable:
//!
//! ```toml
//! must_have = ["Fat,1,20", "Nut,Apple,3"]
//! perks = [",-4", "Fruit,2"]
//! avoid = ["Meat"]
//! required_tags = ["Sweet,30"]
//! ingredients = ["Butter"]
//!
//! [search]
//! ingredient_points = 2
//! cooking_time_modifier = 0.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::profile::{
    parse_avoid, parse_must_have, parse_perk, parse_required_tag, ConstraintProfile,
};
use crate::search::SearchConfig;

/// Profile, purchased ingredients and search knobs of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ChefConfig {
    /// Must-have groups, `NAME[,NAME...][,COUNT[,PORTION]]`.
    pub must_have: Vec<String>,
    /// Perk groups, `KEY[,COUNT[,PORTION]]`.
    pub perks: Vec<String>,
    /// Avoid keys; an entry may itself be a comma-separated list.
    pub avoid: Vec<String>,
    /// Required tag groups, `TAG[,PERCENT]`.
    pub required_tags: Vec<String>,
    /// Ingredients already purchased, on top of the default-available list.
    pub ingredients: Vec<String>,
    pub search: SearchConfig,
}

impl ChefConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parses every condition group into a profile.
    ///
    /// A later group with the same key replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`ChefError::MalformedCondition`](crate::ChefError::MalformedCondition)
    /// for the first group that does not parse.
    pub fn profile(&self) -> Result<ConstraintProfile> {
        let mut profile = ConstraintProfile::new();
        for group in &self.must_have {
            profile = profile.with_must_have(parse_must_have(group)?);
        }
        for group in &self.perks {
            profile = profile.with_perk(parse_perk(group)?);
        }
        for group in &self.required_tags {
            profile = profile.with_required_tag(parse_required_tag(group)?);
        }
        for list in &self.avoid {
            profile.avoid.extend(parse_avoid(list));
        }
        Ok(profile)
    }
}
