//! Lexicographic ranking key.
//!
//! Keys are compared field by field, most significant first; a later field
//! only matters when every earlier one ties. `Less` means "better".

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::evaluators::Evaluation;

/// Scalar knobs that shape the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    /// Purchases up to this many are free.
    pub ingredient_points: usize,
    /// Multiplies cooking time; 0 makes it irrelevant.
    pub cooking_time_modifier: f64,
    /// Flavor above this value does not improve the score.
    pub flavor_cap: i64,
    /// Score added per satisfied perk.
    pub perk_weight: i64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            ingredient_points: 0,
            cooking_time_modifier: 1.0,
            flavor_cap: 50,
            perk_weight: 10,
        }
    }
}

/// Ranking key of a recipe.
///
/// Order, most significant first:
///
/// 1. `purchase` = max(to-buy count, ingredient points), ascending
/// 2. `must_have` completion, descending
/// 3. `required_tags` present, descending
/// 4. `avoid_penalty`, descending (closer to zero is better)
/// 5. `useless` aroma-neutral ingredients, ascending
/// 6. `weighted_cooking_time`, ascending
/// 7. `score` (capped flavor + weighted perks), descending
/// 8. `real_cost`, ascending
#[derive(Debug, Clone, Copy)]
pub struct PriorityKey {
    pub purchase: usize,
    pub must_have: usize,
    pub required_tags: usize,
    pub avoid_penalty: i64,
    pub useless: usize,
    pub weighted_cooking_time: f64,
    pub score: i64,
    pub real_cost: f64,
}

impl PriorityKey {
    pub fn new(evaluation: &Evaluation, weights: &RankingWeights) -> Self {
        Self {
            purchase: evaluation.to_buy.max(weights.ingredient_points),
            must_have: evaluation.must_have,
            required_tags: evaluation.required_tags,
            avoid_penalty: evaluation.avoid_penalty,
            useless: evaluation.useless,
            weighted_cooking_time: evaluation.cooking_time as f64 * weights.cooking_time_modifier,
            score: evaluation.score,
            real_cost: evaluation.real_cost,
        }
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.purchase
            .cmp(&other.purchase)
            .then_with(|| other.must_have.cmp(&self.must_have))
            .then_with(|| other.required_tags.cmp(&self.required_tags))
            .then_with(|| other.avoid_penalty.cmp(&self.avoid_penalty))
            .then_with(|| self.useless.cmp(&other.useless))
            .then_with(|| {
                self.weighted_cooking_time
                    .total_cmp(&other.weighted_cooking_time)
            })
            .then_with(|| other.score.cmp(&self.score))
            .then_with(|| self.real_cost.total_cmp(&other.real_cost))
    }
}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PriorityKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriorityKey {}
