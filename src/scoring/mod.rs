//! Scoring model.
//!
//! Pure evaluators that measure how well a [`RecipeState`] meets the
//! [`ConstraintProfile`](crate::profile::ConstraintProfile) in a
//! [`SearchContext`], and the lexicographic [`PriorityKey`] that orders the
//! search frontier and the leaderboard.
//!
//! Everything is computed eagerly when a state is generated and stored in a
//! [`ScoredRecipe`]; nothing is cached inside the state itself.

mod evaluators;
mod key;
mod portion;

pub use evaluators::{
    avoid_penalty, cooking_time, must_have_complete_rate, perk_complete_rate, real_cost,
    required_tags_count, to_buy_count, useless_ingredient_count, Evaluation,
};
pub use key::{PriorityKey, RankingWeights};
pub use portion::{extra_portion, PortionPlan};

use crate::context::SearchContext;
use crate::recipe::RecipeState;

/// A recipe state together with its evaluation and ranking key.
#[derive(Debug, Clone)]
pub struct ScoredRecipe {
    pub state: RecipeState,
    pub evaluation: Evaluation,
    pub key: PriorityKey,
    /// Generation order; breaks ties between equal keys, earlier first.
    pub serial: u64,
}

impl ScoredRecipe {
    pub fn new(
        context: &SearchContext,
        state: RecipeState,
        weights: &RankingWeights,
        serial: u64,
    ) -> Self {
        let evaluation = Evaluation::of(context, &state, weights);
        let key = PriorityKey::new(&evaluation, weights);
        Self {
            state,
            evaluation,
            key,
            serial,
        }
    }

    /// Total order used by the frontier and the leaderboard.
    /// `Less` means higher priority.
    pub fn rank_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.serial.cmp(&other.serial))
    }
}
