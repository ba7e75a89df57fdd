//! Constraint evaluators.
//!
//! Each function is pure: it reads the context and a state, and returns a
//! metric. Portions are not tracked per recipe, so "at portion P or more"
//! means the ingredient can be served at P (its max portion reaches P).

use std::cmp::Ordering;

use super::key::RankingWeights;
use crate::catalog::Ingredient;
use crate::context::SearchContext;
use crate::recipe::RecipeState;

fn members<'a>(
    context: &'a SearchContext,
    state: &'a RecipeState,
) -> impl Iterator<Item = &'a Ingredient> + 'a {
    state
        .ingredients()
        .iter()
        .map(move |&i| context.catalog().get(i))
}

/// Sum over must-have conditions of the qualifying ingredient count,
/// each capped at the condition's required count.
pub fn must_have_complete_rate(context: &SearchContext, state: &RecipeState) -> usize {
    context
        .profile()
        .must_have
        .iter()
        .map(|cond| {
            members(context, state)
                .filter(|ing| cond.qualifies(ing))
                .take(cond.count)
                .count()
        })
        .sum()
}

/// Minus the number of avoid keys matched by at least one ingredient.
pub fn avoid_penalty(context: &SearchContext, state: &RecipeState) -> i64 {
    let violated = context
        .profile()
        .avoid
        .iter()
        .filter(|key| members(context, state).any(|ing| ing.matches(key)))
        .count();
    -(violated as i64)
}

/// Number of satisfied perks.
pub fn perk_complete_rate(context: &SearchContext, state: &RecipeState) -> usize {
    context
        .profile()
        .perks
        .iter()
        .filter(|perk| {
            if perk.is_total_count() {
                let len = state.len() as i64;
                let target = perk.count as i64;
                if target < 0 {
                    len <= target.abs()
                } else {
                    len >= target
                }
            } else {
                let n = members(context, state).filter(|ing| perk.qualifies(ing)).count();
                n as i64 >= perk.count as i64
            }
        })
        .count()
}

/// Number of required tags carried by at least one ingredient.
///
/// Does not check whether the tag's mass target is reachable; see
/// [`extra_portion`](super::extra_portion).
pub fn required_tags_count(context: &SearchContext, state: &RecipeState) -> usize {
    context
        .profile()
        .required_tags
        .iter()
        .filter(|req| members(context, state).any(|ing| ing.tags.contains(&req.tag)))
        .count()
}

/// Aroma-neutral ingredients that serve no must-have or perk condition.
pub fn useless_ingredient_count(context: &SearchContext, state: &RecipeState) -> usize {
    state
        .ingredients()
        .iter()
        .filter(|&&i| context.catalog().get(i).aroma_neutral && !context.is_referenced(i))
        .count()
}

/// Ingredients that still have to be bought.
pub fn to_buy_count(context: &SearchContext, state: &RecipeState) -> usize {
    state
        .ingredients()
        .iter()
        .filter(|&&i| !context.is_possessed(i))
        .count()
}

/// Cooking time of the slowest ingredient; zero for the empty recipe.
pub fn cooking_time(context: &SearchContext, state: &RecipeState) -> u32 {
    members(context, state)
        .map(|ing| ing.cooking_time)
        .max()
        .unwrap_or(0)
}

fn cheapest_extra<'a, I>(qualifying: I, count: usize, portion: i32) -> f64
where
    I: Iterator<Item = &'a Ingredient>,
{
    let mut candidates: Vec<&Ingredient> = qualifying.collect();
    candidates.sort_by(|a, b| a.unit_cost.partial_cmp(&b.unit_cost).unwrap_or(Ordering::Equal));
    candidates
        .into_iter()
        .take(count)
        .map(|ing| ing.extra_cost_at(portion))
        .sum()
}

/// Base cost plus the cost of meeting every portion requirement.
///
/// For each must-have and named perk with a positive portion, the `count`
/// cheapest qualifying ingredients (by unit cost) are raised from their
/// minimal cost to the cost of the required portion.
pub fn real_cost(context: &SearchContext, state: &RecipeState) -> f64 {
    let profile = context.profile();
    let must_have_extra: f64 = profile
        .must_have
        .iter()
        .filter(|cond| cond.portion > 0)
        .map(|cond| {
            cheapest_extra(
                members(context, state).filter(|ing| cond.qualifies(ing)),
                cond.count,
                cond.portion,
            )
        })
        .sum();
    let perk_extra: f64 = profile
        .perks
        .iter()
        .filter(|perk| !perk.is_total_count() && perk.portion > 0)
        .map(|perk| {
            cheapest_extra(
                members(context, state).filter(|ing| perk.qualifies(ing)),
                perk.count.max(0) as usize,
                perk.portion,
            )
        })
        .sum();
    state.cost() + must_have_extra + perk_extra
}

/// Every metric the ranking and the reports need, computed at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub to_buy: usize,
    pub must_have: usize,
    pub avoid_penalty: i64,
    pub perks: usize,
    pub required_tags: usize,
    pub useless: usize,
    pub cooking_time: u32,
    pub real_cost: f64,
    /// Capped flavor plus weighted perk count.
    pub score: i64,
}

impl Evaluation {
    pub fn of(context: &SearchContext, state: &RecipeState, weights: &RankingWeights) -> Self {
        let perks = perk_complete_rate(context, state);
        Self {
            to_buy: to_buy_count(context, state),
            must_have: must_have_complete_rate(context, state),
            avoid_penalty: avoid_penalty(context, state),
            perks,
            required_tags: required_tags_count(context, state),
            useless: useless_ingredient_count(context, state),
            cooking_time: cooking_time(context, state),
            real_cost: real_cost(context, state),
            score: state.flavor().min(weights.flavor_cap) + weights.perk_weight * perks as i64,
        }
    }
}
