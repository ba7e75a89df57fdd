//! Portion planning.
//!
//! Works out how much of each ingredient to serve so that portion-bearing
//! must-have and perk conditions hold and required tags reach their share
//! of total mass. The tag balancing is a best-effort heuristic: portions
//! are capped at each ingredient's maximum, so a target may stay out of
//! reach, and raising one tag can dilute another tag balanced earlier.

use std::cmp::Ordering;

use serde::Serialize;

use crate::context::SearchContext;
use crate::recipe::RecipeState;

/// Planned portion of one ingredient of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortionPlan {
    /// Catalog position.
    pub index: usize,
    pub portion: i32,
    /// Portion above the ingredient's minimum.
    pub extra_portion: i32,
    /// Cost of `extra_portion`.
    pub extra_cost: f64,
}

/// Plans portions for every ingredient of `state`, in insertion order.
pub fn extra_portion(context: &SearchContext, state: &RecipeState) -> Vec<PortionPlan> {
    let catalog = context.catalog();
    let profile = context.profile();
    let items = state.ingredients();
    let mut portions: Vec<i32> = items.iter().map(|&i| catalog.get(i).min_portion).collect();

    // Positions within `items`, cheapest unit cost first.
    let cheapest = |pred: &dyn Fn(usize) -> bool| -> Vec<usize> {
        let mut slots: Vec<usize> = (0..items.len()).filter(|&k| pred(items[k])).collect();
        slots.sort_by(|&a, &b| {
            catalog
                .get(items[a])
                .unit_cost
                .partial_cmp(&catalog.get(items[b]).unit_cost)
                .unwrap_or(Ordering::Equal)
        });
        slots
    };

    let raise = |slots: Vec<usize>, count: usize, portion: i32, portions: &mut [i32]| {
        for k in slots.into_iter().take(count) {
            let cap = catalog.get(items[k]).max_portion;
            portions[k] = portions[k].max(portion.min(cap));
        }
    };

    for cond in profile.must_have.iter().filter(|c| c.portion > 0) {
        let slots = cheapest(&|i| cond.qualifies(catalog.get(i)));
        raise(slots, cond.count, cond.portion, &mut portions[..]);
    }
    for perk in profile
        .perks
        .iter()
        .filter(|p| !p.is_total_count() && p.portion > 0)
    {
        let slots = cheapest(&|i| perk.qualifies(catalog.get(i)));
        raise(slots, perk.count.max(0) as usize, perk.portion, &mut portions[..]);
    }

    for req in profile.required_tags.iter().filter(|r| r.percent > 0.0) {
        let target = req.percent / 100.0;
        let slots = cheapest(&|i| catalog.get(i).tags.contains(&req.tag));
        if slots.is_empty() {
            continue;
        }
        let total: f64 = portions.iter().map(|&p| p as f64).sum();
        let tagged: f64 = slots.iter().map(|&k| portions[k] as f64).sum();
        if total <= 0.0 || tagged / total >= target {
            continue;
        }
        // (tagged + x) / (total + x) >= target
        let mut needed = if target >= 1.0 {
            f64::INFINITY
        } else {
            ((target * total - tagged) / (1.0 - target)).ceil()
        };
        for k in slots {
            if needed <= 0.0 {
                break;
            }
            let headroom = (catalog.get(items[k]).max_portion - portions[k]).max(0) as f64;
            let add = headroom.min(needed);
            portions[k] += add as i32;
            needed -= add;
        }
    }

    items
        .iter()
        .zip(portions)
        .map(|(&index, portion)| {
            let ing = catalog.get(index);
            let extra_portion = (portion - ing.min_portion).max(0);
            PortionPlan {
                index,
                portion,
                extra_portion,
                extra_cost: if extra_portion > 0 {
                    ing.extra_cost_at(portion)
                } else {
                    0.0
                },
            }
        })
        .collect()
}
