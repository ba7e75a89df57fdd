//! Plain-data recipe summaries for presentation.
//!
//! A [`RecipeSummary`] renders on one line as
//! `#rank: to_buy/must_have/perks/cooking_time/real_cost/flavor/ingredients`,
//! where an ingredient marked `*` must be bought and `(+n)` is the extra
//! portion it needs.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::context::SearchContext;
use crate::scoring::{extra_portion, ScoredRecipe};

/// One ingredient of a summarized recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientLine {
    pub name: String,
    pub to_buy: bool,
    pub portion: i32,
    pub extra_portion: i32,
    pub extra_cost: f64,
}

/// Presentation view of a ranked recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub rank: usize,
    pub to_buy: usize,
    pub must_have: usize,
    pub required_tags: usize,
    pub avoid_penalty: i64,
    pub perks: usize,
    pub cooking_time: u32,
    pub real_cost: f64,
    pub score: i64,
    pub flavor: i64,
    pub ingredients: Vec<IngredientLine>,
}

impl RecipeSummary {
    pub fn new(context: &SearchContext, recipe: &ScoredRecipe, rank: usize) -> Self {
        let eval = &recipe.evaluation;
        let ingredients = extra_portion(context, &recipe.state)
            .into_iter()
            .map(|plan| IngredientLine {
                name: context.catalog().get(plan.index).name.clone(),
                to_buy: !context.is_possessed(plan.index),
                portion: plan.portion,
                extra_portion: plan.extra_portion,
                extra_cost: plan.extra_cost,
            })
            .collect();
        Self {
            rank,
            to_buy: eval.to_buy,
            must_have: eval.must_have,
            required_tags: eval.required_tags,
            avoid_penalty: eval.avoid_penalty,
            perks: eval.perks,
            cooking_time: eval.cooking_time,
            real_cost: eval.real_cost,
            score: eval.score,
            flavor: recipe.state.flavor(),
            ingredients,
        }
    }
}

/// Summaries of `ranked`, numbered from 0.
pub fn summarize(context: &SearchContext, ranked: &[Rc<ScoredRecipe>]) -> Vec<RecipeSummary> {
    ranked
        .iter()
        .enumerate()
        .map(|(rank, recipe)| RecipeSummary::new(context, recipe, rank))
        .collect()
}

impl fmt::Display for IngredientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.to_buy {
            write!(f, "*")?;
        }
        if self.extra_portion > 0 {
            write!(f, "(+{})", self.extra_portion)?;
        }
        Ok(())
    }
}

impl fmt::Display for RecipeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{}: {}/{}/{}/{}/{:.2}/{}/",
            self.rank,
            self.to_buy,
            self.must_have,
            self.perks,
            self.cooking_time,
            self.real_cost,
            self.flavor
        )?;
        for (i, line) in self.ingredients.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CompatibilityTable, Ingredient};
    use crate::profile::{ConstraintProfile, MustHave};
    use crate::recipe::RecipeState;
    use crate::scoring::RankingWeights;

    #[test]
    fn test_summary_line() {
        let catalog = Catalog::new(
            vec![
                Ingredient::new("Butter", 5, 0.5).with_portions(5, 30).with_tag("Fat"),
                Ingredient::new("Apple", 10, 0.25).with_portions(4, 40),
            ],
            CompatibilityTable::new().with_pair("Butter", "Apple", 4),
        )
        .unwrap();
        let profile = ConstraintProfile::new().with_must_have(MustHave::new(["Fat"], 1, 20));
        let ctx = SearchContext::new(catalog, profile).with_possessed(["Apple"]);
        let state = RecipeState::from_indices(ctx.catalog(), &[0, 1]);
        let recipe = ScoredRecipe::new(&ctx, state, &RankingWeights::default(), 0);

        let summary = RecipeSummary::new(&ctx, &recipe, 2);
        assert_eq!(summary.to_buy, 1);
        assert_eq!(summary.ingredients[0].extra_portion, 15);
        // base 2.5 + 1.0, extra 0.5 * 20 - 2.5
        assert!((summary.real_cost - 11.0).abs() < 1e-9);
        assert_eq!(
            summary.to_string(),
            "#2: 1/1/0/10/11.00/8/Butter*(+15), Apple"
        );
    }

    #[test]
    fn test_summarize_numbers_from_zero() {
        let catalog =
            Catalog::new(vec![Ingredient::new("Salt", 0, 0.1)], CompatibilityTable::new()).unwrap();
        let ctx = SearchContext::new(catalog, ConstraintProfile::new());
        let weights = RankingWeights::default();
        let ranked = vec![
            Rc::new(ScoredRecipe::new(&ctx, RecipeState::from_indices(ctx.catalog(), &[0]), &weights, 0)),
            Rc::new(ScoredRecipe::new(&ctx, RecipeState::empty(ctx.catalog()), &weights, 1)),
        ];
        let summaries = summarize(&ctx, &ranked);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].rank, 1);
        assert!(summaries[1].ingredients.is_empty());
        assert_eq!(summaries[1].to_string(), "#1: 0/0/0/0/0.00/0/");
    }
}
