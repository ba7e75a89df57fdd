//! Bounded top-K of the best recipes seen.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;

use crate::recipe::RecipeBits;
use crate::scoring::ScoredRecipe;

/// Heap entry ordered so the max-heap top is the worst recipe.
struct BoardEntry(Rc<ScoredRecipe>);

impl Ord for BoardEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank_cmp(&other.0)
    }
}

impl PartialOrd for BoardEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BoardEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BoardEntry {}

/// The `capacity` best recipes ever offered, one entry per identity.
pub struct Leaderboard {
    heap: BinaryHeap<BoardEntry>,
    members: HashSet<RecipeBits>,
    capacity: usize,
}

impl Leaderboard {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "leaderboard capacity must be positive");
        Self {
            heap: BinaryHeap::with_capacity(capacity + 1),
            members: HashSet::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Offers a recipe; returns true if the top-K changed.
    ///
    /// While the board is filling every offer changes it. Once full, the
    /// worst entry is dropped and the board changed unless the dropped
    /// entry is the recipe just offered. A recipe whose identity is already
    /// on the board (regenerated after eviction) is ignored: it scores the
    /// same as the entry present and ranks after it.
    pub fn offer(&mut self, recipe: Rc<ScoredRecipe>) -> bool {
        if self.members.contains(recipe.state.bits()) {
            return false;
        }
        let serial = recipe.serial;
        self.members.insert(recipe.state.bits().clone());
        self.heap.push(BoardEntry(recipe));
        if self.heap.len() <= self.capacity {
            return true;
        }
        match self.heap.pop() {
            Some(worst) => {
                self.members.remove(worst.0.state.bits());
                worst.0.serial != serial
            }
            None => false,
        }
    }

    /// True if a recipe with this identity is on the board.
    pub fn contains(&self, bits: &RecipeBits) -> bool {
        self.members.contains(bits)
    }

    /// Entries best first.
    pub fn ranked(&self) -> Vec<Rc<ScoredRecipe>> {
        let mut entries: Vec<Rc<ScoredRecipe>> = self.heap.iter().map(|e| e.0.clone()).collect();
        entries.sort_by(|a, b| a.rank_cmp(b));
        entries
    }

    /// Current worst entry, the next to go.
    pub fn worst(&self) -> Option<&ScoredRecipe> {
        self.heap.peek().map(|e| e.0.as_ref())
    }

    /// Number of entries, at most the capacity.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true before the first offer.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for Leaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaderboard")
            .field("len", &self.heap.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CompatibilityTable, Ingredient};
    use crate::context::SearchContext;
    use crate::profile::ConstraintProfile;
    use crate::recipe::RecipeState;
    use crate::scoring::RankingWeights;

    struct Fixture {
        ctx: SearchContext,
        weights: RankingWeights,
    }

    impl Fixture {
        // Ingredient i costs `costs[i]`; serial = ingredient index.
        fn new(costs: &[f64]) -> Self {
            let catalog = Catalog::new(
                costs
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| Ingredient::new(format!("I{i}"), 0, c))
                    .collect(),
                CompatibilityTable::new(),
            )
            .unwrap();
            Self {
                ctx: SearchContext::new(catalog, ConstraintProfile::new()),
                weights: RankingWeights::default(),
            }
        }

        fn recipe(&self, i: usize) -> Rc<ScoredRecipe> {
            let state = RecipeState::from_indices(self.ctx.catalog(), &[i]);
            Rc::new(ScoredRecipe::new(&self.ctx, state, &self.weights, i as u64))
        }
    }

    #[test]
    fn test_fills_then_bounds() {
        let fx = Fixture::new(&[5.0, 4.0, 3.0, 2.0, 1.0, 6.0]);
        let mut board = Leaderboard::new(3);
        assert!(board.offer(fx.recipe(0)));
        assert!(board.offer(fx.recipe(1)));
        assert!(board.offer(fx.recipe(2)));
        assert_eq!(board.len(), 3);

        // Cheaper: displaces I0.
        assert!(board.offer(fx.recipe(3)));
        assert_eq!(board.len(), 3);
        // Dearer than everything: rejected, no change.
        assert!(!board.offer(fx.recipe(5)));
        assert_eq!(board.len(), 3);

        let serials: Vec<u64> = board.ranked().iter().map(|r| r.serial).collect();
        assert_eq!(serials, vec![3, 2, 1]);
        assert_eq!(board.worst().map(|r| r.serial), Some(1));
    }

    #[test]
    fn test_keeps_best_k_of_all_offers() {
        let costs = [9.0, 2.0, 7.0, 1.0, 8.0, 3.0, 6.0, 4.0, 5.0];
        let fx = Fixture::new(&costs);
        let mut board = Leaderboard::new(4);
        for i in 0..costs.len() {
            board.offer(fx.recipe(i));
            assert!(board.len() <= 4);
        }
        let serials: Vec<u64> = board.ranked().iter().map(|r| r.serial).collect();
        // Costs 1, 2, 3, 4.
        assert_eq!(serials, vec![3, 1, 5, 7]);
    }

    #[test]
    fn test_same_identity_not_listed_twice() {
        let fx = Fixture::new(&[1.0, 2.0, 3.0]);
        let mut board = Leaderboard::new(3);
        assert!(board.offer(fx.recipe(0)));
        assert!(board.offer(fx.recipe(1)));

        // {I0} again under a later serial.
        let state = RecipeState::from_indices(fx.ctx.catalog(), &[0]);
        let again = Rc::new(ScoredRecipe::new(&fx.ctx, state, &fx.weights, 99));
        assert!(!board.offer(again));
        assert_eq!(board.len(), 2);

        assert!(board.offer(fx.recipe(2)));
        let serials: Vec<u64> = board.ranked().iter().map(|r| r.serial).collect();
        assert_eq!(serials, vec![0, 1, 2]);
    }

    #[test]
    fn test_displaced_identity_can_return() {
        let fx = Fixture::new(&[3.0, 2.0, 1.0]);
        let mut board = Leaderboard::new(1);
        assert!(board.offer(fx.recipe(0)));
        assert!(board.offer(fx.recipe(2)));
        assert!(!board.contains(fx.recipe(0).state.bits()));
        assert!(board.contains(fx.recipe(2).state.bits()));
        // Dearer than the holder: offered, rejected, not remembered.
        assert!(!board.offer(fx.recipe(1)));
        assert!(!board.contains(fx.recipe(1).state.bits()));
        assert_eq!(board.len(), 1);
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity_panics() {
        let _ = Leaderboard::new(0);
    }
}
