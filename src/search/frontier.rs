//! Open set of not-yet-expanded recipes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use crate::scoring::ScoredRecipe;

/// Heap entry ordered so the max-heap pops the best recipe.
struct OpenEntry(Rc<ScoredRecipe>);

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.rank_cmp(&self.0)
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// Priority queue of open recipes, best first.
#[derive(Default)]
pub struct Frontier {
    heap: BinaryHeap<OpenEntry>,
}

impl Frontier {
    /// Creates an empty open set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a generated recipe.
    pub fn push(&mut self, recipe: Rc<ScoredRecipe>) {
        self.heap.push(OpenEntry(recipe));
    }

    /// Removes and returns the highest-priority recipe.
    pub fn pop(&mut self) -> Option<Rc<ScoredRecipe>> {
        self.heap.pop().map(|e| e.0)
    }

    /// Highest-priority recipe without removing it.
    pub fn peek(&self) -> Option<&ScoredRecipe> {
        self.heap.peek().map(|e| e.0.as_ref())
    }

    /// Number of open recipes.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing is left to expand.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops the lowest-priority `drop_rate` share of the open set.
    ///
    /// Keeps `ceil(len * (1 - drop_rate))` recipes and returns the evicted
    /// ones, worst first, so the caller can forget their identities.
    pub fn evict(&mut self, drop_rate: f64) -> Vec<Rc<ScoredRecipe>> {
        let len = self.heap.len();
        let dropped = ((len as f64) * drop_rate.clamp(0.0, 1.0) + 1e-9).floor() as usize;
        let keep = len - dropped.min(len);

        // Ascending by heap order: lowest priority first.
        let mut sorted = std::mem::take(&mut self.heap).into_sorted_vec();
        let retained = sorted.split_off(len - keep);
        self.heap = BinaryHeap::from(retained);
        self.heap.shrink_to_fit();
        sorted.into_iter().map(|e| e.0).collect()
    }
}

impl std::fmt::Debug for Frontier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frontier").field("len", &self.heap.len()).finish()
    }
}
