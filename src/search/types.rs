//! Search lifecycle, results and presentation hooks.

use std::rc::Rc;

use crate::context::SearchContext;
use crate::report::{summarize, RecipeSummary};
use crate::scoring::ScoredRecipe;

/// Lifecycle of a [`SearchEngine`](super::SearchEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Constructed, frontier not seeded yet.
    Idle,
    Running,
    /// The cooking-time or cost stop condition fired.
    StoppedByCondition,
    /// The open set ran dry. Not expected for non-trivial catalogs.
    Exhausted,
    /// `max_closed` expansions were performed.
    LimitReached,
}

impl SearchPhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SearchPhase::Idle | SearchPhase::Running)
    }
}

impl std::fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchPhase::Idle => write!(f, "idle"),
            SearchPhase::Running => write!(f, "running"),
            SearchPhase::StoppedByCondition => write!(f, "stopped by condition"),
            SearchPhase::Exhausted => write!(f, "exhausted"),
            SearchPhase::LimitReached => write!(f, "expansion limit reached"),
        }
    }
}

/// Periodic progress sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub closed: usize,
    pub open: usize,
    pub known: usize,
    /// Real cost of the recipe just popped over the best closed one.
    pub cost_multiple: f64,
    /// Memory usage fraction reported by the probe.
    pub memory_usage: f64,
}

/// Outcome of one open-set eviction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvictionReport {
    pub memory_usage: f64,
    pub dropped: usize,
    pub retained: usize,
}

/// A change of the top-K, ranked best first.
#[derive(Debug)]
pub struct LeaderboardUpdate<'a> {
    /// Number of distinct recipes generated so far.
    pub known: usize,
    pub ranked: Vec<Rc<ScoredRecipe>>,
    pub context: &'a SearchContext,
}

impl LeaderboardUpdate<'_> {
    /// Presentation summaries of the ranked recipes.
    pub fn summaries(&self) -> Vec<RecipeSummary> {
        summarize(self.context, &self.ranked)
    }
}

/// Final state of a run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchPhase,
    pub closed: usize,
    pub open: usize,
    pub known: usize,
    /// Recipes generated by expansion, counting regenerated ones.
    pub generated: usize,
    pub evictions: usize,
    /// Leaderboard, best first.
    pub leaderboard: Vec<Rc<ScoredRecipe>>,
}

impl SearchResult {
    pub fn best(&self) -> Option<&ScoredRecipe> {
        self.leaderboard.first().map(Rc::as_ref)
    }
}

/// Receives progress from a running search.
///
/// All methods default to no-ops; `()` ignores everything.
pub trait SearchObserver {
    fn on_progress(&mut self, _progress: &ProgressSnapshot) {}

    fn on_leaderboard(&mut self, _update: &LeaderboardUpdate<'_>) {}

    fn on_eviction(&mut self, _report: &EvictionReport) {}

    fn on_finish(&mut self, _result: &SearchResult) {}
}

impl SearchObserver for () {}
