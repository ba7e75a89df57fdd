//! Best-first search engine.
//!
//! # Algorithm
//!
//! 1. Seed the open set with the empty recipe.
//! 2. At each step:
//!    a. Pop the highest-priority open recipe and count it as closed
//!    b. Stop if it cooks longer than (or costs too many times more than)
//!       the best closed recipe
//!    c. Every `memory_sample_interval` closed recipes, sample memory and
//!       evict the worst share of the open set when over the threshold
//!    d. Toggle each catalog ingredient to generate neighbors, skipping
//!       identities already generated; push the rest into the open set and
//!       offer them to the leaderboard
//! 3. Terminate on the stop condition, an empty open set, or the optional
//!    expansion budget.

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, info, trace};

use super::config::SearchConfig;
use super::frontier::Frontier;
use super::leaderboard::Leaderboard;
use super::memory::{MemoryProbe, MemoryStats, ProcessMemory};
use super::types::{
    EvictionReport, LeaderboardUpdate, ProgressSnapshot, SearchObserver, SearchPhase,
    SearchResult,
};
use crate::context::SearchContext;
use crate::error::{ChefError, Result};
use crate::recipe::{RecipeBits, RecipeState};
use crate::scoring::{RankingWeights, ScoredRecipe};

/// Cost of `current` as a multiple of `best`.
///
/// A zero best cost makes any positive cost an infinite multiple.
fn cost_multiple(current: &ScoredRecipe, best: &ScoredRecipe) -> f64 {
    let best_cost = best.evaluation.real_cost;
    let cost = current.evaluation.real_cost;
    if best_cost > 0.0 {
        cost / best_cost
    } else if cost > 0.0 {
        f64::INFINITY
    } else {
        1.0
    }
}

/// Explores the power set of the catalog best-first.
///
/// The open set, the set of generated identities and the leaderboard are
/// owned here and nowhere else.
///
/// # Examples
///
/// ```
/// use chef_search::catalog::{Catalog, CompatibilityTable, Ingredient};
/// use chef_search::context::SearchContext;
/// use chef_search::profile::{ConstraintProfile, MustHave};
/// use chef_search::search::{SearchConfig, SearchEngine, StateBudget};
///
/// let catalog = Catalog::new(
///     vec![
///         Ingredient::new("Butter", 5, 1.0).with_tag("Fat"),
///         Ingredient::new("Apple", 10, 0.5).with_tag("Fruit"),
///     ],
///     CompatibilityTable::new().with_pair("Butter", "Apple", 3),
/// )
/// .unwrap();
/// let profile = ConstraintProfile::new().with_must_have(MustHave::new(["Fat"], 1, 0));
/// let context = SearchContext::new(catalog, profile);
///
/// let config = SearchConfig::default().with_ingredient_points(2).with_max_closed(10);
/// let mut engine = SearchEngine::new(&context, config)
///     .unwrap()
///     .with_memory_probe(StateBudget::new(1_000));
/// let result = engine.run(&mut ());
/// assert!(result.best().is_some());
/// ```
pub struct SearchEngine<'a> {
    context: &'a SearchContext,
    config: SearchConfig,
    weights: RankingWeights,
    probe: Box<dyn MemoryProbe>,
    phase: SearchPhase,
    open: Frontier,
    known: HashSet<RecipeBits>,
    leaderboard: Leaderboard,
    best_closed: Option<Rc<ScoredRecipe>>,
    closed: usize,
    generated: usize,
    evictions: usize,
    next_serial: u64,
}

impl<'a> SearchEngine<'a> {
    /// Creates an idle engine.
    ///
    /// # Errors
    ///
    /// Returns [`ChefError::InvalidConfig`] if `config` fails validation.
    pub fn new(context: &'a SearchContext, config: SearchConfig) -> Result<Self> {
        config.validate().map_err(ChefError::InvalidConfig)?;
        Ok(Self {
            context,
            weights: config.ranking(),
            leaderboard: Leaderboard::new(config.leaderboard_size),
            config,
            probe: Box::new(ProcessMemory::new()),
            phase: SearchPhase::Idle,
            open: Frontier::new(),
            known: HashSet::new(),
            best_closed: None,
            closed: 0,
            generated: 0,
            evictions: 0,
            next_serial: 0,
        })
    }

    /// Replaces the default [`ProcessMemory`] probe.
    pub fn with_memory_probe(mut self, probe: impl MemoryProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// The validated configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Recipes expanded so far.
    pub fn closed(&self) -> usize {
        self.closed
    }

    /// Recipes waiting in the open set.
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Identities currently remembered as generated.
    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    /// True if a recipe with this identity was generated and not evicted.
    pub fn is_known(&self, bits: &RecipeBits) -> bool {
        self.known.contains(bits)
    }

    /// Best recipe expanded so far.
    pub fn best_closed(&self) -> Option<&ScoredRecipe> {
        self.best_closed.as_deref()
    }

    /// Leaderboard, best first.
    pub fn leaderboard(&self) -> Vec<Rc<ScoredRecipe>> {
        self.leaderboard.ranked()
    }

    fn score(&mut self, state: RecipeState) -> Rc<ScoredRecipe> {
        let serial = self.next_serial;
        self.next_serial += 1;
        Rc::new(ScoredRecipe::new(self.context, state, &self.weights, serial))
    }

    fn seed(&mut self) {
        let empty = self.score(RecipeState::empty(self.context.catalog()));
        self.known.insert(empty.state.bits().clone());
        self.open.push(empty);
        self.phase = SearchPhase::Running;
        info!(
            event = "search_start",
            ingredients = self.context.catalog().len(),
            must_have = self.context.profile().must_have.len(),
            perks = self.context.profile().perks.len(),
            avoid = self.context.profile().avoid.len(),
            required_tags = self.context.profile().required_tags.len(),
            leaderboard_size = self.config.leaderboard_size,
        );
    }

    /// Performs one pop/evaluate/expand round and returns the new phase.
    ///
    /// Seeds the frontier on the first call; does nothing once terminal.
    pub fn step<O: SearchObserver>(&mut self, observer: &mut O) -> SearchPhase {
        match self.phase {
            SearchPhase::Idle => self.seed(),
            SearchPhase::Running => {}
            terminal => return terminal,
        }

        if self.config.max_closed.is_some_and(|limit| self.closed >= limit) {
            self.finish(SearchPhase::LimitReached);
            return self.phase;
        }

        let Some(current) = self.open.pop() else {
            self.finish(SearchPhase::Exhausted);
            return self.phase;
        };
        self.closed += 1;

        let best = match self.best_closed.take() {
            Some(best) if best.rank_cmp(&current).is_le() => best,
            _ => current.clone(),
        };
        self.best_closed = Some(best.clone());

        if self.should_stop(&current, &best) {
            info!(
                event = "stop",
                closed = self.closed,
                cooking_time = current.evaluation.cooking_time,
                best_cooking_time = best.evaluation.cooking_time,
                cost_multiple = cost_multiple(&current, &best),
            );
            self.finish(SearchPhase::StoppedByCondition);
            return self.phase;
        }

        if self.closed % self.config.memory_sample_interval == 0 {
            self.sample(&current, &best, observer);
        }

        self.expand(&current, observer);
        self.phase
    }

    /// Runs until a terminal phase and reports the result.
    pub fn run<O: SearchObserver>(&mut self, observer: &mut O) -> SearchResult {
        while !self.step(observer).is_terminal() {}
        let result = self.result();
        observer.on_finish(&result);
        result
    }

    /// Snapshot of the engine's counters and leaderboard.
    pub fn result(&self) -> SearchResult {
        SearchResult {
            outcome: self.phase,
            closed: self.closed,
            open: self.open.len(),
            known: self.known.len(),
            generated: self.generated,
            evictions: self.evictions,
            leaderboard: self.leaderboard.ranked(),
        }
    }

    fn finish(&mut self, phase: SearchPhase) {
        self.phase = phase;
        info!(
            event = "search_end",
            outcome = %phase,
            closed = self.closed,
            open = self.open.len(),
            known = self.known.len(),
            evictions = self.evictions,
        );
    }

    fn should_stop(&self, current: &ScoredRecipe, best: &ScoredRecipe) -> bool {
        if self.config.stops_by_cooking_time() {
            current.evaluation.cooking_time > best.evaluation.cooking_time
        } else {
            cost_multiple(current, best) > self.config.stop_by_cost_multiple
        }
    }

    fn sample<O: SearchObserver>(
        &mut self,
        current: &ScoredRecipe,
        best: &ScoredRecipe,
        observer: &mut O,
    ) {
        let stats = MemoryStats {
            open: self.open.len(),
            known: self.known.len(),
        };
        let memory_usage = self.probe.usage(&stats);
        let progress = ProgressSnapshot {
            closed: self.closed,
            open: stats.open,
            known: stats.known,
            cost_multiple: cost_multiple(current, best),
            memory_usage,
        };
        debug!(
            event = "progress",
            closed = progress.closed,
            open = progress.open,
            known = progress.known,
            cost_multiple = progress.cost_multiple,
            memory_usage = progress.memory_usage,
        );
        observer.on_progress(&progress);

        if memory_usage > self.config.memory_full_threshold {
            self.evict(memory_usage, observer);
        }
    }

    fn evict<O: SearchObserver>(&mut self, memory_usage: f64, observer: &mut O) {
        let evicted = self.open.evict(self.config.open_set_drop_rate);
        // Forget evicted identities so another path can regenerate them.
        for recipe in &evicted {
            self.known.remove(recipe.state.bits());
        }
        self.known.shrink_to_fit();
        self.evictions += 1;

        let report = EvictionReport {
            memory_usage,
            dropped: evicted.len(),
            retained: self.open.len(),
        };
        info!(
            event = "eviction",
            memory_usage = report.memory_usage,
            threshold = self.config.memory_full_threshold,
            dropped = report.dropped,
            retained = report.retained,
        );
        observer.on_eviction(&report);
    }

    fn expand<O: SearchObserver>(&mut self, current: &ScoredRecipe, observer: &mut O) {
        let context = self.context;
        let catalog = context.catalog();
        for index in 0..catalog.len() {
            let bits = current.state.bits().toggled(index);
            if self.known.contains(&bits) {
                continue;
            }
            self.known.insert(bits);
            self.generated += 1;

            let child = self.score(current.state.toggle(catalog, index));
            trace!(
                event = "generated",
                serial = child.serial,
                toggled = %catalog.get(index).name,
                size = child.state.len(),
                real_cost = child.evaluation.real_cost,
            );
            self.open.push(child.clone());

            if self.leaderboard.offer(child) {
                let update = LeaderboardUpdate {
                    known: self.known.len(),
                    ranked: self.leaderboard.ranked(),
                    context,
                };
                debug!(
                    event = "leaderboard",
                    known = update.known,
                    best_cost = update.ranked.first().map(|r| r.evaluation.real_cost),
                );
                observer.on_leaderboard(&update);
            }
        }
    }
}

impl std::fmt::Debug for SearchEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("phase", &self.phase)
            .field("closed", &self.closed)
            .field("open", &self.open.len())
            .field("known", &self.known.len())
            .field("leaderboard", &self.leaderboard)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CompatibilityTable, Ingredient};
    use crate::profile::{ConstraintProfile, MustHave};
    use crate::search::StateBudget;

    #[derive(Default)]
    struct Recorder {
        progress: usize,
        board_sizes: Vec<usize>,
        evictions: Vec<EvictionReport>,
        finished: Option<SearchPhase>,
    }

    impl SearchObserver for Recorder {
        fn on_progress(&mut self, _progress: &ProgressSnapshot) {
            self.progress += 1;
        }

        fn on_leaderboard(&mut self, update: &LeaderboardUpdate<'_>) {
            assert!(update
                .ranked
                .windows(2)
                .all(|pair| pair[0].rank_cmp(&pair[1]).is_lt()));
            self.board_sizes.push(update.ranked.len());
        }

        fn on_eviction(&mut self, report: &EvictionReport) {
            self.evictions.push(*report);
        }

        fn on_finish(&mut self, result: &SearchResult) {
            self.finished = Some(result.outcome);
        }
    }

    /// Reports full memory on exactly one sample.
    struct FullOnce {
        calls: usize,
        full_at: usize,
    }

    impl MemoryProbe for FullOnce {
        fn usage(&mut self, _stats: &MemoryStats) -> f64 {
            self.calls += 1;
            if self.calls == self.full_at {
                1.0
            } else {
                0.0
            }
        }
    }

    /// Free, instant, unpaired ingredients: nothing ever stops the search.
    fn flat_context(n: usize) -> SearchContext {
        let ingredients = (0..n)
            .map(|i| Ingredient::new(format!("I{i}"), 0, 0.0))
            .collect();
        let catalog = Catalog::new(ingredients, CompatibilityTable::new()).unwrap();
        SearchContext::new(catalog, ConstraintProfile::new())
    }

    fn bits_of(context: &SearchContext, indices: &[usize]) -> RecipeBits {
        RecipeState::from_indices(context.catalog(), indices)
            .bits()
            .clone()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let context = flat_context(2);
        let config = SearchConfig::default().with_memory_sample_interval(0);
        let err = SearchEngine::new(&context, config).unwrap_err();
        assert!(matches!(err, ChefError::InvalidConfig(_)));
    }

    #[test]
    fn test_exhausts_power_set_once() {
        let context = flat_context(4);
        let mut engine = SearchEngine::new(&context, SearchConfig::default())
            .unwrap()
            .with_memory_probe(StateBudget::new(1_000_000));
        let mut recorder = Recorder::default();
        let result = engine.run(&mut recorder);

        assert_eq!(result.outcome, SearchPhase::Exhausted);
        assert_eq!(result.closed, 16);
        assert_eq!(result.known, 16);
        assert_eq!(result.generated, 15);
        assert_eq!(result.evictions, 0);
        assert_eq!(recorder.finished, Some(SearchPhase::Exhausted));
    }

    #[test]
    fn test_leaderboard_bounded() {
        let context = flat_context(5);
        let config = SearchConfig::default().with_leaderboard_size(3);
        let mut engine = SearchEngine::new(&context, config)
            .unwrap()
            .with_memory_probe(StateBudget::new(1_000_000));
        let mut recorder = Recorder::default();
        let result = engine.run(&mut recorder);

        assert_eq!(result.leaderboard.len(), 3);
        assert!(!recorder.board_sizes.is_empty());
        assert!(recorder.board_sizes.iter().all(|&len| len <= 3));
        // Singletons buy one ingredient; nothing generated beats them.
        assert!(result.leaderboard.iter().all(|r| r.state.len() == 1));
    }

    #[test]
    fn test_empty_constraints_prefers_cheapest() {
        let catalog = Catalog::new(
            vec![
                Ingredient::new("Dear", 10, 3.0),
                Ingredient::new("Cheap", 10, 1.0),
                Ingredient::new("Mid", 10, 2.0),
            ],
            CompatibilityTable::new(),
        )
        .unwrap();
        let context = SearchContext::new(catalog, ConstraintProfile::new());
        let mut engine = SearchEngine::new(&context, SearchConfig::default())
            .unwrap()
            .with_memory_probe(StateBudget::new(1_000));

        assert_eq!(engine.step(&mut ()), SearchPhase::Running);
        assert_eq!(engine.closed(), 1);
        assert_eq!(engine.open_len(), 3);
        let board = engine.leaderboard();
        let names: Vec<&str> = board
            .iter()
            .map(|r| context.catalog().get(r.state.ingredients()[0]).name.as_str())
            .collect();
        assert_eq!(names, vec!["Cheap", "Mid", "Dear"]);
    }

    #[test]
    fn test_stop_by_cooking_time() {
        let catalog = Catalog::new(
            vec![
                Ingredient::new("Quick", 5, 1.0).with_tag("Fat"),
                Ingredient::new("Slow", 20, 1.0).with_tag("Fat"),
                Ingredient::new("Veg", 10, 1.0),
            ],
            CompatibilityTable::new(),
        )
        .unwrap();
        let profile = ConstraintProfile::new().with_must_have(MustHave::new(["Fat"], 1, 0));
        let context = SearchContext::new(catalog, profile);
        let config = SearchConfig::default().with_ingredient_points(2);
        let mut engine = SearchEngine::new(&context, config)
            .unwrap()
            .with_memory_probe(StateBudget::new(1_000));
        let result = engine.run(&mut ());

        // ∅, Quick, then Quick+Veg cooks 10 > 5.
        assert_eq!(result.outcome, SearchPhase::StoppedByCondition);
        assert_eq!(result.closed, 3);
        let best = engine.best_closed().unwrap();
        assert_eq!(best.state.ingredients(), &[0]);
        assert_eq!(best.evaluation.cooking_time, 5);
    }

    #[test]
    fn test_stop_by_cost_multiple() {
        let catalog = Catalog::new(
            vec![
                Ingredient::new("Butter", 10, 1.0).with_tag("Fat"),
                Ingredient::new("Lard", 10, 1.5).with_tag("Fat"),
                Ingredient::new("Oil", 10, 2.5).with_tag("Fat"),
                Ingredient::new("Apple", 10, 0.1),
            ],
            CompatibilityTable::new(),
        )
        .unwrap();
        let profile = ConstraintProfile::new().with_must_have(MustHave::new(["Fat"], 1, 0));
        let context = SearchContext::new(catalog, profile);
        let config = SearchConfig::default()
            .with_ingredient_points(2)
            .with_cooking_time_modifier(0.0)
            .with_stop_by_cost_multiple(1.8);
        let mut engine = SearchEngine::new(&context, config)
            .unwrap()
            .with_memory_probe(StateBudget::new(1_000));
        let result = engine.run(&mut ());

        // ∅, Butter (1.0), Lard (1.5x), then Oil at 2.5x stops.
        assert_eq!(result.outcome, SearchPhase::StoppedByCondition);
        assert_eq!(result.closed, 4);
        let best = engine.best_closed().unwrap();
        assert_eq!(best.state.ingredients(), &[0]);
    }

    #[test]
    fn test_zero_best_cost_stops_on_positive_cost() {
        let catalog = Catalog::new(
            vec![Ingredient::new("A", 10, 1.0), Ingredient::new("B", 10, 2.0)],
            CompatibilityTable::new(),
        )
        .unwrap();
        let context = SearchContext::new(catalog, ConstraintProfile::new());
        let config = SearchConfig::default().with_cooking_time_modifier(0.0);
        let mut engine = SearchEngine::new(&context, config)
            .unwrap()
            .with_memory_probe(StateBudget::new(1_000));
        let result = engine.run(&mut ());

        assert_eq!(result.outcome, SearchPhase::StoppedByCondition);
        assert_eq!(result.closed, 2);
    }

    #[test]
    fn test_limit_reached() {
        let context = flat_context(5);
        let config = SearchConfig::default().with_max_closed(5);
        let mut engine = SearchEngine::new(&context, config)
            .unwrap()
            .with_memory_probe(StateBudget::new(1_000_000));
        let result = engine.run(&mut ());

        assert_eq!(result.outcome, SearchPhase::LimitReached);
        assert_eq!(result.closed, 5);
        assert_eq!(engine.step(&mut ()), SearchPhase::LimitReached);
        assert_eq!(engine.closed(), 5);
    }

    #[test]
    fn test_eviction_keeps_best_share() {
        let context = flat_context(6);
        let config = SearchConfig::default()
            .with_memory_threshold(0.8, 0.5)
            .with_memory_sample_interval(1);
        let mut engine = SearchEngine::new(&context, config)
            .unwrap()
            .with_memory_probe(StateBudget::new(20));
        let mut recorder = Recorder::default();
        let result = engine.run(&mut recorder);

        assert_eq!(result.outcome, SearchPhase::Exhausted);
        assert!(result.evictions > 0);
        assert_eq!(recorder.evictions.len(), result.evictions);
        assert_eq!(recorder.progress, result.closed);
        for report in &recorder.evictions {
            let before = report.dropped + report.retained;
            assert_eq!(report.dropped, before / 2);
        }
        let dropped: usize = recorder.evictions.iter().map(|r| r.dropped).sum();
        assert_eq!(result.known, result.generated + 1 - dropped);
        assert!(result.closed <= 64);
    }

    #[test]
    fn test_evicted_identity_regenerated() {
        let context = flat_context(3);
        let config = SearchConfig::default().with_memory_sample_interval(1);
        let mut engine = SearchEngine::new(&context, config)
            .unwrap()
            .with_memory_probe(FullOnce {
                calls: 0,
                full_at: 2,
            });
        let mut recorder = Recorder::default();

        engine.step(&mut recorder);
        engine.step(&mut recorder);
        // {I0} was popped; of {I1}, {I2} the later one was dropped.
        assert_eq!(recorder.evictions.len(), 1);
        assert!(engine.is_known(&bits_of(&context, &[1])));
        assert!(!engine.is_known(&bits_of(&context, &[2])));

        let result = engine.run(&mut recorder);
        assert_eq!(result.outcome, SearchPhase::Exhausted);
        assert_eq!(result.closed, 8);
        assert_eq!(result.known, 8);
        // {I2} was generated a second time from {I0, I2}.
        assert_eq!(result.generated, 8);
    }

    #[test]
    fn test_regenerated_identity_listed_once() {
        let context = flat_context(3);
        let config = SearchConfig::default()
            .with_leaderboard_size(8)
            .with_memory_sample_interval(1);
        let mut engine = SearchEngine::new(&context, config)
            .unwrap()
            .with_memory_probe(FullOnce {
                calls: 0,
                full_at: 2,
            });
        let result = engine.run(&mut ());

        assert_eq!(result.evictions, 1);
        assert_eq!(result.generated, 8);
        // Seven non-empty subsets, {I2} among them exactly once.
        assert_eq!(result.leaderboard.len(), 7);
        let distinct: HashSet<&RecipeBits> =
            result.leaderboard.iter().map(|r| r.state.bits()).collect();
        assert_eq!(distinct.len(), 7);
    }
}
