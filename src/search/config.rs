//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::scoring::RankingWeights;

/// Scalar knobs of a search run.
///
/// # Examples
///
/// ```
/// use chef_search::search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_ingredient_points(2)
///     .with_cooking_time_modifier(0.0)
///     .with_stop_by_cost_multiple(1.5)
///     .with_leaderboard_size(5);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.leaderboard_size, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Free ingredient budget; purchases up to this count do not hurt.
    pub ingredient_points: usize,

    /// Weight of cooking time in the ranking. 0 ignores cooking time (salads,
    /// pies) and disables the cooking-time stop.
    pub cooking_time_modifier: f64,

    /// Number of best recipes kept and reported.
    pub leaderboard_size: usize,

    /// Stop once the popped recipe cooks longer than the best closed one.
    ///
    /// Only consulted when `cooking_time_modifier > 0`.
    pub stop_by_cooking_time: bool,

    /// Stop once the popped recipe costs more than this multiple of the
    /// best closed recipe. At least 1.0.
    pub stop_by_cost_multiple: f64,

    /// Memory usage fraction in `[0.1, 1.0]` that triggers eviction.
    pub memory_full_threshold: f64,

    /// Fraction of the open set in `[0.1, 1.0]` dropped on eviction.
    pub open_set_drop_rate: f64,

    /// Closed states between memory samples and progress reports.
    pub memory_sample_interval: usize,

    /// Flavor ceiling inside the score key.
    pub flavor_cap: i64,

    /// Score bonus per satisfied perk.
    pub perk_weight: i64,

    /// Optional cap on expanded states. `None` runs until a stop
    /// condition or exhaustion.
    pub max_closed: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ingredient_points: 0,
            cooking_time_modifier: 1.0,
            leaderboard_size: 10,
            stop_by_cooking_time: true,
            stop_by_cost_multiple: 1.8,
            memory_full_threshold: 0.8,
            open_set_drop_rate: 0.9,
            memory_sample_interval: 100,
            flavor_cap: 50,
            perk_weight: 10,
            max_closed: None,
        }
    }
}

impl SearchConfig {
    /// Sets the number of purchases that do not count against a recipe.
    pub fn with_ingredient_points(mut self, n: usize) -> Self {
        self.ingredient_points = n;
        self
    }

    /// Sets the cooking-time weight; 0 also disables the cooking-time stop.
    pub fn with_cooking_time_modifier(mut self, modifier: f64) -> Self {
        self.cooking_time_modifier = modifier;
        self
    }

    /// Sets the number of recipes kept on the leaderboard.
    pub fn with_leaderboard_size(mut self, k: usize) -> Self {
        self.leaderboard_size = k;
        self
    }

    /// Enables or disables the cooking-time stop.
    pub fn with_stop_by_cooking_time(mut self, enabled: bool) -> Self {
        self.stop_by_cooking_time = enabled;
        self
    }

    /// Sets the cost multiple of the best closed recipe that stops the search.
    pub fn with_stop_by_cost_multiple(mut self, multiple: f64) -> Self {
        self.stop_by_cost_multiple = multiple;
        self
    }

    /// Sets the eviction trigger and the fraction dropped when it fires.
    pub fn with_memory_threshold(mut self, full_threshold: f64, drop_rate: f64) -> Self {
        self.memory_full_threshold = full_threshold;
        self.open_set_drop_rate = drop_rate;
        self
    }

    /// Sets the number of closed recipes between memory samples.
    pub fn with_memory_sample_interval(mut self, n: usize) -> Self {
        self.memory_sample_interval = n;
        self
    }

    /// Sets the flavor ceiling inside the score key.
    pub fn with_flavor_cap(mut self, cap: i64) -> Self {
        self.flavor_cap = cap;
        self
    }

    /// Sets the score bonus per satisfied perk.
    pub fn with_perk_weight(mut self, weight: i64) -> Self {
        self.perk_weight = weight;
        self
    }

    /// Sets a hard cap on expanded recipes.
    pub fn with_max_closed(mut self, n: usize) -> Self {
        self.max_closed = Some(n);
        self
    }

    /// Knobs that feed the ranking key.
    pub fn ranking(&self) -> RankingWeights {
        RankingWeights {
            ingredient_points: self.ingredient_points,
            cooking_time_modifier: self.cooking_time_modifier,
            flavor_cap: self.flavor_cap,
            perk_weight: self.perk_weight,
        }
    }

    /// Whether the cooking-time stop applies instead of the cost stop.
    pub fn stops_by_cooking_time(&self) -> bool {
        self.cooking_time_modifier > 0.0 && self.stop_by_cooking_time
    }

    /// Pulls every value into its valid range.
    ///
    /// Command-line input is clamped rather than rejected.
    pub fn clamped(mut self) -> Self {
        if !self.cooking_time_modifier.is_finite() {
            self.cooking_time_modifier = 1.0;
        }
        self.cooking_time_modifier = self.cooking_time_modifier.max(0.0);
        self.leaderboard_size = self.leaderboard_size.max(1);
        if !self.stop_by_cost_multiple.is_finite() {
            self.stop_by_cost_multiple = 1.8;
        }
        self.stop_by_cost_multiple = self.stop_by_cost_multiple.max(1.0);
        self.memory_full_threshold = clamp_fraction(self.memory_full_threshold);
        self.open_set_drop_rate = clamp_fraction(self.open_set_drop_rate);
        self.memory_sample_interval = self.memory_sample_interval.max(1);
        self.perk_weight = self.perk_weight.max(0);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.cooking_time_modifier.is_finite() && self.cooking_time_modifier >= 0.0) {
            return Err("cooking_time_modifier must be a finite value >= 0".into());
        }
        if self.leaderboard_size == 0 {
            return Err("leaderboard_size must be at least 1".into());
        }
        if !(self.stop_by_cost_multiple.is_finite() && self.stop_by_cost_multiple >= 1.0) {
            return Err("stop_by_cost_multiple must be a finite value >= 1.0".into());
        }
        if !(0.1..=1.0).contains(&self.memory_full_threshold) {
            return Err("memory_full_threshold must be within [0.1, 1.0]".into());
        }
        if !(0.1..=1.0).contains(&self.open_set_drop_rate) {
            return Err("open_set_drop_rate must be within [0.1, 1.0]".into());
        }
        if self.memory_sample_interval == 0 {
            return Err("memory_sample_interval must be at least 1".into());
        }
        if self.perk_weight < 0 {
            return Err("perk_weight must be non-negative".into());
        }
        Ok(())
    }
}

fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.1
    } else {
        value.clamp(0.1, 1.0)
    }
}
