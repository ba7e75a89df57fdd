//! Best-first recipe search.
//!
//! The engine explores the power set of the catalog starting from the
//! empty recipe. Neighbors differ by exactly one ingredient, every
//! identity is generated at most once while it is remembered, and the
//! frontier is always expanded best-first under the scoring key.
//!
//! # Memory
//!
//! The open set grows far faster than it is consumed. Every
//! `memory_sample_interval` closed states a [`MemoryProbe`] is sampled;
//! above `memory_full_threshold` the worst `open_set_drop_rate` share of
//! the open set is evicted and its identities forgotten.
//!
//! # References
//!
//! - Pearl (1984), "Heuristics: Intelligent Search Strategies for Computer
//!   Problem Solving"
//! - Russell & Norvig (1994), "Memory-bounded heuristic search", SMA*

mod config;
mod frontier;
mod leaderboard;
mod memory;
mod runner;
mod types;

pub use config::SearchConfig;
pub use frontier::Frontier;
pub use leaderboard::Leaderboard;
pub use memory::{MemoryProbe, MemoryStats, StateBudget, ProcessMemory};
pub use runner::SearchEngine;
pub use types::{
    EvictionReport, LeaderboardUpdate, ProgressSnapshot, SearchObserver, SearchPhase,
    SearchResult,
};
