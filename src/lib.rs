//! Best-first recipe search over an ingredient catalog.
//!
//! Finds small sets of ingredients that satisfy a user's constraints
//! (must-have ingredients or tags, things to avoid, optional perks,
//! required tags) while minimizing purchases, cooking time and cost and
//! maximizing pairing flavor.
//!
//! - [`catalog`]: ingredients, pairing table and JSON loading.
//! - [`profile`]: constraint conditions and their option-group syntax.
//! - [`config`]: TOML run configuration.
//! - [`context`]: the immutable inputs shared by every evaluation.
//! - [`recipe`]: recipe states, bit identity and the toggle transition.
//! - [`scoring`]: pure evaluators and the lexicographic ranking key.
//! - [`search`]: the memory-bounded best-first engine and its leaderboard.
//! - [`report`]: plain-data summaries for presentation.
//!
//! # Architecture
//!
//! The catalog and profile are loaded once into a [`context::SearchContext`]
//! that is passed by reference; there is no global state. The engine is
//! single-threaded and owns its open set, visited identities and
//! leaderboard exclusively.

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod profile;
pub mod recipe;
pub mod report;
pub mod scoring;
pub mod search;

pub use error::{ChefError, Result};
