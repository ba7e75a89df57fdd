//! Error types for chef-search.

use thiserror::Error;

/// Main error type for catalog loading, profile parsing and search setup.
///
/// Nothing in the search loop itself returns an error: every failure mode
/// surfaces before the first expansion.
#[derive(Debug, Error)]
pub enum ChefError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An option group could not be parsed into a condition.
    #[error("Malformed {option} condition `{input}`: {reason}")]
    MalformedCondition {
        option: &'static str,
        input: String,
        reason: String,
    },

    /// A recipe referenced an ingredient that has no bit assignment.
    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),

    /// The catalog lists the same ingredient name twice.
    #[error("Duplicate ingredient in catalog: {0}")]
    DuplicateIngredient(String),
}

/// Result type alias for chef-search operations.
pub type Result<T> = std::result::Result<T, ChefError>;
