//! Recipe states and the one-ingredient toggle transition.
//!
//! A recipe is a subset of the catalog. Its identity is a bit vector with
//! one bit per catalog position, so two recipes holding the same
//! ingredients compare equal no matter how they were built.

mod bits;
mod state;

pub use bits::RecipeBits;
pub use state::RecipeState;
