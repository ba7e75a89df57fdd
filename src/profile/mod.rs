//! User constraint profile.
//!
//! A [`ConstraintProfile`] is built once from configuration and consumed
//! read-only by the scoring model. It holds four kinds of conditions:
//!
//! - **Must-have**: at least `count` ingredients whose name or a tag is in
//!   the condition's key set, each able to reach `portion`.
//! - **Avoid**: names or tags that must not appear.
//! - **Perks**: bonus conditions on a single name/tag, or on the total
//!   ingredient count when the key is blank.
//! - **Required tags**: tags the search is biased toward, each with a
//!   target share of the recipe's total mass.

mod parse;
mod types;

pub use parse::{parse_avoid, parse_must_have, parse_perk, parse_required_tag};
pub use types::{ConstraintProfile, MustHave, Perk, RequiredTag};
