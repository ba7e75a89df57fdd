//! Option-group parsing.
//!
//! Conditions arrive as comma-separated groups, e.g. `Nut,Apple,3,20` for
//! "3 Nut or Apple ingredients at portion 20 or more". Parsing happens once
//! at load time; a malformed group is a hard error.

use std::collections::BTreeSet;

use super::types::{MustHave, Perk, RequiredTag};
use crate::error::{ChefError, Result};

fn tokens(group: &str) -> Vec<&str> {
    group.split(',').map(str::trim).collect()
}

fn malformed(option: &'static str, group: &str, reason: impl Into<String>) -> ChefError {
    ChefError::MalformedCondition {
        option,
        input: group.to_string(),
        reason: reason.into(),
    }
}

/// Parses `NAME[,NAME...][,COUNT[,PORTION]]`.
///
/// Leading tokens are names while they are non-numeric or while at least two
/// tokens follow them, so a numeric ingredient name is still accepted in
/// front position. COUNT is clamped to at least 1 and PORTION to at least 0.
///
/// ```
/// use chef_search::profile::parse_must_have;
///
/// let cond = parse_must_have("Nut,Apple,3,20").unwrap();
/// assert_eq!(cond.count, 3);
/// assert_eq!(cond.portion, 20);
/// assert!(cond.keys.contains("Apple"));
/// ```
pub fn parse_must_have(group: &str) -> Result<MustHave> {
    let column = tokens(group);
    let len = column.len();
    let names: Vec<&str> = column
        .iter()
        .enumerate()
        .take_while(|(i, token)| i + 2 < len || token.parse::<i64>().is_err())
        .map(|(_, token)| *token)
        .collect();

    if names.is_empty() {
        return Err(malformed("must-have", group, "no ingredient name or tag"));
    }
    if names.iter().any(|n| n.is_empty()) {
        return Err(malformed("must-have", group, "empty ingredient name or tag"));
    }

    let rest = &column[names.len()..];
    let number = |token: &str| {
        token
            .parse::<i64>()
            .map_err(|_| malformed("must-have", group, format!("`{token}` is not a number")))
    };
    let (count, portion) = match rest {
        [] => (1, 0),
        [count] => (number(*count)?.max(1), 0),
        [count, portion] => (number(*count)?.max(1), number(*portion)?.max(0)),
        _ => return Err(malformed("must-have", group, "too many numeric tokens")),
    };

    let keys: BTreeSet<String> = names.into_iter().map(str::to_string).collect();
    Ok(MustHave {
        keys,
        count: count as usize,
        portion: portion.min(i32::MAX as i64) as i32,
    })
}

/// Parses `KEY[,COUNT[,PORTION]]`.
///
/// A blank KEY is the "total ingredient count" perk; only in the two-token
/// form may COUNT be negative (meaning "at most"). Non-numeric counts fall
/// back to the defaults.
pub fn parse_perk(group: &str) -> Result<Perk> {
    let column = tokens(group);
    match column.as_slice() {
        [key] => Ok(Perk::new(*key, 1, 0)),
        [key, count] => Ok(Perk::new(*key, count.parse().unwrap_or(1), 0)),
        [key, count, portion] => Ok(Perk::new(
            *key,
            count.parse::<i32>().map(|c| c.max(1)).unwrap_or(1),
            portion.parse::<i32>().map(|p| p.max(0)).unwrap_or(0),
        )),
        _ => Err(malformed("perk", group, "expected KEY[,COUNT[,PORTION]]")),
    }
}

/// Parses `TAG[,PERCENT]` with PERCENT in `[0, 100]`.
pub fn parse_required_tag(group: &str) -> Result<RequiredTag> {
    let column = tokens(group);
    let (tag, percent) = match column.as_slice() {
        [tag] => (*tag, 0.0),
        [tag, percent] => {
            let percent: f64 = percent
                .parse()
                .map_err(|_| malformed("required-tag", group, "percent is not a number"))?;
            (*tag, percent)
        }
        _ => return Err(malformed("required-tag", group, "expected TAG[,PERCENT]")),
    };
    if tag.is_empty() {
        return Err(malformed("required-tag", group, "empty tag"));
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(malformed("required-tag", group, "percent must be within [0, 100]"));
    }
    Ok(RequiredTag::new(tag, percent))
}

/// Parses a comma-separated avoid list, skipping blanks.
pub fn parse_avoid(list: &str) -> BTreeSet<String> {
    tokens(list)
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_must_have_names_only() {
        let cond = parse_must_have("Nut,Apple").unwrap();
        assert_eq!(cond.keys.len(), 2);
        assert_eq!(cond.count, 1);
        assert_eq!(cond.portion, 0);
    }

    #[test]
    fn test_must_have_count_only() {
        let cond = parse_must_have("Fat,2").unwrap();
        assert_eq!(cond.keys, BTreeSet::from(["Fat".to_string()]));
        assert_eq!(cond.count, 2);
        assert_eq!(cond.portion, 0);
    }

    #[test]
    fn test_must_have_clamps() {
        let cond = parse_must_have("Fat,0,-5").unwrap();
        assert_eq!(cond.count, 1);
        assert_eq!(cond.portion, 0);
    }

    #[test]
    fn test_must_have_numeric_name_in_front() {
        // "7" is followed by two tokens, so it is read as a name.
        let cond = parse_must_have("Fat,7,2,20").unwrap();
        assert!(cond.keys.contains("7"));
        assert_eq!(cond.count, 2);
        assert_eq!(cond.portion, 20);
    }

    #[test]
    fn test_must_have_without_names_is_malformed() {
        let err = parse_must_have("3").unwrap_err();
        assert!(matches!(err, ChefError::MalformedCondition { option: "must-have", .. }));
    }

    #[test]
    fn test_must_have_non_numeric_portion_is_malformed() {
        // "3" stops the name run, leaving "3,Apple".
        assert!(parse_must_have("Nut,3,Apple").is_err());
        assert!(parse_must_have("Nut,,2").is_err());
    }

    #[test]
    fn test_perk_forms() {
        assert_eq!(parse_perk("Fruit").unwrap(), Perk::new("Fruit", 1, 0));
        assert_eq!(parse_perk(",-4").unwrap(), Perk::new("", -4, 0));
        assert_eq!(parse_perk("Nut,x").unwrap(), Perk::new("Nut", 1, 0));
        assert_eq!(parse_perk("Nut,3,20").unwrap(), Perk::new("Nut", 3, 20));
        assert_eq!(parse_perk("Nut,-3,-20").unwrap(), Perk::new("Nut", 1, 0));
    }

    #[test]
    fn test_perk_too_many_tokens() {
        let err = parse_perk("Nut,1,2,3").unwrap_err();
        assert!(matches!(err, ChefError::MalformedCondition { option: "perk", .. }));
    }

    #[test]
    fn test_required_tag() {
        let req = parse_required_tag("Fat,25").unwrap();
        assert_eq!(req.tag, "Fat");
        assert!((req.percent - 25.0).abs() < 1e-12);
        assert!((parse_required_tag("Spice").unwrap().percent).abs() < 1e-12);
        assert!(parse_required_tag("Fat,150").is_err());
        assert!(parse_required_tag("Fat,lots").is_err());
        assert!(parse_required_tag(",10").is_err());
        assert!(parse_required_tag("Fat,1,2").is_err());
    }

    #[test]
    fn test_avoid_list() {
        let avoid = parse_avoid("Meat, Seafood,,Dairy");
        assert_eq!(avoid.len(), 3);
        assert!(avoid.contains("Seafood"));
    }
}
