use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strsim::levenshtein;
use thiserror::Error;

/// The fixed spend classifications a trip expense can be filed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Flight,
    Hotel,
    Food,
    Transport,
    Sightseeing,
    Shopping,
    Miscellaneous,
    #[serde(rename = "Personal Shopping")]
    PersonalShopping,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 8] = [
        Category::Flight,
        Category::Hotel,
        Category::Food,
        Category::Transport,
        Category::Sightseeing,
        Category::Shopping,
        Category::Miscellaneous,
        Category::PersonalShopping,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Flight => "Flight",
            Category::Hotel => "Hotel",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Sightseeing => "Sightseeing",
            Category::Shopping => "Shopping",
            Category::Miscellaneous => "Miscellaneous",
            Category::PersonalShopping => "Personal Shopping",
        }
    }

    /// Closest label to an unrecognised input, if it is near enough to be a typo.
    pub fn suggest(input: &str) -> Option<Category> {
        let needle = normalize(input);
        Category::ALL
            .iter()
            .map(|category| (levenshtein(&normalize(category.label()), &needle), *category))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, category)| category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown category `{input}`")]
pub struct UnknownCategory {
    pub input: String,
    pub suggestion: Option<Category>,
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = normalize(s);
        Category::ALL
            .iter()
            .copied()
            .find(|category| normalize(category.label()) == needle)
            .ok_or_else(|| UnknownCategory {
                input: s.to_string(),
                suggestion: Category::suggest(s),
            })
    }
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_loosely() {
        assert_eq!("food".parse::<Category>(), Ok(Category::Food));
        assert_eq!(
            "personal-shopping".parse::<Category>(),
            Ok(Category::PersonalShopping)
        );
        assert_eq!(
            " Personal Shopping ".parse::<Category>(),
            Ok(Category::PersonalShopping)
        );
    }

    #[test]
    fn unknown_labels_carry_a_suggestion() {
        let err = "hotle".parse::<Category>().expect_err("not a category");
        assert_eq!(err.suggestion, Some(Category::Hotel));
        let err = "groceries-and-more".parse::<Category>().expect_err("not a category");
        assert_eq!(err.suggestion, None);
    }

    #[test]
    fn labels_round_trip_through_display() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
    }
}
