//! Filter modes and selection tokens
//!
//! Every result list is tagged with the strategy that produced it, and a
//! follow-up selection is only valid against a context carrying the same
//! tag. Tokens are round-trippable and every tag is distinct, so two
//! modes can never be confused through a shared index space.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The strategy (cascade stage or structured menu path) that produced a
/// result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Country,
    City,
    Month,
    DateRange,
    CountryMonth,
    CountryDateRange,
    Semantic,
    CountrySemantic,
    CitySemantic,
    MonthSemantic,
    DateRangeSemantic,
    DeadlineSoon,
}

impl FilterMode {
    /// Stable wire tag, used in selection tokens and JSON output.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::City => "city",
            Self::Month => "month",
            Self::DateRange => "date_range",
            Self::CountryMonth => "country_month",
            Self::CountryDateRange => "country_date_range",
            Self::Semantic => "semantic",
            Self::CountrySemantic => "country_semantic",
            Self::CitySemantic => "city_semantic",
            Self::MonthSemantic => "month_semantic",
            Self::DateRangeSemantic => "date_range_semantic",
            Self::DeadlineSoon => "deadline_soon",
        }
    }

    pub const ALL: [FilterMode; 12] = [
        Self::Country,
        Self::City,
        Self::Month,
        Self::DateRange,
        Self::CountryMonth,
        Self::CountryDateRange,
        Self::Semantic,
        Self::CountrySemantic,
        Self::CitySemantic,
        Self::MonthSemantic,
        Self::DateRangeSemantic,
        Self::DeadlineSoon,
    ];
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FilterMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter().copied().find(|m| m.tag() == s).ok_or(())
    }
}

/// Encode a `(mode, index)` selection as an opaque token.
pub fn encode_selection(mode: FilterMode, index: usize) -> String {
    format!("{}:{}", mode.tag(), index)
}

/// Decode a selection token back into `(mode, index)`.
pub fn decode_selection(token: &str) -> Option<(FilterMode, usize)> {
    let (tag, index) = token.rsplit_once(':')?;
    Some((tag.parse().ok()?, index.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_distinct() {
        for a in FilterMode::ALL {
            for b in FilterMode::ALL {
                if a != b {
                    assert_ne!(a.tag(), b.tag());
                }
            }
        }
    }

    #[test]
    fn test_selection_roundtrip_every_mode() {
        for mode in FilterMode::ALL {
            for index in [0usize, 3, 42] {
                let token = encode_selection(mode, index);
                assert_eq!(decode_selection(&token), Some((mode, index)));
            }
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode_selection("country"), None);
        assert_eq!(decode_selection("no_such_mode:1"), None);
        assert_eq!(decode_selection("country:x"), None);
        assert_eq!(decode_selection(""), None);
    }

    #[test]
    fn test_serde_tag_matches_wire_tag() {
        for mode in FilterMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.tag()));
        }
    }
}
