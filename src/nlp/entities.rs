//! Entity extraction from free-text queries
//!
//! Detects a country, a city, a month, and an explicit date range, and
//! collects the residual keywords that drive semantic narrowing.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use super::months::{month_name, MONTHS};
use crate::core::normalize::normalize;

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"\w+").unwrap();
}

/// Minimum length for a residual keyword token.
const MIN_KEYWORD_LEN: usize = 3;

/// Everything the extractor found in one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedEntities {
    /// Canonical country name from the catalog, if any token matched.
    pub country: Option<String>,
    /// Canonical city name from the catalog, if any token matched.
    pub city: Option<String>,
    /// Detected month (1-12). Matched by substring, looser than the
    /// token-exact country/city match; month names rarely collide with
    /// other words, so the asymmetry is kept on purpose.
    pub month: Option<u32>,
    /// Explicit `(start, end)` date range. All-or-nothing: if either of
    /// the first two ISO tokens fails to parse, no range is detected.
    pub range: Option<(NaiveDate, NaiveDate)>,
    /// Residual keyword tokens after removing matched entities.
    pub keywords: Vec<String>,
}

impl ExtractedEntities {
    /// Country takes priority over city wherever only one location is used.
    pub fn location(&self) -> Option<&str> {
        self.country.as_deref().or(self.city.as_deref())
    }

    pub fn has_location(&self) -> bool {
        self.country.is_some() || self.city.is_some()
    }

    /// Canonical name of the detected month.
    pub fn month_name(&self) -> Option<&'static str> {
        self.month.and_then(month_name)
    }
}

/// Extract entities from a raw query against the catalog's current
/// country and city lookups (normalized form -> canonical form).
pub fn extract(
    query: &str,
    countries: &BTreeMap<String, String>,
    cities: &BTreeMap<String, String>,
) -> ExtractedEntities {
    let norm = normalize(query);
    let tokens: HashSet<&str> = norm.split_whitespace().collect();

    // First normalized country whose token appears in the query wins;
    // only one country is ever detected per query.
    let country = countries
        .iter()
        .find(|(norm_name, _)| tokens.contains(norm_name.as_str()))
        .map(|(_, canonical)| canonical.clone());

    // City detection is independent of country detection.
    let city = cities
        .iter()
        .find(|(norm_name, _)| tokens.contains(norm_name.as_str()))
        .map(|(_, canonical)| canonical.clone());

    // Substring match over the fixed month list.
    let month = MONTHS
        .iter()
        .position(|m| norm.contains(m))
        .map(|i| (i + 1) as u32);

    // Scan the raw text: the pattern targets literal ISO tokens, which
    // normalization would not change anyway.
    let date_tokens: Vec<&str> = DATE_RE.find_iter(query).map(|m| m.as_str()).collect();
    let range = if date_tokens.len() >= 2 {
        let start = NaiveDate::parse_from_str(date_tokens[0], "%Y-%m-%d");
        let end = NaiveDate::parse_from_str(date_tokens[1], "%Y-%m-%d");
        match (start, end) {
            (Ok(s), Ok(e)) => Some((s, e)),
            _ => None,
        }
    } else {
        None
    };

    // Remove matched entity text, then keep what is left as keywords.
    let mut residual = norm.clone();
    if let Some(c) = &country {
        residual = residual.replace(&normalize(c), "");
    }
    if let Some(c) = &city {
        residual = residual.replace(&normalize(c), "");
    }
    if let Some(m) = month {
        if let Some(name) = month_name(m) {
            residual = residual.replace(name, "");
        }
    }
    for d in &date_tokens {
        residual = residual.replace(d, "");
    }

    let keywords = WORD_RE
        .find_iter(&residual)
        .map(|m| m.as_str().to_string())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN)
        .collect();

    ExtractedEntities {
        country,
        city,
        month,
        range,
        keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookups() -> (BTreeMap<String, String>, BTreeMap<String, String>) {
        let countries: BTreeMap<String, String> = [
            ("alemania", "Alemania"),
            ("espana", "España"),
            ("francia", "Francia"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let cities: BTreeMap<String, String> = [("berlin", "Berlín"), ("paris", "París")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        (countries, cities)
    }

    #[test]
    fn test_country_token_match_without_diacritics() {
        let (countries, cities) = lookups();
        let e = extract("busco algo en alemania", &countries, &cities);
        assert_eq!(e.country.as_deref(), Some("Alemania"));
        assert_eq!(e.city, None);
    }

    #[test]
    fn test_country_requires_exact_token() {
        let (countries, cities) = lookups();
        // "alemanias" is not a token-exact match.
        let e = extract("alemanias del sur", &countries, &cities);
        assert_eq!(e.country, None);
    }

    #[test]
    fn test_country_and_city_not_mutually_exclusive() {
        let (countries, cities) = lookups();
        let e = extract("proyecto en Berlín en Alemania", &countries, &cities);
        assert_eq!(e.country.as_deref(), Some("Alemania"));
        assert_eq!(e.city.as_deref(), Some("Berlín"));
        assert_eq!(e.location(), Some("Alemania"));
    }

    #[test]
    fn test_month_substring_match() {
        let (countries, cities) = lookups();
        // "julio" embedded in a larger phrase still matches by substring.
        let e = extract("a finales de julio", &countries, &cities);
        assert_eq!(e.month, Some(7));
        assert_eq!(e.month_name(), Some("julio"));
    }

    #[test]
    fn test_date_range_in_order() {
        let (countries, cities) = lookups();
        let e = extract(
            "entre 2025-06-01 y 2025-06-15 por favor",
            &countries,
            &cities,
        );
        let (s, end) = e.range.unwrap();
        assert_eq!(s, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    }

    #[test]
    fn test_single_date_is_not_a_range() {
        let (countries, cities) = lookups();
        let e = extract("desde 2025-06-01", &countries, &cities);
        assert_eq!(e.range, None);
    }

    #[test]
    fn test_invalid_date_discards_whole_range() {
        let (countries, cities) = lookups();
        // 2025-02-31 matches the pattern but is not a calendar date.
        let e = extract("entre 2025-02-31 y 2025-06-15", &countries, &cities);
        assert_eq!(e.range, None);
    }

    #[test]
    fn test_keywords_exclude_matched_entities_and_short_words() {
        let (countries, cities) = lookups();
        let e = extract(
            "Busco en Alemania en julio algo de tecnología e IA",
            &countries,
            &cities,
        );
        assert!(e.keywords.contains(&"tecnologia".to_string()));
        assert!(e.keywords.contains(&"busco".to_string()));
        assert!(!e.keywords.iter().any(|k| k == "alemania"));
        assert!(!e.keywords.iter().any(|k| k == "julio"));
        // "ia" and "en" are below the length floor.
        assert!(!e.keywords.iter().any(|k| k == "ia" || k == "en"));
    }

    #[test]
    fn test_empty_query() {
        let (countries, cities) = lookups();
        let e = extract("", &countries, &cities);
        assert_eq!(e, ExtractedEntities::default());
    }
}
