//! Catalog loading and structured filtering
//!
//! The catalog source is an external collaborator; the engine reloads it
//! per interaction and treats the result as a read-only ordered sequence.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;

use super::normalize::normalize;
use super::record::Record;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Source of catalog records, reloaded per top-level interaction.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<Vec<Record>, CatalogError>;
}

/// Catalog stored as a JSON array of records.
///
/// A missing file is an empty catalog, not an error.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonCatalog {
    fn load(&self) -> Result<Vec<Record>, CatalogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory view of the loaded records with derived lookups.
pub struct Catalog {
    records: Vec<Record>,
}

impl Catalog {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct countries, sorted.
    pub fn countries(&self) -> Vec<String> {
        let mut set: Vec<String> = self.records.iter().map(|r| r.country.clone()).collect();
        set.sort();
        set.dedup();
        set
    }

    /// Distinct cities, sorted.
    pub fn cities(&self) -> Vec<String> {
        let mut set: Vec<String> = self.records.iter().map(|r| r.city.clone()).collect();
        set.sort();
        set.dedup();
        set
    }

    /// Normalized country -> canonical country, in stable iteration order.
    pub fn country_lookup(&self) -> BTreeMap<String, String> {
        self.countries()
            .into_iter()
            .map(|c| (normalize(&c), c))
            .collect()
    }

    /// Normalized city -> canonical city, in stable iteration order.
    pub fn city_lookup(&self) -> BTreeMap<String, String> {
        self.cities()
            .into_iter()
            .map(|c| (normalize(&c), c))
            .collect()
    }

    /// Records in `country`, start date ascending, absent dates last.
    pub fn filter_country(&self, country: &str) -> Vec<Record> {
        self.sorted_by_start(|r| r.country == country)
    }

    /// Records in `city`, start date ascending, absent dates last.
    pub fn filter_city(&self, city: &str) -> Vec<Record> {
        self.sorted_by_start(|r| r.city == city)
    }

    /// Records starting in calendar month `month` (1-12), any year.
    pub fn filter_month(&self, month: u32) -> Vec<Record> {
        self.sorted_by_start(|r| r.start_date.map(|d| d.month() == month).unwrap_or(false))
    }

    /// Records starting in a specific month and year (menu path).
    pub fn filter_month_year(&self, month: u32, year: i32) -> Vec<Record> {
        self.sorted_by_start(|r| {
            r.start_date
                .map(|d| d.month() == month && d.year() == year)
                .unwrap_or(false)
        })
    }

    /// Records whose start date falls within `[start, end]` inclusive.
    pub fn filter_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Record> {
        self.sorted_by_start(|r| {
            r.start_date
                .map(|d| start <= d && d <= end)
                .unwrap_or(false)
        })
    }

    /// Records with a deadline between today and today+`days` inclusive,
    /// sorted by deadline ascending.
    pub fn deadline_within(&self, days: i64) -> Vec<Record> {
        let today = Local::now().date_naive();
        let mut out: Vec<Record> = self
            .records
            .iter()
            .filter(|r| {
                r.deadline
                    .map(|d| {
                        let diff = (d - today).num_days();
                        (0..=days).contains(&diff)
                    })
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        out.sort_by_key(Record::deadline_sort_key);
        out
    }

    fn sorted_by_start(&self, pred: impl Fn(&Record) -> bool) -> Vec<Record> {
        let mut out: Vec<Record> = self.records.iter().filter(|r| pred(r)).cloned().collect();
        out.sort_by_key(Record::start_sort_key);
        out
    }
}

/// Load a catalog view from a source.
pub fn load_catalog(source: &dyn CatalogSource) -> Result<Catalog, CatalogError> {
    Ok(Catalog::new(source.load()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(country: &str, city: &str, title: &str, start: Option<&str>) -> Record {
        serde_json::from_value(serde_json::json!({
            "country": country,
            "city": city,
            "title": title,
            "start_date": start,
        }))
        .unwrap()
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            rec("Alemania", "Berlín", "Tech camp", Some("2025-07-10")),
            rec("Alemania", "Múnich", "Arte urbano", Some("2025-06-05")),
            rec("Francia", "Lyon", "Cocina", None),
            rec("Francia", "París", "Historia", Some("2026-07-01")),
        ])
    }

    #[test]
    fn test_countries_and_cities_distinct_sorted() {
        let cat = sample();
        assert_eq!(cat.countries(), vec!["Alemania", "Francia"]);
        assert_eq!(cat.cities(), vec!["Berlín", "Lyon", "Múnich", "París"]);
    }

    #[test]
    fn test_lookup_is_normalized() {
        let cat = sample();
        let lookup = cat.country_lookup();
        assert_eq!(lookup.get("alemania"), Some(&"Alemania".to_string()));
        let cities = cat.city_lookup();
        assert_eq!(cities.get("munich"), Some(&"Múnich".to_string()));
    }

    #[test]
    fn test_filter_country_sorted_ascending() {
        let cat = sample();
        let r = cat.filter_country("Alemania");
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].title, "Arte urbano");
        assert_eq!(r[1].title, "Tech camp");
    }

    #[test]
    fn test_absent_start_sorts_last() {
        let cat = sample();
        let r = cat.filter_country("Francia");
        assert_eq!(r[0].title, "Historia");
        assert_eq!(r[1].title, "Cocina");
    }

    #[test]
    fn test_filter_month_any_year() {
        let cat = sample();
        let july = cat.filter_month(7);
        assert_eq!(july.len(), 2);
        assert_eq!(july[0].title, "Tech camp");
        assert_eq!(july[1].title, "Historia");
    }

    #[test]
    fn test_filter_month_year() {
        let cat = sample();
        let r = cat.filter_month_year(7, 2026);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].title, "Historia");
    }

    #[test]
    fn test_filter_range_inclusive() {
        let cat = sample();
        let start = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        let r = cat.filter_range(start, end);
        assert_eq!(r.len(), 2);
        // Records without a start date never match a range.
        assert!(r.iter().all(|x| x.start_date.is_some()));
    }

    #[test]
    fn test_deadline_within_window() {
        let today = Local::now().date_naive();
        let mut soon = rec("Alemania", "Berlín", "Soon", None);
        soon.deadline = Some(today + chrono::Duration::days(3));
        let mut later = rec("Alemania", "Berlín", "Later", None);
        later.deadline = Some(today + chrono::Duration::days(30));
        let mut past = rec("Alemania", "Berlín", "Past", None);
        past.deadline = Some(today - chrono::Duration::days(1));

        let cat = Catalog::new(vec![later, soon, past]);
        let r = cat.deadline_within(14);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].title, "Soon");
    }

    #[test]
    fn test_missing_file_is_empty_catalog() {
        let source = JsonCatalog::new("/nonexistent/catalog.json");
        assert!(source.load().unwrap().is_empty());
    }
}
