//! Opportunity record model

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// One study-exchange opportunity.
///
/// Immutable for the duration of a request; the authoritative copy lives in
/// the catalog source and is reloaded per interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub country: String,
    pub city: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub covered_costs: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub deadline: Option<NaiveDate>,
}

/// Malformed or missing dates are absent, never fatal.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

impl Record {
    /// Sort key for start-date-ascending orderings; absent dates sort last.
    pub fn start_sort_key(&self) -> NaiveDate {
        self.start_date.unwrap_or(NaiveDate::MAX)
    }

    /// Sort key for deadline orderings; absent deadlines sort last.
    pub fn deadline_sort_key(&self) -> NaiveDate {
        self.deadline.unwrap_or(NaiveDate::MAX)
    }

    /// Text the embedding index is built from.
    pub fn embedding_text(&self) -> String {
        format!("{}. {}", self.title, self.description)
    }

    /// One-line summary for result lists.
    pub fn summary(&self) -> String {
        format!("{} ({}, {})", self.title, self.city, self.country)
    }

    /// Days from today until the deadline. Negative when past, `None` when
    /// the record has no deadline.
    pub fn days_until_deadline(&self) -> Option<i64> {
        let today = Local::now().date_naive();
        self.deadline.map(|d| (d - today).num_days())
    }

    /// Plain-text detail block for a single record.
    pub fn detail(&self) -> String {
        let fmt = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "-".to_string())
        };

        let mut out = format!("{}\n", self.title);
        out.push_str(&format!("Country: {}   City: {}\n", self.country, self.city));
        out.push_str(&format!(
            "Start: {}   End: {}\n",
            fmt(self.start_date),
            fmt(self.end_date)
        ));
        if !self.description.is_empty() {
            out.push_str(&format!("Description: {}\n", self.description));
        }
        if !self.requirements.is_empty() {
            out.push_str(&format!("Requirements: {}\n", self.requirements));
        }
        if !self.covered_costs.is_empty() {
            out.push_str(&format!("Covered costs: {}\n", self.covered_costs));
        }
        if !self.contact.is_empty() {
            out.push_str(&format!("Contact: {}\n", self.contact));
        }
        if !self.link.is_empty() {
            out.push_str(&format!("Link: {}\n", self.link));
        }
        if let Some(deadline) = self.deadline {
            out.push_str(&format!("Deadline: {}", deadline.format("%d/%m/%Y")));
            if let Some(days) = self.days_until_deadline() {
                if days >= 0 {
                    out.push_str(&format!(" ({} days remaining)", days));
                }
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(start: &str) -> String {
        format!(
            r#"{{"country":"Alemania","city":"Berlín","title":"t","start_date":{}}}"#,
            start
        )
    }

    #[test]
    fn test_parses_iso_dates() {
        let r: Record = serde_json::from_str(&record_json("\"2025-06-01\"")).unwrap();
        assert_eq!(r.start_date, NaiveDate::from_ymd_opt(2025, 6, 1));
    }

    #[test]
    fn test_malformed_date_is_absent() {
        let r: Record = serde_json::from_str(&record_json("\"junio 2025\"")).unwrap();
        assert_eq!(r.start_date, None);

        let r: Record = serde_json::from_str(&record_json("\"\"")).unwrap();
        assert_eq!(r.start_date, None);

        let r: Record = serde_json::from_str(&record_json("null")).unwrap();
        assert_eq!(r.start_date, None);
    }

    #[test]
    fn test_missing_date_sorts_last() {
        let with_date: Record = serde_json::from_str(&record_json("\"2099-12-31\"")).unwrap();
        let without: Record = serde_json::from_str(&record_json("null")).unwrap();
        assert!(with_date.start_sort_key() < without.start_sort_key());
    }

    #[test]
    fn test_detail_handles_absent_fields() {
        let r: Record = serde_json::from_str(&record_json("null")).unwrap();
        let detail = r.detail();
        assert!(detail.contains("Start: -"));
        assert!(!detail.contains("Deadline:"));
    }
}
