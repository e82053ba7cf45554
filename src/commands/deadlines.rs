//! Deadlines command - records closing soon

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::core::catalog::{load_catalog, JsonCatalog};

pub const DEFAULT_WINDOW_DAYS: i64 = 14;

pub fn run(catalog: PathBuf, days: i64, json: bool) -> Result<()> {
    let source = JsonCatalog::new(catalog);
    let catalog = load_catalog(&source)?;
    let soon = catalog.deadline_within(days);

    if json {
        let items: Vec<_> = soon
            .iter()
            .map(|r| {
                serde_json::json!({
                    "title": r.title,
                    "country": r.country,
                    "city": r.city,
                    "deadline": r.deadline,
                    "days_remaining": r.days_until_deadline(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if soon.is_empty() {
        println!(
            "{} No deadlines within the next {} days",
            "→".dimmed(),
            days
        );
        return Ok(());
    }

    println!(
        "{} {} deadline(s) within the next {} days",
        "→".dimmed(),
        soon.len(),
        days
    );
    println!();
    for (i, record) in soon.iter().enumerate() {
        let days_left = record.days_until_deadline().unwrap_or(0);
        println!(
            "{}. {} {}",
            (i + 1).to_string().bold(),
            record.summary().cyan(),
            format!("closes in {} days", days_left).yellow()
        );
    }

    Ok(())
}
