//! Shared result rendering for CLI commands

use colored::Colorize;
use serde_json::json;

use crate::core::record::Record;
use crate::search::cascade::SearchOutcome;
use crate::session::encode_selection;

/// Render a search outcome as pretty JSON, including selection tokens so
/// a caller can resolve a follow-up against the same session.
pub fn outcome_json(outcome: &SearchOutcome) -> serde_json::Value {
    let results: Vec<_> = outcome
        .results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            json!({
                "index": i,
                "token": encode_selection(outcome.mode, i),
                "title": r.title,
                "country": r.country,
                "city": r.city,
                "start_date": r.start_date,
                "end_date": r.end_date,
                "deadline": r.deadline,
            })
        })
        .collect();
    json!({
        "mode": outcome.mode,
        "results": results,
    })
}

/// Print a numbered result list.
pub fn print_outcome(outcome: &SearchOutcome, query: &str) {
    if outcome.results.is_empty() {
        println!("{} No results found for: {}", "→".dimmed(), query.cyan());
        return;
    }

    println!(
        "{} {} results for: {} {}",
        "→".dimmed(),
        outcome.results.len(),
        query.cyan(),
        format!("[{}]", outcome.mode).dimmed()
    );
    println!();

    for (i, record) in outcome.results.iter().enumerate() {
        println!("{}. {}", (i + 1).to_string().bold(), record.summary().cyan());
        if let Some(start) = record.start_date {
            println!("   starts {}", start.format("%d/%m/%Y").to_string().dimmed());
        }
        if let Some(days) = record.days_until_deadline() {
            if days >= 0 {
                println!("   {}", format!("deadline in {} days", days).yellow());
            }
        }
        println!();
    }
}

/// Print the full detail block for one record.
pub fn print_record(record: &Record) {
    for (i, line) in record.detail().lines().enumerate() {
        if i == 0 {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
}
