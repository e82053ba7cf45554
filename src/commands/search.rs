//! Search command - run the filter cascade once from the CLI

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use super::display;
use crate::core::catalog::JsonCatalog;
use crate::search::cascade::{SearchEngine, SearchError};
use crate::search::embedding::HarmonicEmbedder;

/// Session id for one-shot CLI invocations; the context dies with the
/// process anyway.
const CLI_SESSION: &str = "cli";

pub fn run(query: &str, catalog: PathBuf, json: bool, open: Option<usize>) -> Result<()> {
    let engine = SearchEngine::new(
        Arc::new(JsonCatalog::new(catalog)),
        Arc::new(HarmonicEmbedder::new()),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = match runtime.block_on(engine.search(query, CLI_SESSION)) {
        Ok(outcome) => outcome,
        Err(SearchError::RankingUnavailable(e)) => {
            eprintln!("{} Search temporarily unavailable: {}", "!".yellow(), e);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(index) = open {
        // 1-based on the CLI, matching the printed list.
        let index = index.saturating_sub(1);
        match engine.resolve_selection(CLI_SESSION, outcome.mode, index) {
            Ok(record) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                } else {
                    display::print_record(&record);
                }
            }
            Err(e) => {
                eprintln!("{} Invalid selection: {}", "!".yellow(), e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&display::outcome_json(&outcome))?
        );
    } else {
        display::print_outcome(&outcome, query);
    }

    Ok(())
}
