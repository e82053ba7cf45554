//! List command - distinct countries and cities in the catalog

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::core::catalog::{load_catalog, JsonCatalog};

pub fn run(catalog: PathBuf, json: bool) -> Result<()> {
    let source = JsonCatalog::new(catalog);
    let catalog = load_catalog(&source)?;

    let countries = catalog.countries();
    let cities = catalog.cities();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "countries": countries,
                "cities": cities,
            }))?
        );
        return Ok(());
    }

    println!("{}", "Countries".bold());
    for country in &countries {
        println!("  {}", country);
    }
    println!();
    println!("{}", "Cities".bold());
    for city in &cities {
        println!("  {}", city);
    }

    Ok(())
}
