//! Status command - catalog summary

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Datelike;
use colored::Colorize;
use serde::Serialize;

use crate::core::catalog::{load_catalog, JsonCatalog};
use crate::nlp::months::month_name;

#[derive(Serialize)]
struct CatalogStatus {
    total: usize,
    countries: usize,
    cities: usize,
    by_country: HashMap<String, usize>,
    by_start_month: HashMap<String, usize>,
    missing_start_date: usize,
    missing_deadline: usize,
}

pub fn run(catalog: PathBuf, json: bool) -> Result<()> {
    let source = JsonCatalog::new(catalog);
    let catalog = load_catalog(&source)?;

    let mut by_country: HashMap<String, usize> = HashMap::new();
    let mut by_start_month: HashMap<String, usize> = HashMap::new();
    let mut missing_start_date = 0;
    let mut missing_deadline = 0;

    for record in catalog.records() {
        *by_country.entry(record.country.clone()).or_insert(0) += 1;
        match record.start_date {
            Some(d) => {
                let name = month_name(d.month()).unwrap_or("?");
                *by_start_month.entry(name.to_string()).or_insert(0) += 1;
            }
            None => missing_start_date += 1,
        }
        if record.deadline.is_none() {
            missing_deadline += 1;
        }
    }

    let status = CatalogStatus {
        total: catalog.len(),
        countries: catalog.countries().len(),
        cities: catalog.cities().len(),
        by_country,
        by_start_month,
        missing_start_date,
        missing_deadline,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Catalog Status".bold());
    println!("{}", "=".repeat(40));
    println!("   {:<20} {:>4}", "Records", status.total);
    println!("   {:<20} {:>4}", "Countries", status.countries);
    println!("   {:<20} {:>4}", "Cities", status.cities);
    println!();

    println!("{}", "Records per country".cyan());
    println!("{}", "-".repeat(30));
    let mut countries: Vec<_> = status.by_country.iter().collect();
    countries.sort();
    for (country, count) in countries {
        println!("   {:<20} {:>4}", country, count);
    }
    println!();

    println!("{}", "Records per start month".cyan());
    println!("{}", "-".repeat(30));
    let mut months: Vec<_> = status.by_start_month.iter().collect();
    months.sort();
    for (month, count) in months {
        println!("   {:<20} {:>4}", month, count);
    }

    if status.missing_start_date > 0 || status.missing_deadline > 0 {
        println!();
        println!("{}", "Missing dates".yellow());
        println!("{}", "-".repeat(30));
        println!("   {:<20} {:>4}", "No start date", status.missing_start_date);
        println!("   {:<20} {:>4}", "No deadline", status.missing_deadline);
    }

    Ok(())
}
