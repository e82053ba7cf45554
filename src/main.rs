mod commands;
mod core;
#[cfg(feature = "mcp")]
mod mcp;
mod nlp;
mod search;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::deadlines::DEFAULT_WINDOW_DAYS;

#[derive(Parser)]
#[command(name = "oportuna")]
#[command(about = "Search a study-exchange opportunity catalog with NLP filters and semantic ranking", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the catalog JSON file
    #[arg(long, global = true, default_value = "catalog.json")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog with a free-text query
    Search {
        query: String,
        #[arg(long, help = "JSON output")]
        json: bool,
        #[arg(long, help = "Open result N (1-based) from the result list")]
        open: Option<usize>,
    },
    /// List distinct countries and cities
    List {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show records with deadlines closing soon
    Deadlines {
        #[arg(long, short, help = "Window in days", default_value_t = DEFAULT_WINDOW_DAYS)]
        days: i64,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Catalog summary
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Start MCP server over stdio
    #[cfg(feature = "mcp")]
    Mcp,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { query, json, open } => {
            commands::search::run(&query, cli.catalog, json, open)
        }
        Commands::List { json } => commands::list::run(cli.catalog, json),
        Commands::Deadlines { days, json } => commands::deadlines::run(cli.catalog, days, json),
        Commands::Status { json } => commands::status::run(cli.catalog, json),
        #[cfg(feature = "mcp")]
        Commands::Mcp => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(mcp::run_mcp_server(cli.catalog))
        }
    }
}
