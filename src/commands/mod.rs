//! CLI subcommand implementations

pub mod deadlines;
pub mod display;
pub mod list;
pub mod search;
pub mod status;
