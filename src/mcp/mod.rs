//! MCP server for the opportunity catalog
//!
//! Exposes search, selection resolution, and deadline listing as tools.

mod server;

pub use server::run_mcp_server;
