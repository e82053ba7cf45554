//! oportuna library
//!
//! Catalog search engine for study-exchange opportunities: free-text
//! query interpretation, a cascading filter-and-rank pipeline, semantic
//! ranking over embeddings, and per-session navigation context.
//!
//! # Modules
//!
//! - `core`: record model, catalog loading, text normalization
//! - `nlp`: entity extraction from free-text queries
//! - `search`: embedding provider/index, ranker, filter cascade
//! - `session`: per-session result context and selection tokens
//! - `mcp`: MCP server exposing the engine as tools

pub mod core;
pub mod nlp;
pub mod search;
pub mod session;

// Re-exports for convenience
pub use crate::core::catalog::{Catalog, CatalogSource, JsonCatalog};
pub use crate::core::normalize::normalize;
pub use crate::core::record::Record;
pub use nlp::entities::{extract, ExtractedEntities};
pub use search::cascade::{SearchEngine, SearchError, SearchOutcome};
pub use search::embedding::{EmbeddingProvider, HarmonicEmbedder};
pub use session::{FilterMode, SessionStore};
