//! Core catalog model: records, loading, and text normalization

pub mod catalog;
pub mod normalize;
pub mod record;

pub use catalog::{Catalog, CatalogError, CatalogSource, JsonCatalog};
pub use normalize::normalize;
pub use record::Record;
