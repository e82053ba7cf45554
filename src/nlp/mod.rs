//! Query interpretation: normalization-space entity extraction

pub mod entities;
pub mod months;

pub use entities::{extract, ExtractedEntities};
