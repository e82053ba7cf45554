//! Semantic search: embeddings, ranking, and the filter cascade

pub mod cascade;
pub mod embedding;
pub mod index;
pub mod ranker;

pub use cascade::{SearchEngine, SearchError, SearchOutcome};
pub use embedding::{cosine_similarity, EmbeddingError, EmbeddingProvider, HarmonicEmbedder};
pub use index::EmbeddingIndex;
pub use ranker::{rank, FALLBACK_TOP_K, SIMILARITY_THRESHOLD};
