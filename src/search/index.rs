//! Per-record embedding cache
//!
//! One vector per catalog record, built lazily on the first semantic
//! operation and kept for the process's lifetime. The catalog itself is
//! reloaded per interaction, so the cache carries a fingerprint of the
//! embedded texts: a reloaded catalog with different content forces a
//! full rebuild, never an incremental patch.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::embedding::{EmbeddingError, EmbeddingProvider};
use crate::core::record::Record;

struct BuiltIndex {
    fingerprint: u64,
    vectors: Vec<Vec<f32>>,
}

/// Lazily built, rebuildable embedding index.
///
/// Readers see either the previous fully built index or the new one,
/// never a partially written state: a rebuild assembles the whole vector
/// set before swapping it in under the write lock.
pub struct EmbeddingIndex {
    state: RwLock<Option<Arc<BuiltIndex>>>,
}

impl EmbeddingIndex {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    /// Vectors for `records`, in record order. Builds or rebuilds the
    /// index when the cached fingerprint does not match.
    pub async fn vectors(
        &self,
        provider: &dyn EmbeddingProvider,
        records: &[Record],
    ) -> Result<Arc<Vec<Vec<f32>>>, EmbeddingError> {
        let fingerprint = fingerprint(records);

        if let Some(built) = self.state.read().await.as_ref() {
            if built.fingerprint == fingerprint {
                return Ok(Arc::new(built.vectors.clone()));
            }
        }

        // Embed without holding the lock; the provider call may be a
        // network round trip and must not stall other sessions.
        let texts: Vec<String> = records.iter().map(Record::embedding_text).collect();
        let vectors = provider.embed_batch(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::BatchMismatch {
                sent: texts.len(),
                received: vectors.len(),
            });
        }

        debug!(records = records.len(), "embedding index built");

        let mut state = self.state.write().await;
        // Another task may have built the same index while we embedded.
        if let Some(built) = state.as_ref() {
            if built.fingerprint == fingerprint {
                return Ok(Arc::new(built.vectors.clone()));
            }
        }
        let built = Arc::new(BuiltIndex {
            fingerprint,
            vectors,
        });
        *state = Some(built.clone());
        Ok(Arc::new(built.vectors.clone()))
    }

    /// Drop the cached index; the next semantic operation rebuilds it.
    pub async fn invalidate(&self) {
        *self.state.write().await = None;
    }

    /// Whether an index is currently cached (for status reporting).
    pub async fn is_built(&self) -> bool {
        self.state.read().await.is_some()
    }
}

impl Default for EmbeddingIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn fingerprint(records: &[Record]) -> u64 {
    let mut hasher = DefaultHasher::new();
    records.len().hash(&mut hasher);
    for record in records {
        record.title.hash(&mut hasher);
        record.description.hash(&mut hasher);
    }
    hasher.finish()
}
