//! Embedding provider interface and the bundled local model
//!
//! The engine treats `embed` as a black box behind [`EmbeddingProvider`]:
//! a remote provider is a network round trip, so the trait is async and
//! failures propagate instead of degrading silently. The bundled
//! [`HarmonicEmbedder`] is a deterministic, training-free local model
//! (harmonic token projection) that keeps the crate usable offline and
//! the tests reproducible.

use std::f64::consts::PI;

use async_trait::async_trait;
use thiserror::Error;

/// Embedding dimension (2 values per modulus).
pub const EMBEDDING_DIM: usize = 384;

const NUM_MODULI: usize = EMBEDDING_DIM / 2;

/// Maximum token length in Unicode code points.
const MAX_TOKEN_LENGTH: usize = 64;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider unavailable: {0}")]
    Provider(String),
    #[error("batch length mismatch: sent {sent} texts, received {received} vectors")]
    BatchMismatch { sent: usize, received: usize },
}

/// External embedding collaborator.
///
/// `embed_batch` must return vectors in input order; ranking correctness
/// depends on positional correspondence.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Deterministic local embedding model.
///
/// Each token is encoded as a base-2^16 integer over its code points,
/// reduced modulo a set of primes, and projected onto the unit circle
/// per modulus; token vectors are mean-pooled and L2 normalized.
pub struct HarmonicEmbedder {
    moduli: Vec<u64>,
}

impl HarmonicEmbedder {
    pub fn new() -> Self {
        Self {
            moduli: first_primes(NUM_MODULI),
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; EMBEDDING_DIM];
        }

        let mut sum = vec![0.0f64; EMBEDDING_DIM];
        for token in &tokens {
            let token_emb = self.embed_token(token);
            for (acc, val) in sum.iter_mut().zip(token_emb) {
                *acc += val;
            }
        }
        for val in &mut sum {
            *val /= tokens.len() as f64;
        }

        let norm: f64 = sum.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            sum.iter().map(|x| (*x / norm) as f32).collect()
        } else {
            sum.iter().map(|x| *x as f32).collect()
        }
    }

    fn embed_token(&self, token: &str) -> Vec<f64> {
        let n = token_to_integer(token);
        let mut out = Vec::with_capacity(EMBEDDING_DIM);
        for &m in &self.moduli {
            let theta = 2.0 * PI * ((n % m) as f64) / (m as f64);
            out.push(theta.sin());
            out.push(theta.cos());
        }
        out
    }
}

impl Default for HarmonicEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for HarmonicEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_text(text))
    }
}

/// N = Σ u_j * B^(L-j) with B = 2^16, wrapping on overflow.
fn token_to_integer(token: &str) -> u64 {
    token
        .chars()
        .take(MAX_TOKEN_LENGTH)
        .fold(0u64, |n, c| n.wrapping_mul(65536).wrapping_add(c as u64))
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

fn first_primes(count: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(count);
    let mut candidate = 2u64;
    while primes.len() < count {
        if primes.iter().all(|p| candidate % p != 0) {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

/// Cosine similarity: `dot(a,b) / (norm(a) * norm(b))`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic() {
        let model = HarmonicEmbedder::new();
        let a = model.embed("intercambio en Berlín").await.unwrap();
        let b = model.embed("intercambio en Berlín").await.unwrap();
        let c = model.embed("curso de cocina").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), EMBEDDING_DIM);
    }

    #[tokio::test]
    async fn test_normalized_output() {
        let model = HarmonicEmbedder::new();
        let v = model.embed("tecnología e innovación digital").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_batch_order_matches_input() {
        let model = HarmonicEmbedder::new();
        let texts = vec!["uno".to_string(), "dos".to_string(), "tres".to_string()];
        let batch = model.embed_batch(&texts).await.unwrap();
        assert_eq!(batch.len(), 3);
        for (text, vec) in texts.iter().zip(&batch) {
            assert_eq!(&model.embed(text).await.unwrap(), vec);
        }
    }

    #[test]
    fn test_first_primes() {
        assert_eq!(first_primes(5), vec![2, 3, 5, 7, 11]);
        assert_eq!(first_primes(NUM_MODULI).len(), NUM_MODULI);
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);

        let orthogonal = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &orthogonal).abs() < 1e-6);

        let opposite = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &opposite) + 1.0).abs() < 1e-6);

        // Zero vector never divides by zero.
        assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
    }
}
