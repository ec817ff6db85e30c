//! Text embedding capability used by the semantic match dimension.
//!
//! Backends:
//! - `HashEmbedder`: feature hashing, deterministic, no network (default)
//! - `HttpEmbedder`: OpenAI-compatible `/embeddings` endpoint
//!
//! Either is wrapped in `CachedEmbedder` before landing in `AppState`.

use async_trait::async_trait;
use thiserror::Error;

pub mod cache;
pub mod hash;
pub mod http;

pub use cache::CachedEmbedder;
pub use hash::HashEmbedder;
pub use http::HttpEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding response contained no vectors")]
    EmptyResponse,

    #[error("Expected {expected} dimensions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Backend label ("hash", "http"), surfaced in match responses.
    fn name(&self) -> &'static str;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Cosine similarity mapped into [0, 1].
///
/// Returns 0.0 for mismatched lengths or a zero vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    ((dot / (norm_a * norm_b) + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_are_one() {
        let sim = cosine_similarity(&[0.6, 0.8, 0.0], &[0.6, 0.8, 0.0]);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_opposite_vectors_are_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!(sim.abs() < 1e-9);
    }

    #[test]
    fn test_orthogonal_vectors_are_half() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!((sim - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_length_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
