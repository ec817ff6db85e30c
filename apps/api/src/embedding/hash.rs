use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use siphasher::sip::SipHasher13;

use super::{Embedder, EmbeddingError};

// Changing either key changes every vector.
const HASH_KEY_0: u64 = 0x6361_6d70_7573_7065;
const HASH_KEY_1: u64 = 0x6d61_7463_6865_7231;

/// Feature-hashing embedder. Tokens are hashed into a fixed number of buckets
/// with a sign bit, then the vector is L2-normalized.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(token: &str, salt: u8) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
        salt.hash(&mut hasher);
        token.hash(&mut hasher);
        hasher.finish()
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];

        for token in tokenize(text) {
            let idx = (Self::hash(&token, 0) % self.dimension as u64) as usize;
            let sign = if Self::hash(&token, 1) % 2 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }
}

/// Lower-cased alphanumeric tokens; `+`, `#` and `.` stay attached so
/// "c++", "c#" and "node.js" survive.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.').to_lowercase())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;

    #[test]
    fn test_vectors_are_normalized() {
        let embedder = HashEmbedder::new(64);
        let v = embedder.embed_sync("Rust backend engineer with PostgreSQL");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
        assert_eq!(v.len(), 64);
    }

    #[test]
    fn test_same_text_same_vector() {
        let embedder = HashEmbedder::new(128);
        assert_eq!(
            embedder.embed_sync("Data analyst, SQL, Excel"),
            embedder.embed_sync("Data analyst, SQL, Excel")
        );
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let embedder = HashEmbedder::new(128);
        assert_eq!(
            embedder.embed_sync("Python; SQL"),
            embedder.embed_sync("python sql")
        );
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(16);
        assert!(embedder.embed_sync("  ").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_overlapping_text_is_more_similar() {
        let embedder = HashEmbedder::new(256);
        let job = embedder.embed_sync("python sql data analysis dashboards");
        let close = embedder.embed_sync("python sql data visualisation");
        let far = embedder.embed_sync("welding fabrication cnc machining");

        assert!(cosine_similarity(&job, &close) > cosine_similarity(&job, &far));
    }

    #[test]
    fn test_tokenize_keeps_language_suffixes() {
        let tokens: Vec<String> = tokenize("C++, C# and Node.js.").collect();
        assert_eq!(tokens, vec!["c++", "c#", "and", "node.js"]);
    }

    #[tokio::test]
    async fn test_trait_embed_matches_sync() {
        let embedder = HashEmbedder::new(32);
        let via_trait = embedder.embed("java spring").await.unwrap();
        assert_eq!(via_trait, embedder.embed_sync("java spring"));
        assert_eq!(embedder.name(), "hash");
        assert_eq!(embedder.dimension(), 32);
    }
}
