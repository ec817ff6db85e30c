use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lru::LruCache;
use siphasher::sip::SipHasher13;
use tracing::debug;

use super::{Embedder, EmbeddingError};

/// LRU cache in front of another embedder, keyed by a fingerprint of the
/// entity text. An edited job or profile produces a new key; the stale vector
/// ages out.
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    cache: Mutex<LruCache<u64, Arc<Vec<f32>>>>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn fingerprint(&self, text: &str) -> u64 {
        let mut hasher = SipHasher13::new();
        self.inner.name().hash(&mut hasher);
        text.hash(&mut hasher);
        hasher.finish()
    }

    fn lookup(&self, key: u64) -> Option<Arc<Vec<f32>>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(&key).cloned()
    }

    fn store(&self, key: u64, vector: Arc<Vec<f32>>) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(key, vector);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Embedder for CachedEmbedder {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = self.fingerprint(text);
        if let Some(hit) = self.lookup(key) {
            debug!(key, "embedding cache hit");
            return Ok(hit.as_ref().clone());
        }

        // Lock is not held across the await; concurrent misses may both call
        // the inner embedder and the later put wins.
        let vector = self.inner.embed(text).await?;
        self.store(key, Arc::new(vector.clone()));
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn test_repeat_text_hits_cache() {
        let inner = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedEmbedder::new(inner.clone(), 8);

        let first = cached.embed("python sql").await.unwrap();
        let second = cached.embed("python sql").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn test_changed_text_misses_cache() {
        let inner = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedEmbedder::new(inner.clone(), 8);

        cached.embed("python").await.unwrap();
        cached.embed("python, sql").await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let inner = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedEmbedder::new(inner.clone(), 1);

        cached.embed("a").await.unwrap();
        cached.embed("b").await.unwrap();
        cached.embed("a").await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cached = CachedEmbedder::new(Arc::new(FailingEmbedder), 4);
        assert!(cached.embed("x").await.is_err());
        assert_eq!(cached.len(), 0);
    }
}
