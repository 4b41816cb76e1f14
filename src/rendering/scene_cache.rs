// src/rendering/scene_cache.rs
// Bounded LRU of built scenes, keyed by the serialized request

use lru::LruCache;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::error::SceneResult;
use crate::pipeline::{build_scene, SceneOutput, SceneRequest};

struct CacheEntry {
    // Full request text, compared on hit to rule out hash collisions
    request: String,
    output: Arc<SceneOutput>,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

pub struct SceneCache {
    cache: LruCache<u64, CacheEntry>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl SceneCache {
    /// A capacity of 0 is treated as 1
    pub fn new(max_entries: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(cap),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    fn make_key(request: &str) -> u64 {
        let mut hasher = FxHasher::default();
        request.hash(&mut hasher);
        hasher.finish()
    }

    /// Cached scene for `request`, building and inserting it on a miss.
    /// Failed builds are not cached.
    pub fn get_or_build(&mut self, request: &SceneRequest) -> SceneResult<Arc<SceneOutput>> {
        let text = serde_json::to_string(request)?;
        let key = Self::make_key(&text);

        if let Some(entry) = self.cache.get(&key) {
            if entry.request == text {
                self.hits += 1;
                return Ok(Arc::clone(&entry.output));
            }
        }

        self.misses += 1;
        let output = Arc::new(build_scene(request)?);

        let entry = CacheEntry {
            request: text,
            output: Arc::clone(&output),
        };
        if let Some((old_key, _)) = self.cache.push(key, entry) {
            // push also returns the replaced entry when the key was already present
            if old_key != key {
                self.evictions += 1;
                log::debug!("Scene cache evicted entry {:016x}", old_key);
            }
        }

        Ok(output)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let total_requests = self.hits + self.misses;
        CacheStats {
            entries: self.cache.len(),
            max_entries: self.cache.cap().get(),
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            hit_rate: if total_requests > 0 {
                self.hits as f64 / total_requests as f64
            } else {
                0.0
            },
        }
    }
}
