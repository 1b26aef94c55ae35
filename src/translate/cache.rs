//! In-memory TTL cache for translation results.
//!
//! Keys are SHA-256 fingerprints of (source, target, text) so the map
//! never stores unbounded user text as keys. Expired entries are
//! skipped on read and swept opportunistically on write.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
struct CacheEntry {
    text: String,
    inserted_at: Instant,
}

pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Deterministic fingerprint of the normalized request tuple.
    pub fn key(source_lang: &str, target_lang: &str, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source_lang.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(target_lang.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if entry.inserted_at.elapsed() < self.ttl {
                    return Some(entry.text.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: String, text: String) {
        self.entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        self.entries.insert(
            key,
            CacheEntry {
                text,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let cache = ResultCache::new(Duration::from_secs(60));
        let key = ResultCache::key("en", "sw", "Hello");
        cache.insert(key.clone(), "Jambo".to_string());
        assert_eq!(cache.get(&key), Some("Jambo".to_string()));
    }

    #[test]
    fn miss_after_expiry() {
        let cache = ResultCache::new(Duration::from_millis(20));
        let key = ResultCache::key("en", "fr", "Hello");
        cache.insert(key.clone(), "Bonjour".to_string());
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get(&key), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn key_distinguishes_direction_and_text() {
        let a = ResultCache::key("en", "fr", "Hello");
        let b = ResultCache::key("fr", "en", "Hello");
        let c = ResultCache::key("en", "fr", "Hello!");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn insert_sweeps_expired_entries() {
        let cache = ResultCache::new(Duration::from_millis(10));
        cache.insert(ResultCache::key("en", "es", "one"), "uno".to_string());
        cache.insert(ResultCache::key("en", "es", "two"), "dos".to_string());
        std::thread::sleep(Duration::from_millis(30));
        cache.insert(ResultCache::key("en", "es", "three"), "tres".to_string());
        assert_eq!(cache.len(), 1);
    }
}
