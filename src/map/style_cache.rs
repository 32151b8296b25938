use chrono::Utc;
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use crate::logging::log;

use crate::constants::{STYLE_CACHE_KEY, STYLE_CACHE_TTL_MS};

/// Minimal key-value persistence the style cache needs. Backed by
/// localStorage in the browser; tests use an in-memory map.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    /// Persisting may fail (quota exceeded, private browsing). Failure is
    /// non-fatal for the caller.
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str);
}

/// Persisted payload: the style document plus the time it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedStyle {
    style: serde_json::Value,
    timestamp: i64,
}

/// Persists a fetched map-style document with a time-to-live. An entry
/// older than the TTL, or one that fails to parse, is never returned; it is
/// deleted and treated as a miss.
pub struct StyleCache<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StyleCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn load(&self) -> Option<serde_json::Value> {
        self.load_at(Utc::now().timestamp_millis())
    }

    /// TTL check against an explicit clock, split out for tests.
    #[must_use]
    pub fn load_at(&self, now_ms: i64) -> Option<serde_json::Value> {
        let raw = self.store.get(STYLE_CACHE_KEY)?;
        let Ok(entry) = serde_json::from_str::<CachedStyle>(&raw) else {
            log!("Discarding corrupt style cache entry");
            self.invalidate();
            return None;
        };
        if now_ms - entry.timestamp >= STYLE_CACHE_TTL_MS {
            log!("Discarding expired style cache entry");
            self.invalidate();
            return None;
        }
        Some(entry.style)
    }

    pub fn save(&self, style: &serde_json::Value) {
        self.save_at(style, Utc::now().timestamp_millis());
    }

    pub fn save_at(&self, style: &serde_json::Value, now_ms: i64) {
        let entry = CachedStyle {
            style: style.clone(),
            timestamp: now_ms,
        };
        let Ok(raw) = serde_json::to_string(&entry) else {
            return;
        };
        if let Err(err) = self.store.set(STYLE_CACHE_KEY, &raw) {
            // The map still works without caching
            log!("Failed to persist style cache: {err}");
        }
    }

    pub fn invalidate(&self) {
        self.store.remove(STYLE_CACHE_KEY);
    }
}

/// localStorage-backed store used in the browser.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let storage = Self::storage().ok_or("localStorage unavailable")?;
        storage
            .set_item(key, value)
            .map_err(|_| "localStorage.setItem failed".to_string())
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        entries: RefCell<HashMap<String, String>>,
        fail_writes: bool,
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> Result<(), String> {
            if self.fail_writes {
                return Err("quota exceeded".to_string());
            }
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) {
            self.entries.borrow_mut().remove(key);
        }
    }

    fn style() -> serde_json::Value {
        serde_json::json!({"version": 8, "sources": {}, "layers": []})
    }

    #[test]
    fn test_load_of_empty_store_is_miss() {
        let cache = StyleCache::new(MemoryStore::default());
        assert!(cache.load_at(0).is_none());
    }

    #[test]
    fn test_fresh_entry_round_trips() {
        let cache = StyleCache::new(MemoryStore::default());
        cache.save_at(&style(), 1_000);
        assert_eq!(cache.load_at(2_000), Some(style()));
    }

    #[test]
    fn test_expired_entry_is_miss_and_deleted() {
        let cache = StyleCache::new(MemoryStore::default());
        cache.save_at(&style(), 1_000);
        assert!(cache.load_at(1_000 + STYLE_CACHE_TTL_MS).is_none());
        // The expired entry is gone, a later load at any clock is also a miss
        assert!(cache.load_at(1_500).is_none());
    }

    #[test]
    fn test_entry_just_inside_ttl_is_hit() {
        let cache = StyleCache::new(MemoryStore::default());
        cache.save_at(&style(), 1_000);
        assert!(cache.load_at(1_000 + STYLE_CACHE_TTL_MS - 1).is_some());
    }

    #[test]
    fn test_corrupt_entry_is_miss_and_deleted() {
        let store = MemoryStore::default();
        store
            .set(STYLE_CACHE_KEY, "{not json")
            .expect("seed corrupt entry");
        let cache = StyleCache::new(store);
        assert!(cache.load_at(0).is_none());
        assert!(cache.load_at(0).is_none());
    }

    #[test]
    fn test_failed_save_is_non_fatal() {
        let cache = StyleCache::new(MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        });
        cache.save_at(&style(), 1_000);
        assert!(cache.load_at(1_000).is_none());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = StyleCache::new(MemoryStore::default());
        cache.save_at(&style(), 1_000);
        cache.invalidate();
        assert!(cache.load_at(1_001).is_none());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_round_trip() {
        let store = LocalStorageStore;
        store.remove(STYLE_CACHE_KEY);

        let cache = StyleCache::new(store);
        let style = serde_json::json!({"version": 8});
        cache.save(&style);
        assert_eq!(cache.load(), Some(style));

        cache.invalidate();
        assert!(cache.load().is_none());
    }
}
