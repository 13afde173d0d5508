//! Time-bounded memoization of rendered template output.
//!
//! Rendering the same template with the same data within a short window is
//! common during one generation run (and across quick successive runs in
//! the same process), so rendered text is memoized under a key derived
//! from the template id and the canonical serialization of its render
//! data. Entries expire after a configurable window; an expired entry is
//! reported as a miss and evicted lazily when a lookup touches it.

// Internal imports (std, crate)
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value as JsonValue;

use super::context::RenderData;

/// Default expiry window for cached renders
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(5 * 60);

/// One cached render
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Rendered text
    content: String,
    /// When the entry was stored
    created_at: Instant,
    /// Snapshot of the render data the content was produced from
    #[allow(dead_code)]
    source_data: JsonValue,
}

/// One row of a diagnostic cache snapshot
#[derive(Debug, Clone)]
pub struct CacheEntryStats {
    pub key: String,
    pub age_ms: u128,
}

/// Diagnostic cache snapshot; ages are computed against snapshot time
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub entries: Vec<CacheEntryStats>,
}

/// In-memory render cache, safe for concurrent `get`/`put`
#[derive(Debug)]
pub struct RenderCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    expiry: Duration,
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderCache {
    /// Create a cache with the default 5 minute expiry window
    pub fn new() -> Self {
        Self::with_expiry(DEFAULT_EXPIRY)
    }

    /// Create a cache with a custom expiry window
    pub fn with_expiry(expiry: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            expiry,
        }
    }

    /// Derive the cache key for a template id and its render data.
    ///
    /// Template ids never contain `::`, so keys cannot collide across ids.
    pub fn cache_key(template_id: &str, data: &RenderData) -> String {
        format!("{template_id}::{}", data.canonical_string())
    }

    /// Look up unexpired content for `key`.
    ///
    /// An expired entry is evicted and reported as a miss; stale content
    /// is never returned.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.created_at.elapsed() < self.expiry => {
                Some(entry.content.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store content for `key`, overwriting any previous entry and
    /// restarting its expiry window
    pub fn put(&self, key: &str, content: &str, data: &RenderData) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            CacheEntry {
                content: content.to_string(),
                created_at: Instant::now(),
                source_data: data.to_value(),
            },
        );
    }

    /// Snapshot of what is physically stored, including entries that have
    /// expired but have not been touched by a lookup yet
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().unwrap();
        let rows = entries
            .iter()
            .map(|(key, entry)| CacheEntryStats {
                key: key.clone(),
                age_ms: entry.created_at.elapsed().as_millis(),
            })
            .collect();
        CacheStats {
            size: entries.len(),
            entries: rows,
        }
    }

    /// Drop every entry; subsequent lookups for prior keys are misses
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}
