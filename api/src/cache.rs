use moka::sync::Cache;
use std::time::Duration;
use tokio::time::Instant;

/// Store for rendered responses.
///
/// Entries live until their TTL runs out or the cache is cleared; a hit inside
/// the TTL may be stale with respect to the store, and callers accept that.
pub trait PageCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: String, ttl: Duration);
    fn clear(&self);
}

#[derive(Clone)]
struct CachedPage {
    body: String,
    expires_at: Instant,
}

/// Process-wide in-memory cache backed by `moka`.
///
/// `max_capacity` bounds the number of rendered pages kept at once; moka
/// evicts the least useful ones past that. Entries also carry their own
/// deadline so the per-`put` TTL is honoured on top of the cache-wide one.
pub struct MemoryPageCache {
    pages: Cache<String, CachedPage>,
}

impl MemoryPageCache {
    pub fn new(max_capacity: u64, time_to_live: Duration) -> Self {
        let pages = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(time_to_live)
            .build();
        Self { pages }
    }

    /// Number of cached pages once pending evictions have been applied.
    pub fn entry_count(&self) -> u64 {
        self.pages.run_pending_tasks();
        self.pages.entry_count()
    }
}

impl PageCache for MemoryPageCache {
    fn get(&self, key: &str) -> Option<String> {
        let page = self.pages.get(key)?;
        if page.expires_at > Instant::now() {
            return Some(page.body);
        }
        self.pages.invalidate(key);
        None
    }

    fn put(&self, key: &str, value: String, ttl: Duration) {
        self.pages.insert(
            key.to_string(),
            CachedPage {
                body: value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn clear(&self) {
        self.pages.invalidate_all();
    }
}
