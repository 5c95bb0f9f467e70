use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

/// Read-through cache of per-lot data, keyed by parking-lot id.
///
/// Entries older than the TTL are refetched on next access. Failed fetches
/// are not cached.
#[derive(Debug)]
pub struct LotCache<T> {
    ttl: Duration,
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T: Clone> LotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Fresh cached value for a lot, if any.
    pub fn get(&self, lot_id: &str, now: Instant) -> Option<T> {
        self.entries
            .get(lot_id)
            .filter(|e| now.saturating_duration_since(e.fetched_at) < self.ttl)
            .map(|e| e.value.clone())
    }

    pub fn insert(&mut self, lot_id: &str, value: T, now: Instant) {
        self.entries.insert(
            lot_id.to_string(),
            CacheEntry {
                value,
                fetched_at: now,
            },
        );
    }

    pub async fn get_or_fetch<F, Fut, E>(&mut self, lot_id: &str, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(lot_id, Instant::now()) {
            debug!(lot_id, "lot cache hit");
            return Ok(value);
        }
        debug!(lot_id, "lot cache miss");
        let value = fetch().await?;
        self.insert(lot_id, value.clone(), Instant::now());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn empty_cache_misses() {
        let cache: LotCache<u32> = LotCache::new(Duration::from_secs(60));
        assert!(cache.get("1", Instant::now()).is_none());
    }

    #[test]
    fn fresh_entry_hits() {
        let mut cache = LotCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert("1", 5u32, t0);
        assert_eq!(cache.get("1", t0 + Duration::from_secs(59)), Some(5));
        assert!(cache.get("2", t0).is_none());
    }

    #[test]
    fn stale_entry_misses() {
        let mut cache = LotCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert("1", 5u32, t0);
        assert!(cache.get("1", t0 + Duration::from_secs(60)).is_none());
    }

    #[test]
    fn zero_ttl_never_hits() {
        let mut cache = LotCache::new(Duration::ZERO);
        let t0 = Instant::now();
        cache.insert("1", 5u32, t0);
        assert!(cache.get("1", t0).is_none());
    }

    #[tokio::test]
    async fn get_or_fetch_fetches_once_per_lot() {
        let calls = AtomicUsize::new(0);
        let mut cache = LotCache::new(Duration::from_secs(60));

        for _ in 0..3 {
            let v: Result<String, ()> = cache
                .get_or_fetch("7", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("policy-7".to_string())
                })
                .await;
            assert_eq!(v.unwrap(), "policy-7");
        }
        let _: Result<String, ()> = cache
            .get_or_fetch("8", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("policy-8".to_string())
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let mut cache: LotCache<u32> = LotCache::new(Duration::from_secs(60));
        let failed: Result<u32, &str> = cache.get_or_fetch("1", || async { Err("boom") }).await;
        assert!(failed.is_err());
        assert!(cache.get("1", Instant::now()).is_none());

        let ok: Result<u32, &str> = cache.get_or_fetch("1", || async { Ok(3) }).await;
        assert_eq!(ok, Ok(3));
    }
}
