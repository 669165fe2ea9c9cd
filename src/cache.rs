use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// Time source for cache expiry checks, injectable so tests can use a fake
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// In-process TTL cache shared across requests.
///
/// Entries expire after a fixed TTL and are evicted lazily: an expired entry
/// is treated as absent on read and overwritten by the next insert for its
/// key. There is no invalidation API.
pub struct TtlCache<K, V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<K, (V, DateTime<Utc>)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs as i64),
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, or `None` if absent or expired
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        let (value, inserted_at) = entries.get(key)?;

        if self.clock.now() - *inserted_at >= self.ttl {
            return None;
        }

        Some(value.clone())
    }

    /// Stores `value` under `key` with a fresh timestamp
    pub async fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        entries.insert(key, (value, now));
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Manually advanced clock for TTL tests
    pub struct FakeClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self {
                now: Mutex::new(Utc::now()),
            }
        }

        pub fn advance_secs(&self, secs: i64) {
            let mut now = self.now.lock().unwrap();
            *now += Duration::seconds(secs);
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeClock;
    use super::*;

    #[tokio::test]
    async fn test_get_returns_fresh_entry() {
        let cache: TtlCache<i64, String> = TtlCache::new(3600, Arc::new(SystemClock));
        cache.insert(603, "poster".to_string()).await;

        assert_eq!(cache.get(&603).await, Some("poster".to_string()));
    }

    #[tokio::test]
    async fn test_get_misses_unknown_key() {
        let cache: TtlCache<i64, String> = TtlCache::new(3600, Arc::new(SystemClock));
        assert_eq!(cache.get(&999).await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_treated_as_absent() {
        let clock = Arc::new(FakeClock::new());
        let cache: TtlCache<i64, String> = TtlCache::new(3600, clock.clone());

        cache.insert(603, "poster".to_string()).await;
        clock.advance_secs(3599);
        assert_eq!(cache.get(&603).await, Some("poster".to_string()));

        clock.advance_secs(1);
        assert_eq!(cache.get(&603).await, None);
    }

    #[tokio::test]
    async fn test_insert_overwrites_expired_entry() {
        let clock = Arc::new(FakeClock::new());
        let cache: TtlCache<i64, String> = TtlCache::new(60, clock.clone());

        cache.insert(603, "stale".to_string()).await;
        clock.advance_secs(120);
        cache.insert(603, "fresh".to_string()).await;

        assert_eq!(cache.get(&603).await, Some("fresh".to_string()));
    }
}
