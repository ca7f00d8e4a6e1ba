//! Short-lived cache in front of the generative-text service.
//!
//! Entries expire lazily: an entry older than the TTL is removed by the read
//! that notices it, there is no background sweep.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::{collections::HashMap, fmt::Debug};
use tracing::debug;

/// Lifetime of a cached generative answer: 15 minutes.
pub fn default_ttl() -> Duration {
    Duration::minutes(15)
}

pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

impl<C: Clock> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        C::now(self)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ResponseCache<C: Clock = SystemClock> {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: C,
}

impl ResponseCache<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock, default_ttl())
    }
}

impl Default for ResponseCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ResponseCache<C> {
    pub fn with_clock(clock: C, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let entry = entries.get(key)?;
        if now - entry.created_at > self.ttl {
            debug!(key, "cache entry expired");
            entries.remove(key);
            return None;
        }

        Some(entry.value.clone())
    }

    /// Overwrites any previous entry for `key` with a fresh timestamp.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let entry = CacheEntry {
            value: value.into(),
            created_at: self.clock.now(),
        };
        self.entries.lock().insert(key.into(), entry);
    }

    /// Number of stored entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Cache key builders. Each namespace keeps its keys apart.
pub struct CacheKey;

impl CacheKey {
    pub fn advice(city: &str) -> String {
        format!("advice:{}", normalize(city))
    }

    /// Order-sensitive: `verdict(a, b)` and `verdict(b, a)` are distinct keys.
    pub fn verdict(city_a: &str, city_b: &str) -> String {
        format!("verdict:{}|{}", normalize(city_a), normalize(city_b))
    }
}

fn normalize(city: &str) -> String {
    city.trim().to_lowercase()
}
