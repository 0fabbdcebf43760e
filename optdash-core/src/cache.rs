//! In-memory TTL cache keyed by a BLAKE3 fingerprint of request inputs.
//!
//! Owned by the dashboard session; entries are checked for expiry on read.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Deterministic identity of a cached request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Hash an ordered list of parts. Parts are length-prefixed so
    /// `["AB", "C"]` and `["A", "BC"]` differ.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            let bytes = part.as_ref().as_bytes();
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn for_tickers(tickers: &[String]) -> Self {
        let mut parts = Vec::with_capacity(tickers.len() + 1);
        parts.push("scan");
        parts.extend(tickers.iter().map(String::as_str));
        Self::from_parts(&parts)
    }

    pub fn for_chain(ticker: &str, expiry: NaiveDate) -> Self {
        Self::from_parts(&["chain", ticker, expiry.to_string().as_str()])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0[..8] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Values expire `ttl` after insertion.
pub struct TtlCache<V> {
    entries: HashMap<Fingerprint, Entry<V>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &Fingerprint) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &Fingerprint, now: Instant) -> Option<V> {
        let entry = self.entries.get(key)?;
        if now.saturating_duration_since(entry.inserted_at) >= self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn insert(&mut self, key: Fingerprint, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Stale entries are purged on every insert, so the map stays bounded by
    /// what was inserted within one TTL.
    pub fn insert_at(&mut self, key: Fingerprint, value: V, now: Instant) {
        self.purge_expired(now);
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.inserted_at) < ttl);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = Fingerprint::for_tickers(&tickers(&["TCS.NS", "INFY.NS"]));
        let b = Fingerprint::for_tickers(&tickers(&["TCS.NS", "INFY.NS"]));
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_depends_on_order_and_boundaries() {
        let a = Fingerprint::for_tickers(&tickers(&["TCS.NS", "INFY.NS"]));
        let b = Fingerprint::for_tickers(&tickers(&["INFY.NS", "TCS.NS"]));
        assert_ne!(a, b);
        assert_ne!(
            Fingerprint::from_parts(&["AB", "C"]),
            Fingerprint::from_parts(&["A", "BC"])
        );
    }

    #[test]
    fn entry_expires_after_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(600));
        let key = Fingerprint::from_parts(&["k"]);
        let t0 = Instant::now();
        cache.insert_at(key, 7u32, t0);

        assert_eq!(cache.get_at(&key, t0 + Duration::from_secs(599)), Some(7));
        assert_eq!(cache.get_at(&key, t0 + Duration::from_secs(600)), None);
    }

    #[test]
    fn insert_drops_stale_entries() {
        let mut cache = TtlCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.insert_at(Fingerprint::from_parts(&["a"]), 1u32, t0);
        cache.insert_at(Fingerprint::from_parts(&["b"]), 2u32, t0 + Duration::from_secs(5));
        assert_eq!(cache.len(), 2);

        cache.insert_at(Fingerprint::from_parts(&["c"]), 3u32, t0 + Duration::from_secs(12));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_at(&Fingerprint::from_parts(&["a"]), t0), None);
    }

    #[test]
    fn purge_removes_only_expired() {
        let mut cache = TtlCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.insert_at(Fingerprint::from_parts(&["old"]), 1u32, t0);
        cache.insert_at(Fingerprint::from_parts(&["new"]), 2u32, t0 + Duration::from_secs(8));

        assert_eq!(cache.purge_expired(t0 + Duration::from_secs(12)), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        let cache: TtlCache<u32> = TtlCache::default();
        assert!(cache.get(&Fingerprint::from_parts(&["nope"])).is_none());
        assert!(cache.is_empty());
    }
}
