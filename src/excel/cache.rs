//! In-memory cache of decoded day sheets.
//!
//! Decoding a workbook is the expensive part of every lookup, so each day's
//! grid is read once, normalized once, and shared as an `Arc` until its TTL
//! runs out or the sheet is replaced through an upload. The lock is only held
//! to read or insert an entry, never while a workbook is being decoded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::excel::normalizer::normalize_checked;
use crate::excel::source::SheetSource;
use crate::models::{Day, NormalizedSheet, RawGrid};

/// A decoded sheet in both shapes the lookups read.
#[derive(Debug)]
pub struct CachedSheet {
    pub day: Day,
    pub raw: RawGrid,
    pub normalized: NormalizedSheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

type Entry = (Instant, Arc<CachedSheet>);

pub struct CachedSheetSource<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: SheetSource> CachedSheetSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // a poisoned lock still holds whole entries
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The day's sheet, decoded and normalized, from cache when still fresh.
    pub fn get(&self, day: Day) -> Result<Arc<CachedSheet>> {
        let key = self.inner.identity(day);
        {
            let guard = self.lock();
            if let Some((loaded_at, sheet)) = guard.get(&key) {
                if loaded_at.elapsed() < self.ttl {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(Arc::clone(sheet));
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let raw = self.inner.load(day)?;
        let normalized = normalize_checked(&raw, &key);
        let sheet = Arc::new(CachedSheet { day, raw, normalized });
        self.lock().insert(key.clone(), (Instant::now(), Arc::clone(&sheet)));
        debug!(sheet = %key, "sheet cached");
        Ok(sheet)
    }

    /// Drops the day's entry so the next lookup reads the source again.
    pub fn invalidate(&self, day: Day) -> bool {
        let key = self.inner.identity(day);
        self.lock().remove(&key).is_some()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::source::MemorySheetSource;

    fn source() -> MemorySheetSource {
        MemorySheetSource::new().with_day(Day::Monday, RawGrid::from_strings(vec![vec!["Monday"], vec!["Room"]]))
    }

    #[test]
    fn test_second_read_is_a_hit() {
        let cache = CachedSheetSource::new(source(), Duration::from_secs(60));
        let a = cache.get(Day::Monday).unwrap();
        let b = cache.get(Day::Monday).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, entries: 1 });
    }

    #[test]
    fn test_zero_ttl_always_reloads() {
        let cache = CachedSheetSource::new(source(), Duration::ZERO);
        cache.get(Day::Monday).unwrap();
        cache.get(Day::Monday).unwrap();
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_invalidate_and_errors() {
        let cache = CachedSheetSource::new(source(), Duration::from_secs(60));
        cache.get(Day::Monday).unwrap();
        assert!(cache.invalidate(Day::Monday));
        assert!(!cache.invalidate(Day::Monday));
        assert!(cache.get(Day::Thursday).is_err());
        assert_eq!(cache.stats().entries, 0);
    }
}
