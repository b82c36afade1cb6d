//! Symbol caches mapping bit patterns to glyphs.
//!
//! The mapping is a pure function of the pattern, so a cache never needs
//! invalidation and holds at most 256 entries. Two thread-safety tiers are
//! provided:
//!
//! - [`LocalSymbolCache`] - confined to one encoder, mutated through `&mut`
//! - [`SharedSymbolCache`] - cloneable handle over an `RwLock`, for workers
//!   rendering frames in parallel
//!
//! [`NoCache`] disables memoization entirely.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::encoder::BitPattern;

/// Number of distinct bit patterns.
const MAX_ENTRIES: usize = 256;

/// Hit/miss counters for a symbol cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoization strategy used by [`BrailleEncoder`](super::BrailleEncoder).
pub trait SymbolCache {
    /// Return the cached glyph for `pattern`, computing and storing it on a miss.
    fn get_or_insert_with<F>(&mut self, pattern: BitPattern, compute: F) -> char
    where
        F: FnOnce() -> char;

    /// Number of stored patterns.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stats(&self) -> CacheStats;
}

/// Cache owned by a single encoding session.
#[derive(Debug, Default)]
pub struct LocalSymbolCache {
    entries: HashMap<BitPattern, char>,
    stats: CacheStats,
}

impl LocalSymbolCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_capacity(MAX_ENTRIES),
            stats: CacheStats::default(),
        }
    }
}

impl SymbolCache for LocalSymbolCache {
    fn get_or_insert_with<F>(&mut self, pattern: BitPattern, compute: F) -> char
    where
        F: FnOnce() -> char,
    {
        if let Some(&glyph) = self.entries.get(&pattern) {
            self.stats.hits += 1;
            return glyph;
        }
        self.stats.misses += 1;
        *self.entries.entry(pattern).or_insert_with(compute)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// Lock-guarded cache shared between worker threads.
///
/// Clones share the same storage. Two workers that miss on the same pattern
/// at the same time both compute it, and the later insert wins. Both values
/// are identical, so this is harmless.
#[derive(Debug, Clone, Default)]
pub struct SharedSymbolCache {
    entries: Arc<RwLock<HashMap<BitPattern, char>>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl SharedSymbolCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::with_capacity(MAX_ENTRIES))),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl SymbolCache for SharedSymbolCache {
    fn get_or_insert_with<F>(&mut self, pattern: BitPattern, compute: F) -> char
    where
        F: FnOnce() -> char,
    {
        // A poisoned lock still holds valid entries: every value is a pure
        // function of its key.
        let cached = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pattern)
            .copied();
        if let Some(glyph) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return glyph;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let glyph = compute();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern, glyph);
        glyph
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Pass-through cache: every lookup computes the glyph.
#[derive(Debug, Default)]
pub struct NoCache {
    misses: u64,
}

impl SymbolCache for NoCache {
    fn get_or_insert_with<F>(&mut self, _pattern: BitPattern, compute: F) -> char
    where
        F: FnOnce() -> char,
    {
        self.misses += 1;
        compute()
    }

    fn len(&self) -> usize {
        0
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: 0,
            misses: self.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_local_cache_hit_after_miss() {
        let mut cache = LocalSymbolCache::new();
        let pattern = BitPattern::from_raw(0x0F);
        assert_eq!(cache.get_or_insert_with(pattern, || 'a'), 'a');
        // second compute is never called
        assert_eq!(cache.get_or_insert_with(pattern, || 'b'), 'a');
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_local_cache_bounded_by_pattern_count() {
        let mut cache = LocalSymbolCache::new();
        for round in 0..3 {
            for raw in 0..=255u8 {
                cache.get_or_insert_with(BitPattern::from_raw(raw), || 'x');
            }
            assert_eq!(cache.len(), 256, "round {}", round);
        }
        assert_eq!(cache.stats().misses, 256);
        assert_eq!(cache.stats().hits, 512);
    }

    #[test]
    fn test_no_cache_always_computes() {
        let mut cache = NoCache::default();
        let pattern = BitPattern::from_raw(1);
        assert_eq!(cache.get_or_insert_with(pattern, || 'a'), 'a');
        assert_eq!(cache.get_or_insert_with(pattern, || 'b'), 'b');
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_shared_cache_clones_share_storage() {
        let mut first = SharedSymbolCache::new();
        let mut second = first.clone();
        first.get_or_insert_with(BitPattern::from_raw(3), || 'z');
        assert_eq!(second.get_or_insert_with(BitPattern::from_raw(3), || 'q'), 'z');
        assert_eq!(first.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_shared_cache_concurrent_inserts() {
        let cache = SharedSymbolCache::new();
        thread::scope(|scope| {
            for _ in 0..4 {
                let mut handle = cache.clone();
                scope.spawn(move || {
                    for raw in 0..=255u8 {
                        let expected = char::from_u32(0x2800 + raw as u32).unwrap();
                        let glyph =
                            handle.get_or_insert_with(BitPattern::from_raw(raw), || expected);
                        assert_eq!(glyph, expected);
                    }
                });
            }
        });
        assert_eq!(cache.len(), 256);
        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, 4 * 256);
    }
}
