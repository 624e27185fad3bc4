use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct CacheStat {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub size: usize,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub types: CacheStat,
    pub methods: CacheStat,
    pub fields: CacheStat,
    pub provider_errors: u64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cache Statistics:")?;
        writeln!(f, "  Type Cache:     {}", self.types)?;
        writeln!(f, "  Method Cache:   {}", self.methods)?;
        writeln!(f, "  Field Cache:    {}", self.fields)?;
        writeln!(f, "  Provider errors: {}", self.provider_errors)?;
        Ok(())
    }
}

impl std::fmt::Display for CacheStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hits: {:>8}, misses: {:>8}, hit_rate: {:>6.2}%, size: {:>8}",
            self.hits,
            self.misses,
            self.hit_rate * 100.0,
            self.size
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheSizes {
    pub type_size: usize,
    pub method_size: usize,
    pub field_size: usize,
}

/// Resolver counters.
///
/// Every counter uses `Ordering::Relaxed`; they are independent tallies and
/// never order other memory operations.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    pub type_cache_hits: AtomicU64,
    pub type_cache_misses: AtomicU64,
    pub method_cache_hits: AtomicU64,
    pub method_cache_misses: AtomicU64,
    pub field_cache_hits: AtomicU64,
    pub field_cache_misses: AtomicU64,
    /// Provider calls that failed and were turned into an absence
    pub provider_errors: AtomicU64,
}

impl ResolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_type_cache_hit(&self) {
        self.type_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_type_cache_miss(&self) {
        self.type_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_method_cache_hit(&self) {
        self.method_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_method_cache_miss(&self) {
        self.method_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_field_cache_hit(&self) {
        self.field_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_field_cache_miss(&self) {
        self.field_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_error(&self) {
        self.provider_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_statistics(&self, sizes: CacheSizes) -> CacheStats {
        CacheStats {
            types: self.stat(
                self.type_cache_hits.load(Ordering::Relaxed),
                self.type_cache_misses.load(Ordering::Relaxed),
                sizes.type_size,
            ),
            methods: self.stat(
                self.method_cache_hits.load(Ordering::Relaxed),
                self.method_cache_misses.load(Ordering::Relaxed),
                sizes.method_size,
            ),
            fields: self.stat(
                self.field_cache_hits.load(Ordering::Relaxed),
                self.field_cache_misses.load(Ordering::Relaxed),
                sizes.field_size,
            ),
            provider_errors: self.provider_errors.load(Ordering::Relaxed),
        }
    }

    fn stat(&self, hits: u64, misses: u64, size: usize) -> CacheStat {
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };
        CacheStat {
            hits,
            misses,
            hit_rate,
            size,
        }
    }
}
