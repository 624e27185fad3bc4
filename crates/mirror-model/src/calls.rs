use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Live counters for every provider entry point.
#[derive(Debug, Default)]
pub struct ProviderCalls {
    pub version_lookups: AtomicUsize,
    pub find_type: AtomicUsize,
    pub declared_methods: AtomicUsize,
    pub declared_fields: AtomicUsize,
    pub unlock_access: AtomicUsize,
}

/// A point-in-time copy of [`ProviderCalls`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallCounts {
    pub version_lookups: usize,
    pub find_type: usize,
    pub declared_methods: usize,
    pub declared_fields: usize,
    pub unlock_access: usize,
}

impl ProviderCalls {
    #[inline]
    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CallCounts {
        CallCounts {
            version_lookups: self.version_lookups.load(Ordering::Relaxed),
            find_type: self.find_type.load(Ordering::Relaxed),
            declared_methods: self.declared_methods.load(Ordering::Relaxed),
            declared_fields: self.declared_fields.load(Ordering::Relaxed),
            unlock_access: self.unlock_access.load(Ordering::Relaxed),
        }
    }
}

impl CallCounts {
    /// Lookups and scans, excluding unlocks and version lookups.
    pub fn scans(&self) -> usize {
        self.find_type + self.declared_methods + self.declared_fields
    }
}
