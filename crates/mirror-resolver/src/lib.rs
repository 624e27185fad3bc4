//! # mirror-resolver
//!
//! Memoizing resolution of versioned host types and their members.
//!
//! A [`MirrorResolver`] sits in front of a [`ReflectionProvider`] and caches
//! every answer it gets, including "not found", so each distinct lookup costs
//! one provider scan for the lifetime of the resolver.
pub mod config;
pub mod matching;
pub mod metrics;
pub mod provider;
pub mod resolver;
pub mod state;

pub use config::{MirrorConfig, SignatureMatching, UnknownMatching};
pub use metrics::{CacheStat, CacheStats, ResolverMetrics};
pub use provider::{ReflectionProvider, UnlockTarget};
pub use resolver::{MirrorResolver, ResolvedField, ResolvedMethod};
pub use state::MirrorCaches;
