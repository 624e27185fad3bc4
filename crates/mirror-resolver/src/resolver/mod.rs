//! Type, method, and field resolution with caching.
//!
//! This module provides the [`MirrorResolver`] for turning names into host
//! handles. Every lookup goes through a cache in [`MirrorCaches`]; the
//! [`ReflectionProvider`] is only consulted on a miss.
//!
//! # Resolution Process
//!
//! ## Type Resolution
//!
//! A short name in a [`ClassCategory`](mirror_types::ClassCategory) is expanded
//! to `<prefix><version>.<name>` and handed to the provider. The version token
//! is queried once per resolver and never refreshed.
//!
//! ## Method Resolution
//!
//! 1. **Key**: owner, then name, then the signature exactly as the caller
//!    passed it
//! 2. **Normalize**: boxed wrappers in the caller's signature become primitives
//! 3. **Scan**: methods declared directly on the owner, in provider order
//! 4. **Match**: same name, same arity, each declared parameter equal to or
//!    assignable from the supplied one; the first match wins
//! 5. **Unlock**: restricted methods are unlocked before they are cached
//!
//! ## Field Resolution
//!
//! Fields declared directly on the owner are scanned for an exact name match
//! and unlocked the same way.
//!
//! # Caching Strategy
//!
//! Absences are cached with the same permanence as hits, so a name that does
//! not exist is scanned once. Method absences can opt out of this through
//! [`MirrorConfig::cache_missing_methods`]. Provider errors of any kind are
//! treated as absences.
//!
//! Nothing is ever evicted. Racing threads may both scan a fresh key; the
//! first value stored wins and every caller gets that one.
//!
//! # Example
//!
//! ```ignore
//! let resolver = MirrorResolver::new(provider, MirrorConfig::from_env());
//!
//! let connection = resolver.resolve_type(ClassCategory::MinecraftServer, "PlayerConnection")?;
//! if let Some(connection) = connection {
//!     let send = resolver.resolve_method(&connection, "sendPacket", [packet_type])?;
//!     let ping = resolver.resolve_field(&connection, "ping")?;
//! }
//! ```
use crate::{
    config::MirrorConfig,
    metrics::{CacheStats, ResolverMetrics},
    provider::ReflectionProvider,
    state::MirrorCaches,
};
use mirror_types::{FieldHandle, MethodHandle};
use std::sync::Arc;

mod fields;
mod methods;
mod types;

pub type ResolvedMethod<P> = Arc<
    MethodHandle<<P as ReflectionProvider>::Type, <P as ReflectionProvider>::Method>,
>;
pub type ResolvedField<P> =
    Arc<FieldHandle<<P as ReflectionProvider>::Type, <P as ReflectionProvider>::Field>>;

/// Service for resolving types, methods, and fields with caching.
pub struct MirrorResolver<P: ReflectionProvider> {
    provider: P,
    config: MirrorConfig,
    pub caches: MirrorCaches<P>,
    pub metrics: ResolverMetrics,
}

impl<P: ReflectionProvider> MirrorResolver<P> {
    pub fn new(provider: P, config: MirrorConfig) -> Self {
        let caches = MirrorCaches::new(&provider);
        Self {
            provider,
            config,
            caches,
            metrics: ResolverMetrics::new(),
        }
    }

    pub fn with_defaults(provider: P) -> Self {
        Self::new(provider, MirrorConfig::default())
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        self.metrics.cache_statistics(self.caches.sizes())
    }
}
