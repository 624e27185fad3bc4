use crate::{
    provider::{ReflectionProvider, UnlockTarget},
    resolver::{MirrorResolver, ResolvedMethod},
};
use mirror_types::{Access, MethodDescriptor, MethodHandle, MirrorError, Signature};
use std::sync::Arc;
use tracing::{debug, trace};

impl<P: ReflectionProvider> MirrorResolver<P> {
    /// Resolves a method declared directly on `owner`.
    ///
    /// `parameters` may use boxed wrapper types where the method declares
    /// primitives, or subtypes where it declares a supertype. The result is
    /// cached under `parameters` exactly as given.
    pub fn resolve_method(
        &self,
        owner: &P::Type,
        name: &str,
        parameters: impl Into<Signature<P::Type>>,
    ) -> Result<Option<ResolvedMethod<P>>, MirrorError> {
        MirrorError::require_name("method_name", name)?;

        let parameters = parameters.into();
        if let Some(cached) = self.cached_method(owner, name, &parameters) {
            self.metrics.record_method_cache_hit();
            trace!(?owner, name, signature = %parameters, found = cached.is_some(), "method cache hit");
            return Ok(cached);
        }

        self.metrics.record_method_cache_miss();
        let result = self.find_declared_method(owner, name, &parameters).map(Arc::new);
        if result.is_none() && !self.config.cache_missing_methods {
            return Ok(None);
        }

        let by_name = self
            .caches
            .method_cache
            .entry(owner.clone())
            .or_default()
            .downgrade();
        let signatures = by_name.entry(Arc::from(name)).or_default().downgrade();
        let stored = signatures.entry(parameters).or_insert(result).value().clone();
        Ok(stored)
    }

    /// Borrowing lookup; `None` means the triple has not been resolved yet.
    fn cached_method(
        &self,
        owner: &P::Type,
        name: &str,
        parameters: &Signature<P::Type>,
    ) -> Option<Option<ResolvedMethod<P>>> {
        let by_name = self.caches.method_cache.get(owner)?;
        let signatures = by_name.get(name)?;
        let cached = signatures.get(parameters)?;
        Some(cached.clone())
    }

    fn find_declared_method(
        &self,
        owner: &P::Type,
        name: &str,
        supplied: &Signature<P::Type>,
    ) -> Option<MethodHandle<P::Type, P::Method>> {
        let supplied = self.caches.correspondence.normalize_signature(supplied);
        let methods = match self.provider.declared_methods(owner) {
            Ok(methods) => methods,
            Err(e) => {
                debug!(?owner, name, error = %e, "method scan failed, treating as absent");
                self.metrics.record_provider_error();
                return None;
            }
        };

        let mut candidates = methods.into_iter().filter(|m| {
            m.name == name
                && self.config.matching.accepts(
                    &self.provider,
                    &self.caches.correspondence,
                    &m.parameters,
                    &supplied,
                )
        });

        let Some(found) = candidates.next() else {
            debug!(?owner, name, signature = %supplied, "no matching method");
            return None;
        };

        // First declared wins; later overloads that also match are ignored.
        let shadowed = candidates.count();
        if shadowed > 0 {
            trace!(?owner, name, shadowed, "ambiguous overloads, using first declared");
        }

        self.unlock_method(owner, found)
    }

    fn unlock_method(
        &self,
        owner: &P::Type,
        descriptor: MethodDescriptor<P::Type, P::Method>,
    ) -> Option<MethodHandle<P::Type, P::Method>> {
        let access = match descriptor.access {
            Access::Restricted => {
                if let Err(e) = self
                    .provider
                    .unlock_access(UnlockTarget::Method(&descriptor.raw))
                {
                    debug!(?owner, name = %descriptor.name, error = %e, "unlock failed, treating as absent");
                    self.metrics.record_provider_error();
                    return None;
                }
                Access::Unlocked
            }
            access => access,
        };
        debug!(?owner, name = %descriptor.name, ?access, "resolved method");
        Some(MethodHandle::from_descriptor(owner.clone(), descriptor, access))
    }
}
