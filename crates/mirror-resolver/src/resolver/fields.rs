use crate::{
    provider::{ReflectionProvider, UnlockTarget},
    resolver::{MirrorResolver, ResolvedField},
};
use mirror_types::{Access, FieldHandle, MirrorError};
use std::sync::Arc;
use tracing::{debug, trace};

impl<P: ReflectionProvider> MirrorResolver<P> {
    /// Resolves a field declared directly on `owner`. Each name is scanned
    /// for at most once per owner, whether or not it exists.
    pub fn resolve_field(
        &self,
        owner: &P::Type,
        name: &str,
    ) -> Result<Option<ResolvedField<P>>, MirrorError> {
        MirrorError::require_name("field_name", name)?;

        if let Some(cached) = self.cached_field(owner, name) {
            self.metrics.record_field_cache_hit();
            trace!(?owner, name, found = cached.is_some(), "field cache hit");
            return Ok(cached);
        }

        self.metrics.record_field_cache_miss();
        let result = self.find_declared_field(owner, name).map(Arc::new);
        let by_name = self
            .caches
            .field_cache
            .entry(owner.clone())
            .or_default()
            .downgrade();
        let stored = by_name.entry(Arc::from(name)).or_insert(result).value().clone();
        Ok(stored)
    }

    fn cached_field(&self, owner: &P::Type, name: &str) -> Option<Option<ResolvedField<P>>> {
        let by_name = self.caches.field_cache.get(owner)?;
        let cached = by_name.get(name)?;
        Some(cached.clone())
    }

    fn find_declared_field(
        &self,
        owner: &P::Type,
        name: &str,
    ) -> Option<FieldHandle<P::Type, P::Field>> {
        let fields = match self.provider.declared_fields(owner) {
            Ok(fields) => fields,
            Err(e) => {
                debug!(?owner, name, error = %e, "field scan failed, treating as absent");
                self.metrics.record_provider_error();
                return None;
            }
        };

        let Some(descriptor) = fields.into_iter().find(|f| f.name == name) else {
            debug!(?owner, name, "no such field");
            return None;
        };

        let access = match descriptor.access {
            Access::Restricted => {
                if let Err(e) = self
                    .provider
                    .unlock_access(UnlockTarget::Field(&descriptor.raw))
                {
                    debug!(?owner, name, error = %e, "unlock failed, treating as absent");
                    self.metrics.record_provider_error();
                    return None;
                }
                Access::Unlocked
            }
            access => access,
        };
        debug!(?owner, name, ?access, "resolved field");
        Some(FieldHandle::from_descriptor(owner.clone(), descriptor, access))
    }
}

#[cfg(test)]
mod tests {
    use crate::resolver::{MirrorResolver, fake::FakeHost};
    use mirror_types::{Access, MirrorError};
    use std::sync::Arc;

    const OWNER: &str = "Counter";

    fn host() -> FakeHost {
        FakeHost::new()
            .field(OWNER, "count", Access::Restricted, 10)
            .field(OWNER, "name", Access::Public, 11)
    }

    #[test]
    fn test_resolve_field() {
        let resolver = MirrorResolver::with_defaults(host());
        let count = resolver.resolve_field(&OWNER, "count").unwrap().unwrap();
        assert_eq!(count.raw, 10);
        assert_eq!(&*count.name, "count");
        assert_eq!(count.access, Access::Unlocked);

        let name = resolver.resolve_field(&OWNER, "name").unwrap().unwrap();
        assert_eq!(name.access, Access::Public);
        assert_eq!(FakeHost::count(&resolver.provider().unlocks), 1);
    }

    #[test]
    fn test_field_scanned_once() {
        let resolver = MirrorResolver::with_defaults(host());
        let first = resolver.resolve_field(&OWNER, "count").unwrap().unwrap();
        let second = resolver.resolve_field(&OWNER, "count").unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(FakeHost::count(&resolver.provider().field_scans), 1);
    }

    #[test]
    fn test_missing_field_cached() {
        let resolver = MirrorResolver::with_defaults(host());
        assert!(resolver.resolve_field(&OWNER, "missing").unwrap().is_none());
        assert!(resolver.resolve_field(&OWNER, "missing").unwrap().is_none());
        assert_eq!(FakeHost::count(&resolver.provider().field_scans), 1);
        assert_eq!(resolver.caches.sizes().field_size, 1);

        let stats = resolver.stats();
        assert_eq!(stats.fields.hits, 1);
        assert_eq!(stats.fields.misses, 1);
    }

    #[test]
    fn test_same_name_on_other_owner() {
        let resolver = MirrorResolver::with_defaults(host());
        assert!(resolver.resolve_field(&OWNER, "count").unwrap().is_some());
        assert!(resolver.resolve_field(&"Other", "count").unwrap().is_none());
        assert_eq!(FakeHost::count(&resolver.provider().field_scans), 2);
    }

    #[test]
    fn test_scan_failure_cached_as_absent() {
        let host = FakeHost {
            fail_scans: true,
            ..host()
        };
        let resolver = MirrorResolver::with_defaults(host);
        assert!(resolver.resolve_field(&OWNER, "count").unwrap().is_none());
        assert!(resolver.resolve_field(&OWNER, "count").unwrap().is_none());
        assert_eq!(FakeHost::count(&resolver.provider().field_scans), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let resolver = MirrorResolver::with_defaults(host());
        assert_eq!(
            resolver.resolve_field(&OWNER, " ").unwrap_err(),
            MirrorError::InvalidArgument {
                argument: "field_name",
                reason: "cannot be empty",
            }
        );
    }
}
