use crate::{provider::ReflectionProvider, resolver::MirrorResolver};
use mirror_types::{ClassCategory, MirrorError};
use std::sync::Arc;
use tracing::{debug, trace, warn};

impl<P: ReflectionProvider> MirrorResolver<P> {
    pub fn resolve_type(
        &self,
        category: ClassCategory,
        short_name: &str,
    ) -> Result<Option<P::Type>, MirrorError> {
        MirrorError::require_name("short_name", short_name)?;

        let cache = self.caches.types(category);
        if let Some(cached) = cache.get(short_name) {
            self.metrics.record_type_cache_hit();
            trace!(%category, short_name, found = cached.is_some(), "type cache hit");
            return Ok(cached.clone());
        }

        self.metrics.record_type_cache_miss();
        let result = self.locate_type(category, short_name);
        Ok(cache
            .entry(short_name.to_string())
            .or_insert(result)
            .value()
            .clone())
    }

    /// The memoized host version token, probing the provider on first use.
    pub fn version_token(&self) -> Option<Arc<str>> {
        self.caches
            .version_token
            .get_or_init(|| match self.provider.current_host_version_token() {
                Ok(token) => {
                    debug!(%token, "host version token resolved");
                    Some(token.into())
                }
                Err(e) => {
                    warn!(error = %e, "host version lookup failed; versioned types will not resolve");
                    self.metrics.record_provider_error();
                    None
                }
            })
            .clone()
    }

    /// The name a short type name is looked up under, without touching the
    /// type cache. `None` when the version token is unavailable.
    pub fn qualified_name(
        &self,
        category: ClassCategory,
        short_name: &str,
    ) -> Result<Option<String>, MirrorError> {
        MirrorError::require_name("short_name", short_name)?;
        Ok(self
            .version_token()
            .map(|version| self.build_qualified_name(category, &version, short_name)))
    }

    fn build_qualified_name(&self, category: ClassCategory, version: &str, short_name: &str) -> String {
        format!("{}{}.{}", self.config.prefix(category), version, short_name)
    }

    fn locate_type(&self, category: ClassCategory, short_name: &str) -> Option<P::Type> {
        let version = self.version_token()?;
        let qualified = self.build_qualified_name(category, &version, short_name);
        match self.provider.find_type(&qualified) {
            Ok(ty) => {
                debug!(%qualified, "resolved type");
                Some(ty)
            }
            Err(e) => {
                debug!(%qualified, error = %e, "type lookup failed, caching absence");
                self.metrics.record_provider_error();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::MirrorConfig,
        resolver::{MirrorResolver, fake::FakeHost},
    };
    use mirror_types::{ClassCategory, MirrorError};

    #[test]
    fn test_resolve_known_type() {
        let resolver = MirrorResolver::with_defaults(FakeHost::new());
        assert_eq!(
            resolver.resolve_type(ClassCategory::MinecraftServer, "Entity"),
            Ok(Some("net.minecraft.server.v1_8_R3.Entity"))
        );
        assert_eq!(
            resolver.resolve_type(ClassCategory::CraftBukkit, "CraftServer"),
            Ok(Some("org.bukkit.craftbukkit.v1_8_R3.CraftServer"))
        );
    }

    #[test]
    fn test_categories_are_separate() {
        let resolver = MirrorResolver::with_defaults(FakeHost::new());
        assert_eq!(
            resolver.resolve_type(ClassCategory::CraftBukkit, "Entity"),
            Ok(None)
        );
        assert_eq!(
            resolver.resolve_type(ClassCategory::MinecraftServer, "Entity"),
            Ok(Some("net.minecraft.server.v1_8_R3.Entity"))
        );
        assert_eq!(resolver.caches.craftbukkit_types.len(), 1);
        assert_eq!(resolver.caches.server_types.len(), 1);
    }

    #[test]
    fn test_absent_type_looked_up_once() {
        let resolver = MirrorResolver::with_defaults(FakeHost::new());
        assert_eq!(resolver.resolve_type(ClassCategory::MinecraftServer, "Foo"), Ok(None));
        assert_eq!(resolver.resolve_type(ClassCategory::MinecraftServer, "Foo"), Ok(None));

        let host = resolver.provider();
        assert_eq!(FakeHost::count(&host.type_lookups), 1);
        assert_eq!(FakeHost::count(&host.version_lookups), 1);

        let stats = resolver.stats();
        assert_eq!(stats.types.hits, 1);
        assert_eq!(stats.types.misses, 1);
        assert_eq!(stats.provider_errors, 1);
    }

    #[test]
    fn test_version_looked_up_once() {
        let resolver = MirrorResolver::with_defaults(FakeHost::new());
        for name in ["Entity", "World", "Packet"] {
            resolver
                .resolve_type(ClassCategory::MinecraftServer, name)
                .unwrap();
        }
        assert_eq!(FakeHost::count(&resolver.provider().version_lookups), 1);
        assert_eq!(resolver.version_token().as_deref(), Some("v1_8_R3"));
    }

    #[test]
    fn test_failed_version_lookup_is_memoized() {
        let host = FakeHost {
            version: None,
            ..FakeHost::new()
        };
        let resolver = MirrorResolver::with_defaults(host);
        assert_eq!(resolver.resolve_type(ClassCategory::MinecraftServer, "Entity"), Ok(None));
        assert_eq!(resolver.resolve_type(ClassCategory::CraftBukkit, "CraftServer"), Ok(None));
        assert_eq!(resolver.version_token(), None);

        let host = resolver.provider();
        assert_eq!(FakeHost::count(&host.version_lookups), 1);
        assert_eq!(FakeHost::count(&host.type_lookups), 0);
    }

    #[test]
    fn test_empty_name_rejected_before_cache() {
        let resolver = MirrorResolver::with_defaults(FakeHost::new());
        assert!(matches!(
            resolver.resolve_type(ClassCategory::MinecraftServer, ""),
            Err(MirrorError::InvalidArgument { argument: "short_name", .. })
        ));
        assert_eq!(resolver.stats().types.misses, 0);
        assert_eq!(FakeHost::count(&resolver.provider().version_lookups), 0);
    }

    #[test]
    fn test_qualified_name_uses_configured_prefix() {
        let config = MirrorConfig::default()
            .with_prefix(ClassCategory::MinecraftServer, "net.minecraft.server");
        let resolver = MirrorResolver::new(FakeHost::new(), config);
        assert_eq!(
            resolver.qualified_name(ClassCategory::MinecraftServer, "Entity"),
            Ok(Some("net.minecraft.server.v1_8_R3.Entity".to_string()))
        );
        assert_eq!(resolver.caches.server_types.len(), 0);
    }
}
