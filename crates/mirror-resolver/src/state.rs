use crate::{
    matching::CorrespondenceTable,
    metrics::CacheSizes,
    provider::ReflectionProvider,
    resolver::{ResolvedField, ResolvedMethod},
};
use dashmap::DashMap;
use mirror_types::{ClassCategory, Signature};
use std::sync::{Arc, OnceLock};

/// Caller-supplied signature -> method, for one owner and method name.
pub type SignatureTable<P> =
    DashMap<Signature<<P as ReflectionProvider>::Type>, Option<ResolvedMethod<P>>>;
/// Method name -> signatures tried under that name.
pub type MethodTable<P> = DashMap<Arc<str>, SignatureTable<P>>;
/// Field name -> field.
pub type FieldTable<P> = DashMap<Arc<str>, Option<ResolvedField<P>>>;

/// Every cache the resolvers populate.
///
/// Entries are only ever added. A stored `None` is a remembered absence; a
/// missing key means the lookup has not been attempted.
pub struct MirrorCaches<P: ReflectionProvider> {
    /// Server classes by short name
    pub server_types: DashMap<String, Option<P::Type>>,
    /// Platform implementation classes by short name
    pub craftbukkit_types: DashMap<String, Option<P::Type>>,
    /// owner -> method name -> caller-supplied signature -> method
    pub method_cache: DashMap<P::Type, MethodTable<P>>,
    /// owner -> field name -> field
    pub field_cache: DashMap<P::Type, FieldTable<P>>,
    /// Host version token, queried at most once. `None` if the query failed.
    pub version_token: OnceLock<Option<Arc<str>>>,
    pub correspondence: CorrespondenceTable<P::Type>,
}

impl<P: ReflectionProvider> MirrorCaches<P> {
    pub fn new(provider: &P) -> Self {
        Self {
            server_types: DashMap::new(),
            craftbukkit_types: DashMap::new(),
            method_cache: DashMap::new(),
            field_cache: DashMap::new(),
            version_token: OnceLock::new(),
            correspondence: CorrespondenceTable::from_provider(provider),
        }
    }

    pub fn types(&self, category: ClassCategory) -> &DashMap<String, Option<P::Type>> {
        match category {
            ClassCategory::MinecraftServer => &self.server_types,
            ClassCategory::CraftBukkit => &self.craftbukkit_types,
        }
    }

    pub fn sizes(&self) -> CacheSizes {
        CacheSizes {
            type_size: self.server_types.len() + self.craftbukkit_types.len(),
            method_size: self
                .method_cache
                .iter()
                .map(|by_name| by_name.iter().map(|table| table.len()).sum::<usize>())
                .sum(),
            field_size: self.field_cache.iter().map(|table| table.len()).sum(),
        }
    }
}
