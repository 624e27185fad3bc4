use mirror_types::{FieldDescriptor, MethodDescriptor, PrimitiveKind, ProviderError};
use std::{fmt::Debug, hash::Hash, sync::Arc};

/// A member whose access restrictions should be lifted.
#[derive(Debug, Clone, Copy)]
pub enum UnlockTarget<'a, M, F> {
    Method(&'a M),
    Field(&'a F),
}

/// The host's introspection primitives.
///
/// Resolvers call into this on cache misses only. Every method may be called
/// from several threads at once.
pub trait ReflectionProvider: Send + Sync {
    /// Opaque type handle; equality is the host's type identity.
    type Type: Clone + Eq + Hash + Debug + Send + Sync;
    type Method: Clone + Debug + Send + Sync;
    type Field: Clone + Debug + Send + Sync;

    /// Version segment inserted between a category prefix and a short name.
    fn current_host_version_token(&self) -> Result<String, ProviderError>;

    fn find_type(&self, qualified_name: &str) -> Result<Self::Type, ProviderError>;

    /// Methods declared directly on `owner`, in declaration order. Inherited
    /// methods are not included.
    fn declared_methods(
        &self,
        owner: &Self::Type,
    ) -> Result<Vec<MethodDescriptor<Self::Type, Self::Method>>, ProviderError>;

    /// Fields declared directly on `owner`, in declaration order.
    fn declared_fields(
        &self,
        owner: &Self::Type,
    ) -> Result<Vec<FieldDescriptor<Self::Field>>, ProviderError>;

    fn unlock_access(
        &self,
        target: UnlockTarget<'_, Self::Method, Self::Field>,
    ) -> Result<(), ProviderError>;

    /// Whether a value of type `source` can be passed where `target` is declared.
    fn is_assignable_from(&self, target: &Self::Type, source: &Self::Type) -> bool;

    fn boxed_type(&self, kind: PrimitiveKind) -> Option<Self::Type>;

    fn primitive_type(&self, kind: PrimitiveKind) -> Option<Self::Type>;
}

impl<P: ReflectionProvider + ?Sized> ReflectionProvider for Arc<P> {
    type Type = P::Type;
    type Method = P::Method;
    type Field = P::Field;

    fn current_host_version_token(&self) -> Result<String, ProviderError> {
        (**self).current_host_version_token()
    }

    fn find_type(&self, qualified_name: &str) -> Result<Self::Type, ProviderError> {
        (**self).find_type(qualified_name)
    }

    fn declared_methods(
        &self,
        owner: &Self::Type,
    ) -> Result<Vec<MethodDescriptor<Self::Type, Self::Method>>, ProviderError> {
        (**self).declared_methods(owner)
    }

    fn declared_fields(
        &self,
        owner: &Self::Type,
    ) -> Result<Vec<FieldDescriptor<Self::Field>>, ProviderError> {
        (**self).declared_fields(owner)
    }

    fn unlock_access(
        &self,
        target: UnlockTarget<'_, Self::Method, Self::Field>,
    ) -> Result<(), ProviderError> {
        (**self).unlock_access(target)
    }

    fn is_assignable_from(&self, target: &Self::Type, source: &Self::Type) -> bool {
        (**self).is_assignable_from(target, source)
    }

    fn boxed_type(&self, kind: PrimitiveKind) -> Option<Self::Type> {
        (**self).boxed_type(kind)
    }

    fn primitive_type(&self, kind: PrimitiveKind) -> Option<Self::Type> {
        (**self).primitive_type(kind)
    }
}
