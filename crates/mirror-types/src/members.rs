use crate::signature::Signature;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Debug, Display, Formatter},
    sync::Arc,
};

/// Visibility of a member as far as later invocation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Usable without unlocking.
    #[default]
    Public,
    /// Declared with restricted visibility and not yet unlocked.
    Restricted,
    /// Restricted at declaration but unlocked by the provider.
    Unlocked,
}

/// A method as enumerated by a provider, before resolution.
#[derive(Debug, Clone)]
pub struct MethodDescriptor<T, M> {
    pub name: String,
    pub parameters: Vec<T>,
    pub access: Access,
    pub raw: M,
}

/// A field as enumerated by a provider, before resolution.
#[derive(Debug, Clone)]
pub struct FieldDescriptor<F> {
    pub name: String,
    pub access: Access,
    pub raw: F,
}

/// A resolved, usable method. Immutable once built.
#[derive(Clone)]
pub struct MethodHandle<T, M> {
    pub owner: T,
    pub name: Arc<str>,
    /// Parameter types as declared, not normalized.
    pub parameters: Signature<T>,
    pub access: Access,
    pub raw: M,
}

impl<T, M> MethodHandle<T, M> {
    pub fn from_descriptor(owner: T, descriptor: MethodDescriptor<T, M>, access: Access) -> Self {
        Self {
            owner,
            name: descriptor.name.into(),
            parameters: descriptor.parameters.into(),
            access,
            raw: descriptor.raw,
        }
    }
}

impl<T: Debug, M> Debug for MethodHandle<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandle")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

impl<T: Debug, M> Display for MethodHandle<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}::{}{}", self.owner, self.name, self.parameters)
    }
}

/// A resolved, usable field. Immutable once built.
#[derive(Clone)]
pub struct FieldHandle<T, F> {
    pub owner: T,
    pub name: Arc<str>,
    pub access: Access,
    pub raw: F,
}

impl<T, F> FieldHandle<T, F> {
    pub fn from_descriptor(owner: T, descriptor: FieldDescriptor<F>, access: Access) -> Self {
        Self {
            owner,
            name: descriptor.name.into(),
            access,
            raw: descriptor.raw,
        }
    }
}

impl<T: Debug, F> Debug for FieldHandle<T, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

impl<T: Debug, F> Display for FieldHandle<T, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}::{}", self.owner, self.name)
    }
}
