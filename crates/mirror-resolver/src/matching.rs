//! Parameter-list comparison for overload lookup.
//!
//! Both sides are first normalized through the [`CorrespondenceTable`], so a
//! boxed wrapper and its primitive compare as the same type. The normalized
//! lists then match under [`SignatureMatching`]: lengths must agree and every
//! position must be identical, or, for `Assignable`, the declared type must
//! accept the supplied one.
use crate::{config::SignatureMatching, provider::ReflectionProvider};
use mirror_types::{PrimitiveKind, Signature};
use std::{collections::HashMap, hash::Hash};

/// Boxed wrapper type to unboxed primitive, fixed at construction.
#[derive(Debug, Clone)]
pub struct CorrespondenceTable<T> {
    boxed_to_primitive: HashMap<T, T>,
}

impl<T: Clone + Eq + Hash> CorrespondenceTable<T> {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (T, T)>) -> Self {
        Self {
            boxed_to_primitive: pairs.into_iter().collect(),
        }
    }

    /// Kinds the provider cannot name on both sides are left out.
    pub fn from_provider<P>(provider: &P) -> Self
    where
        P: ReflectionProvider<Type = T> + ?Sized,
    {
        Self::from_pairs(PrimitiveKind::ALL.into_iter().filter_map(|kind| {
            Some((provider.boxed_type(kind)?, provider.primitive_type(kind)?))
        }))
    }

    pub fn len(&self) -> usize {
        self.boxed_to_primitive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxed_to_primitive.is_empty()
    }

    pub fn normalize<'a>(&'a self, ty: &'a T) -> &'a T {
        self.boxed_to_primitive.get(ty).unwrap_or(ty)
    }

    pub fn normalize_signature(&self, signature: &Signature<T>) -> Signature<T> {
        signature.map(|t| self.normalize(t).clone())
    }
}

impl SignatureMatching {
    /// Compares a candidate's declared parameters against already-normalized
    /// caller types. Declared types are normalized here.
    pub fn accepts<P: ReflectionProvider + ?Sized>(
        self,
        provider: &P,
        table: &CorrespondenceTable<P::Type>,
        declared: &[P::Type],
        supplied: &[P::Type],
    ) -> bool {
        if declared.len() != supplied.len() {
            return false;
        }
        declared.iter().zip(supplied).all(|(declared, supplied)| {
            let declared = table.normalize(declared);
            declared == supplied
                || (self == SignatureMatching::Assignable
                    && provider.is_assignable_from(declared, supplied))
        })
    }
}
