use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::Hash,
    ops::Deref,
    sync::Arc,
};

/// An ordered parameter-type list used as a cache key.
///
/// Equality and hashing are structural over the elements, so `[A, B]` and
/// `[B, A]` are different keys and keys of different lengths never collide.
/// The elements live behind an `Arc`, which keeps clones cheap and the
/// sequence immutable once built.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature<T>(Arc<[T]>);

impl<T> Signature<T> {
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Builds a new signature by applying `f` to every element, preserving order.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Signature<U> {
        self.0.iter().map(f).collect()
    }
}

impl<T> Default for Signature<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for Signature<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for Signature<T> {
    fn from(types: Vec<T>) -> Self {
        Self(types.into())
    }
}

impl<T: Clone> From<&[T]> for Signature<T> {
    fn from(types: &[T]) -> Self {
        Self(types.into())
    }
}

impl<T, const N: usize> From<[T; N]> for Signature<T> {
    fn from(types: [T; N]) -> Self {
        Self(Arc::from(Vec::from(types)))
    }
}

impl<T> FromIterator<T> for Signature<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Signature<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Debug> Debug for Signature<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature").field(&&*self.0).finish()
    }
}

impl<T: Debug> Display for Signature<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", t)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::{HashMap, hash_map::DefaultHasher},
        hash::Hasher,
    };

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_order_sensitive() {
        let ab = Signature::from(["A", "B"]);
        let ba = Signature::from(["B", "A"]);
        assert_ne!(ab, ba);
        assert_eq!(ab, Signature::from(vec!["A", "B"]));
    }

    #[test]
    fn test_length_sensitive() {
        let a = Signature::from(["A"]);
        let aa = Signature::from(["A", "A"]);
        assert_ne!(a, aa);
        assert_ne!(Signature::<&str>::empty(), a);
        assert_eq!(Signature::<&str>::empty(), Signature::default());
    }

    #[test]
    fn test_structural_hash() {
        let left: Signature<u32> = vec![1, 2, 3].into();
        let right: Signature<u32> = (1..=3).collect();
        assert_eq!(left, right);
        assert_eq!(hash_of(&left), hash_of(&right));

        let mut map = HashMap::new();
        map.insert(left, "hit");
        assert_eq!(map.get(&right), Some(&"hit"));
        assert_eq!(map.get(&Signature::from([3, 2, 1])), None);
    }

    #[test]
    fn test_map_preserves_order() {
        let sig = Signature::from([1, 2, 3]);
        let doubled = sig.map(|x| x * 2);
        assert_eq!(doubled.as_slice(), &[2, 4, 6]);
        assert_eq!(sig.len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Signature::from(["int", "String"]).to_string(), "(\"int\", \"String\")");
        assert_eq!(Signature::<u8>::empty().to_string(), "()");
    }
}
