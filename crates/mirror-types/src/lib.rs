//! # mirror-types
//!
//! Value types shared by the resolution cache and its providers.
//!
//! ## Core Types
//!
//! - **[`Signature`]**: an ordered parameter-type list usable as a map key.
//! - **[`MethodHandle`] / [`FieldHandle`]**: resolved members, shared behind `Arc`.
//! - **[`ClassCategory`]**: the versioned namespaces a type can be looked up in.
//! - **[`PrimitiveKind`]**: the boxed/unboxed pairs used to normalize signatures.
pub mod category;
pub mod error;
pub mod members;
pub mod primitives;
pub mod signature;

pub use category::{ClassCategory, UnknownCategory, version_token_from_package};
pub use error::{MirrorError, ProviderError};
pub use members::{Access, FieldDescriptor, FieldHandle, MethodDescriptor, MethodHandle};
pub use primitives::PrimitiveKind;
pub use signature::Signature;
