//! # mirror-model
//!
//! A [`ReflectionProvider`](mirror_resolver::ReflectionProvider) backed by a
//! declarative description of a host: its version token and the types,
//! methods and fields it declares. Models are usually loaded from JSON.
//!
//! Every provider call is counted (see [`CallCounts`]), which lets callers
//! see exactly how much work the resolver caches saved.
pub mod calls;
pub mod error;
pub mod model;
pub mod provider;

pub use calls::{CallCounts, ProviderCalls};
pub use error::ModelError;
pub use model::{FieldModel, HostModel, MethodModel, TypeModel};
pub use provider::{FieldRef, MethodRef, ModelProvider, ModelType};
