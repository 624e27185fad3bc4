//! # mirror-rs
//!
//! Memoizing resolution of version-qualified host types and the methods and
//! fields declared on them.
//!
//! Type names such as `net.minecraft.server.v1_8_R3.Entity` carry a host
//! version token. [`MirrorResolver`] builds these names from a category and
//! a short name, asks a [`ReflectionProvider`] for the type and its members,
//! and caches every answer (including "absent") for the life of the resolver.
//!
//! ## Crates
//!
//! - [`types`]: signatures, member handles, categories and errors.
//! - [`resolver`]: the caches, matching rules, configuration and metrics.
//! - [`model`]: an in-memory provider loaded from JSON.
//! - [`cli`]: the `mirror-query` command.
pub use mirror_cli as cli;
pub use mirror_model as model;
pub use mirror_resolver as resolver;
pub use mirror_types as types;

pub use mirror_resolver::{
    CacheStats, MirrorConfig, MirrorResolver, ReflectionProvider, ResolvedField, ResolvedMethod,
    SignatureMatching,
};
pub use mirror_types::{ClassCategory, MirrorError, PrimitiveKind, Signature};
