//! Resolver configuration.
//!
//! ## Environment Variables
//!
//! - `MIRROR_RS_MATCHING`: `"assignable"` (default) or `"exact"`
//! - `MIRROR_RS_NEGATIVE_METHOD_CACHE`: `"1"`/`"true"` (default) or `"0"`/`"false"`
//! - `MIRROR_RS_SERVER_PREFIX`: namespace prefix for server classes
//!   (default `net.minecraft.server.`)
//! - `MIRROR_RS_CRAFTBUKKIT_PREFIX`: namespace prefix for platform classes
//!   (default `org.bukkit.craftbukkit.`)
//!
//! Unparsable values are ignored with a warning.
use mirror_types::ClassCategory;
use serde::Serialize;
use std::{fmt, str::FromStr};
use thiserror::Error;
use tracing::warn;

pub const ENV_MATCHING: &str = "MIRROR_RS_MATCHING";
pub const ENV_NEGATIVE_METHOD_CACHE: &str = "MIRROR_RS_NEGATIVE_METHOD_CACHE";
pub const ENV_SERVER_PREFIX: &str = "MIRROR_RS_SERVER_PREFIX";
pub const ENV_CRAFTBUKKIT_PREFIX: &str = "MIRROR_RS_CRAFTBUKKIT_PREFIX";

/// How a candidate's declared parameters are compared with the caller's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMatching {
    /// Each declared type must equal or be assignable from the supplied type.
    #[default]
    Assignable,
    /// Each declared type must equal the supplied type after normalization.
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown matching policy `{0}`")]
pub struct UnknownMatching(pub String);

impl FromStr for SignatureMatching {
    type Err = UnknownMatching;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assignable" | "widening" => Ok(SignatureMatching::Assignable),
            "exact" => Ok(SignatureMatching::Exact),
            other => Err(UnknownMatching(other.to_string())),
        }
    }
}

impl fmt::Display for SignatureMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureMatching::Assignable => f.write_str("assignable"),
            SignatureMatching::Exact => f.write_str("exact"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorConfig {
    pub matching: SignatureMatching,
    /// Whether a failed method resolution is remembered. Types and fields
    /// always remember failures.
    pub cache_missing_methods: bool,
    pub server_prefix: String,
    pub craftbukkit_prefix: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            matching: SignatureMatching::default(),
            cache_missing_methods: true,
            server_prefix: ClassCategory::MinecraftServer.default_prefix().to_string(),
            craftbukkit_prefix: ClassCategory::CraftBukkit.default_prefix().to_string(),
        }
    }
}

impl MirrorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source, starting from the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_MATCHING) {
            match value.parse() {
                Ok(matching) => config.matching = matching,
                Err(e) => warn!(variable = ENV_MATCHING, %value, "ignoring value: {}", e),
            }
        }

        if let Some(value) = lookup(ENV_NEGATIVE_METHOD_CACHE) {
            match parse_flag(&value) {
                Some(flag) => config.cache_missing_methods = flag,
                None => warn!(
                    variable = ENV_NEGATIVE_METHOD_CACHE,
                    %value,
                    "ignoring value: expected 1, 0, true or false"
                ),
            }
        }

        if let Some(value) = lookup(ENV_SERVER_PREFIX) {
            config.server_prefix = normalize_prefix(value);
        }
        if let Some(value) = lookup(ENV_CRAFTBUKKIT_PREFIX) {
            config.craftbukkit_prefix = normalize_prefix(value);
        }

        config
    }

    pub fn with_matching(mut self, matching: SignatureMatching) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_missing_methods_cached(mut self, cache: bool) -> Self {
        self.cache_missing_methods = cache;
        self
    }

    pub fn with_prefix(mut self, category: ClassCategory, prefix: impl Into<String>) -> Self {
        let prefix = normalize_prefix(prefix.into());
        match category {
            ClassCategory::MinecraftServer => self.server_prefix = prefix,
            ClassCategory::CraftBukkit => self.craftbukkit_prefix = prefix,
        }
        self
    }

    pub fn prefix(&self, category: ClassCategory) -> &str {
        match category {
            ClassCategory::MinecraftServer => &self.server_prefix,
            ClassCategory::CraftBukkit => &self.craftbukkit_prefix,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Prefixes are concatenated directly with the version token.
fn normalize_prefix(mut prefix: String) -> String {
    if !prefix.is_empty() && !prefix.ends_with('.') {
        prefix.push('.');
    }
    prefix
}
