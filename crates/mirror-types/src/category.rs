use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// Versioned namespace a short type name is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassCategory {
    /// Server internals, `net.minecraft.server.<version>.<Name>`.
    MinecraftServer,
    /// Platform implementation classes, `org.bukkit.craftbukkit.<version>.<Name>`.
    CraftBukkit,
}

impl ClassCategory {
    pub const ALL: [ClassCategory; 2] = [ClassCategory::MinecraftServer, ClassCategory::CraftBukkit];

    pub const fn default_prefix(self) -> &'static str {
        match self {
            ClassCategory::MinecraftServer => "net.minecraft.server.",
            ClassCategory::CraftBukkit => "org.bukkit.craftbukkit.",
        }
    }

    pub const fn short_name(self) -> &'static str {
        match self {
            ClassCategory::MinecraftServer => "nms",
            ClassCategory::CraftBukkit => "obc",
        }
    }
}

impl Display for ClassCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown class category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for ClassCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nms" | "server" | "minecraft-server" => Ok(ClassCategory::MinecraftServer),
            "obc" | "cb" | "craftbukkit" => Ok(ClassCategory::CraftBukkit),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Extracts the version token from a host implementation package name.
///
/// The token is the fourth dot-separated segment, so
/// `org.bukkit.craftbukkit.v1_8_R3` yields `v1_8_R3`.
pub fn version_token_from_package(package: &str) -> Option<&str> {
    package.split('.').nth(3).filter(|s| !s.is_empty())
}
