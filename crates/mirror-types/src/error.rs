use thiserror::Error;

/// Errors surfaced to callers of the resolvers.
///
/// A member that does not exist is never an error; resolvers return `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MirrorError {
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: &'static str,
    },
}

impl MirrorError {
    /// Rejects empty or whitespace-only names.
    pub fn require_name(argument: &'static str, value: &str) -> Result<(), MirrorError> {
        if value.trim().is_empty() {
            return Err(MirrorError::InvalidArgument {
                argument,
                reason: "cannot be empty",
            });
        }
        Ok(())
    }
}

/// Failures reported by a reflection provider. The resolvers turn every one of
/// these into a cached absence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Linkage error: {0}")]
    Linkage(String),
    #[error("Provider error: {0}")]
    Other(String),
}
