//! Reload failures.

use std::error::Error;
use std::fmt;

use cordon_zone::ProviderError;

/// A zone-set reload could not run.
#[derive(Debug, Clone, PartialEq)]
pub enum ReloadError {
    /// A reload is already running. The engine never interleaves two
    /// reloads; retry after the current one finishes.
    InProgress,
    /// The provider failed to deliver records.
    Provider(ProviderError),
}

impl fmt::Display for ReloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "a zone reload is already in progress"),
            Self::Provider(e) => write!(f, "zone reload failed: {e}"),
        }
    }
}

impl Error for ReloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InProgress => None,
            Self::Provider(e) => Some(e),
        }
    }
}

impl From<ProviderError> for ReloadError {
    fn from(e: ProviderError) -> Self {
        Self::Provider(e)
    }
}
