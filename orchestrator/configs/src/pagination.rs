use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the status reconciler walks a paginated task listing.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationPolicy {
    /// Walk every page inside one invocation until a match or exhaustion.
    #[default]
    Drain,
    /// Fetch one page per invocation and hand the cursor back to the caller.
    Resumable,
}

impl PaginationPolicy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Drain => "drain",
            Self::Resumable => "resumable",
        }
    }
}

impl fmt::Display for PaginationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown pagination policy '{0}' (expected 'drain' or 'resumable')")]
pub struct UnknownPaginationPolicy(pub String);

impl FromStr for PaginationPolicy {
    type Err = UnknownPaginationPolicy;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "drain" => Ok(Self::Drain),
            "resumable" => Ok(Self::Resumable),
            _ => Err(UnknownPaginationPolicy(raw.to_owned())),
        }
    }
}
