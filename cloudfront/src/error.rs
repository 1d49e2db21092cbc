use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidatorError {
    #[error("No match found on the provided bucket {bucket} (no distribution has origin {domain})")]
    NoMatchingDistribution { bucket: String, domain: String },
    #[error("No AWS region configured: set `region` in aws/config.ron or AWS_REGION")]
    MissingRegion,
    #[error("Refusing to invalidate bucket {bucket} with an empty path list")]
    NoPaths { bucket: String },
}

/// The step of the invalidation pipeline an error surfaced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Listing,
    Resolving,
    Invalidating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Listing => write!(f, "listing distributions"),
            Stage::Resolving => write!(f, "resolving distribution"),
            Stage::Invalidating => write!(f, "creating invalidation"),
        }
    }
}
