use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{error::InvalidatorError, resource::Distribution};

/// The S3 static-website endpoint a bucket-backed distribution points at.
pub fn website_endpoint(bucket: &str, region: &str) -> String {
    format!("{bucket}.s3-website-{region}.amazonaws.com")
}

/// Returns the id of the first distribution, in the order given, with an
/// origin on the bucket's website endpoint. Later matches are ignored.
pub fn resolve_distribution_id<'a>(
    distributions: &'a [Distribution],
    region: &str,
    bucket: &str,
) -> Result<&'a str, InvalidatorError> {
    let domain = website_endpoint(bucket, region);

    distributions
        .iter()
        .find(|d| d.origins.iter().any(|o| o.domain_name == domain))
        .map(|d| d.id.as_str())
        .ok_or(InvalidatorError::NoMatchingDistribution {
            bucket: bucket.to_string(),
            domain,
        })
}

/// Hands out caller references: epoch milliseconds, stringified, strictly
/// increasing for the life of the clock.
#[derive(Debug, Default)]
pub struct CallerReferenceClock {
    last: AtomicU64,
}

impl CallerReferenceClock {
    pub fn next(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }
}
