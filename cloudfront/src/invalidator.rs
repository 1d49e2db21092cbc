use anyhow::Context;

use crate::{
    client::{DistributionApi, new_client},
    config::InvalidatorConfig,
    error::{InvalidatorError, Stage},
    resource::{Distribution, INVALIDATE_ALL, InvalidationRequest, InvalidationResult},
    util::{self, CallerReferenceClock},
};

/// Finds the distribution fronting a static-website bucket and invalidates it.
///
/// Each invalidation runs Listing -> Resolving -> Invalidating, strictly in
/// sequence. A failure at any step aborts; the create call is only issued
/// once a distribution has been resolved.
pub struct Invalidator<C> {
    client:            C,
    region:            String,
    follow_pagination: bool,
    references:        CallerReferenceClock,
}

impl Invalidator<aws_sdk_cloudfront::Client> {
    pub async fn from_config(config: &InvalidatorConfig) -> anyhow::Result<Self> {
        let sdk_config = config.aws.to_sdk_config().await;

        let Some(region) = sdk_config.region().map(|r| r.to_string()) else {
            return Err(InvalidatorError::MissingRegion.into());
        };

        Ok(Invalidator::new(new_client(&sdk_config), region).follow_pagination(config.follow_pagination))
    }
}

impl<C: DistributionApi> Invalidator<C> {
    pub fn new(client: C, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
            follow_pagination: false,
            references: CallerReferenceClock::default(),
        }
    }

    pub fn follow_pagination(mut self, follow: bool) -> Self {
        self.follow_pagination = follow;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Lists the account's distributions. Only the first page is read unless
    /// pagination was enabled; distributions past it are not seen.
    pub async fn list_distributions(&self) -> anyhow::Result<Vec<Distribution>> {
        let mut distributions = Vec::new();
        let mut next_marker: Option<String> = None;

        loop {
            let page = self
                .client
                .list_distributions(next_marker)
                .await
                .with_context(|| format!("CloudFront: failed while {}", Stage::Listing))?;

            tracing::debug!("Listed {} distributions", page.items.len());
            distributions.extend(page.items);

            if !page.is_truncated {
                break;
            }

            if !self.follow_pagination {
                tracing::warn!(
                    "Distribution list is truncated after {} entries; later pages are not searched",
                    distributions.len()
                );
                break;
            }

            next_marker = page.next_marker;
            if next_marker.is_none() {
                break;
            }
        }

        Ok(distributions)
    }

    pub fn resolve_distribution_id<'a>(
        &self,
        distributions: &'a [Distribution],
        bucket: &str,
    ) -> Result<&'a str, InvalidatorError> {
        util::resolve_distribution_id(distributions, &self.region, bucket)
    }

    /// Invalidates every path (`/*`) under the distribution fronting `bucket`.
    pub async fn invalidate_bucket(&self, bucket: &str) -> anyhow::Result<InvalidationResult> {
        self.invalidate_bucket_paths(bucket, &[INVALIDATE_ALL.to_string()]).await
    }

    pub async fn invalidate_bucket_paths(&self, bucket: &str, paths: &[String]) -> anyhow::Result<InvalidationResult> {
        if paths.is_empty() {
            return Err(InvalidatorError::NoPaths {
                bucket: bucket.to_string(),
            }
            .into());
        }

        let distributions = self.list_distributions().await?;
        let distribution_id = self
            .resolve_distribution_id(&distributions, bucket)
            .with_context(|| format!("CloudFront: failed while {} for bucket {}", Stage::Resolving, bucket))?;
        tracing::info!("Bucket {} is served by distribution {}", bucket, distribution_id);

        let request = InvalidationRequest {
            distribution_id:  distribution_id.to_string(),
            caller_reference: self.references.next(),
            paths:            paths.to_vec(),
        };

        let result = self
            .client
            .create_invalidation(&request)
            .await
            .with_context(|| {
                format!(
                    "CloudFront: failed while {} on distribution {}",
                    Stage::Invalidating,
                    request.distribution_id
                )
            })?;

        tracing::info!(
            "Created invalidation {} ({}) on distribution {}",
            result.id,
            result.status,
            result.distribution_id
        );
        Ok(result)
    }
}
