use anyhow::Context;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use aws_smithy_types::date_time::Format;

use crate::resource::{Distribution, DistributionPage, InvalidationRequest, InvalidationResult, Origin};

/// The two CloudFront control-plane calls the invalidator needs.
#[async_trait]
pub trait DistributionApi: Send + Sync {
    /// Fetches a single page of distributions, starting at `marker`.
    async fn list_distributions(&self, marker: Option<String>) -> anyhow::Result<DistributionPage>;

    async fn create_invalidation(&self, request: &InvalidationRequest) -> anyhow::Result<InvalidationResult>;
}

pub fn new_client(config: &SdkConfig) -> aws_sdk_cloudfront::Client {
    aws_sdk_cloudfront::Client::new(config)
}

#[async_trait]
impl DistributionApi for aws_sdk_cloudfront::Client {
    async fn list_distributions(&self, marker: Option<String>) -> anyhow::Result<DistributionPage> {
        let response = aws_sdk_cloudfront::Client::list_distributions(self)
            .set_marker(marker)
            .send()
            .await?;

        let Some(distribution_list) = response.distribution_list() else {
            return Ok(DistributionPage::default());
        };

        let items = distribution_list
            .items()
            .iter()
            .map(|summary| Distribution {
                id:      summary.id().to_string(),
                origins: summary
                    .origins()
                    .map(|origins| {
                        origins
                            .items()
                            .iter()
                            .map(|origin| Origin {
                                domain_name: origin.domain_name().to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Ok(DistributionPage {
            items,
            is_truncated: distribution_list.is_truncated(),
            next_marker: distribution_list.next_marker().map(String::from),
        })
    }

    async fn create_invalidation(&self, request: &InvalidationRequest) -> anyhow::Result<InvalidationResult> {
        let paths = Paths::builder()
            .quantity(request.paths.len() as i32)
            .set_items(Some(request.paths.clone()))
            .build()?;

        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(&request.caller_reference)
            .build()?;

        let response = aws_sdk_cloudfront::Client::create_invalidation(self)
            .distribution_id(&request.distribution_id)
            .invalidation_batch(batch)
            .send()
            .await?;

        let invalidation = response.invalidation().context("No invalidation in CreateInvalidation response")?;

        Ok(InvalidationResult {
            id:               invalidation.id().to_string(),
            status:           invalidation.status().to_string(),
            create_time:      invalidation.create_time().fmt(Format::DateTime)?,
            location:         response.location().map(String::from),
            distribution_id:  request.distribution_id.clone(),
            caller_reference: request.caller_reference.clone(),
            paths:            request.paths.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_cloudfront::{
        operation::{create_invalidation::CreateInvalidationOutput, list_distributions::ListDistributionsOutput},
        primitives::DateTime,
        types::{DistributionList, DistributionSummary, HttpVersion, Invalidation, Origin as SdkOrigin, Origins, PriceClass},
    };
    use aws_smithy_mocks::{mock, mock_client};

    use super::*;

    fn summary(id: &str, domain: &str) -> DistributionSummary {
        let origins = Origins::builder()
            .quantity(1)
            .items(SdkOrigin::builder().id("website").domain_name(domain).build().unwrap())
            .build()
            .unwrap();

        DistributionSummary::builder()
            .id(id)
            .arn(format!("arn:aws:cloudfront::111122223333:distribution/{id}"))
            .status("Deployed")
            .last_modified_time(DateTime::from_secs(0))
            .domain_name(format!("{}.cloudfront.net", id.to_lowercase()))
            .origins(origins)
            .comment("")
            .price_class(PriceClass::PriceClassAll)
            .enabled(true)
            .web_acl_id("")
            .http_version(HttpVersion::Http2)
            .is_ipv6_enabled(true)
            .staging(false)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn truncated_page_keeps_order_and_marker() {
        let list = mock!(aws_sdk_cloudfront::Client::list_distributions)
            .match_requests(|req| req.marker() == Some("M1"))
            .then_output(|| {
                ListDistributionsOutput::builder()
                    .distribution_list(
                        DistributionList::builder()
                            .marker("M1")
                            .next_marker("M2")
                            .max_items(2)
                            .is_truncated(true)
                            .quantity(2)
                            .items(summary("E1", "b.s3-website-us-east-1.amazonaws.com"))
                            .items(summary("E2", "c.s3-website-us-east-1.amazonaws.com"))
                            .build()
                            .unwrap(),
                    )
                    .build()
            });
        let client = mock_client!(aws_sdk_cloudfront, [&list]);

        let page = DistributionApi::list_distributions(&client, Some(String::from("M1")))
            .await
            .unwrap();

        assert_eq!(
            page,
            DistributionPage {
                items:        vec![
                    Distribution {
                        id:      String::from("E1"),
                        origins: vec![Origin {
                            domain_name: String::from("b.s3-website-us-east-1.amazonaws.com"),
                        }],
                    },
                    Distribution {
                        id:      String::from("E2"),
                        origins: vec![Origin {
                            domain_name: String::from("c.s3-website-us-east-1.amazonaws.com"),
                        }],
                    },
                ],
                is_truncated: true,
                next_marker:  Some(String::from("M2")),
            }
        );
        assert_eq!(list.num_calls(), 1);
    }

    #[tokio::test]
    async fn missing_distribution_list_is_an_empty_page() {
        let list = mock!(aws_sdk_cloudfront::Client::list_distributions)
            .then_output(|| ListDistributionsOutput::builder().build());
        let client = mock_client!(aws_sdk_cloudfront, [&list]);

        let page = DistributionApi::list_distributions(&client, None).await.unwrap();
        assert_eq!(page, DistributionPage::default());
    }

    #[tokio::test]
    async fn create_invalidation_sends_batch_and_maps_response() {
        let create = mock!(aws_sdk_cloudfront::Client::create_invalidation)
            .match_requests(|req| {
                let Some(batch) = req.invalidation_batch() else {
                    return false;
                };
                let Some(paths) = batch.paths() else {
                    return false;
                };
                req.distribution_id() == Some("E1")
                    && batch.caller_reference() == "1760745600000"
                    && paths.quantity() == 1
                    && paths.items() == ["/*"]
            })
            .then_output(|| {
                CreateInvalidationOutput::builder()
                    .location("https://cloudfront.amazonaws.com/2020-05-31/distribution/E1/invalidation/I1")
                    .invalidation(
                        Invalidation::builder()
                            .id("I1")
                            .status("InProgress")
                            .create_time(DateTime::from_secs(1_760_745_600))
                            .build()
                            .unwrap(),
                    )
                    .build()
            });
        let client = mock_client!(aws_sdk_cloudfront, [&create]);

        let request = InvalidationRequest {
            distribution_id:  String::from("E1"),
            caller_reference: String::from("1760745600000"),
            paths:            vec![String::from("/*")],
        };
        let result = DistributionApi::create_invalidation(&client, &request).await.unwrap();

        assert_eq!(create.num_calls(), 1);
        assert_eq!(result.id, "I1");
        assert_eq!(result.status, "InProgress");
        assert_eq!(result.create_time, "2025-10-18T00:00:00Z");
        assert_eq!(
            result.location.as_deref(),
            Some("https://cloudfront.amazonaws.com/2020-05-31/distribution/E1/invalidation/I1")
        );
        assert_eq!(result.distribution_id, "E1");
        assert_eq!(result.caller_reference, "1760745600000");
        assert_eq!(result.paths, vec![String::from("/*")]);
    }

    #[tokio::test]
    async fn response_without_invalidation_is_an_error() {
        let create = mock!(aws_sdk_cloudfront::Client::create_invalidation)
            .then_output(|| CreateInvalidationOutput::builder().build());
        let client = mock_client!(aws_sdk_cloudfront, [&create]);

        let request = InvalidationRequest {
            distribution_id:  String::from("E1"),
            caller_reference: String::from("1"),
            paths:            vec![String::from("/*")],
        };
        let err = DistributionApi::create_invalidation(&client, &request).await.unwrap_err();
        assert!(err.to_string().contains("No invalidation"), "got: {err}");
    }
}
