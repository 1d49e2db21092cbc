use std::{path::Path, time::Duration};

use anyhow::bail;
use aws_config::{
    BehaviorVersion, Region, SdkConfig, meta::region::RegionProviderChain, timeout::TimeoutConfig as SdkTimeoutConfig,
};
use serde::{Deserialize, Serialize};

use crate::util::RON;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeoutConfig {
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs:   u64,
    #[serde(default = "default_timeout_secs")]
    pub operation_timeout_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs:   DEFAULT_TIMEOUT_SECS,
            operation_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TimeoutConfig {
    fn to_sdk(&self) -> SdkTimeoutConfig {
        let operation_timeout = Duration::from_secs(self.operation_timeout_secs);
        SdkTimeoutConfig::builder()
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .operation_timeout(operation_timeout)
            .operation_attempt_timeout(operation_timeout)
            .read_timeout(operation_timeout)
            .build()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AwsConfig {
    pub account_id:     Option<String>,
    pub endpoint_url:   Option<String>,
    pub timeout_config: Option<TimeoutConfig>,
    pub sts_region:     String,
    /// Region of the bucket's static-website endpoint. Falls back to the
    /// provider's default region chain when unset.
    pub region:         Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            account_id:     Default::default(),
            endpoint_url:   Default::default(),
            timeout_config: Default::default(),
            sts_region:     String::from("us-east-1"),
            region:         Default::default(),
        }
    }
}

impl AwsConfig {
    pub fn try_load(prefix: &Path) -> anyhow::Result<AwsConfig> {
        let config_path = prefix.join("aws/config.ron");
        if config_path.is_file() {
            tracing::info!("Loading AWS config file at {:?}", config_path);
            let config: AwsConfig = RON.from_str(&std::fs::read_to_string(config_path)?)?;
            Ok(config)
        } else {
            tracing::info!("AWS config file at {:?} not present, skipping.", config_path);
            Ok(AwsConfig::default())
        }
    }

    /// Builds the SDK config every client is created from. Credentials always
    /// come from the provider's default chain.
    pub async fn to_sdk_config(&self) -> SdkConfig {
        let region = RegionProviderChain::first_try(self.region.clone().map(Region::new)).or_default_provider();
        let timeouts = self.timeout_config.clone().unwrap_or_default();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .timeout_config(timeouts.to_sdk());

        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }

    /// Checks the ambient credentials against `account_id` when one is
    /// configured. Returns the caller's account id if STS was consulted.
    pub async fn verify_sts(&self) -> anyhow::Result<Option<String>> {
        if self.account_id.is_none() {
            return Ok(None);
        }

        let sts_config = aws_config::defaults(BehaviorVersion::latest())
            .region(RegionProviderChain::first_try(Region::new(self.sts_region.clone())))
            .load()
            .await;

        let sts_client = aws_sdk_sts::Client::new(&sts_config);
        self.verify_caller_account(&sts_client).await.map(Some)
    }

    async fn verify_caller_account(&self, sts_client: &aws_sdk_sts::Client) -> anyhow::Result<String> {
        let caller_identity = sts_client
            .get_caller_identity()
            .send()
            .await
            .inspect_err(|e| tracing::error!("Failed to call sts:GetCallerIdentity: {}", e))?;

        let Some(caller_account_id) = caller_identity.account else {
            bail!("Failed to get current account ID!");
        };

        if let Some(account_id) = &self.account_id
            && caller_account_id != *account_id
        {
            bail!(
                "AWS: Account ID mismatch. Configured to use account ID {account_id}, \nbut credentials provided are for account ID {caller_account_id}."
            );
        }

        Ok(caller_account_id)
    }
}

/// A per-service config file that falls back to the shared `aws/config.ron`.
pub trait AwsServiceConfig: Sized {
    async fn try_load(prefix: &Path) -> anyhow::Result<Self>;
    fn aws(&self) -> &AwsConfig;

    async fn verify_sts(&self) -> anyhow::Result<Option<String>> {
        self.aws().verify_sts().await
    }
}
