use std::path::Path;

use serde::{Deserialize, Serialize};

use cloudfront_invalidator_core::{
    config::{AwsConfig, AwsServiceConfig},
    util::RON,
};

use crate::resource::INVALIDATE_ALL;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InvalidatorConfig {
    pub aws:               AwsConfig,
    /// Follow `NextMarker` past the first page of distributions.
    pub follow_pagination: bool,
    pub paths:             Vec<String>,
}

impl From<AwsConfig> for InvalidatorConfig {
    fn from(value: AwsConfig) -> Self {
        Self {
            aws:               value,
            follow_pagination: false,
            paths:             vec![INVALIDATE_ALL.to_string()],
        }
    }
}

impl Default for InvalidatorConfig {
    fn default() -> Self {
        Self::from(AwsConfig::default())
    }
}

impl AwsServiceConfig for InvalidatorConfig {
    async fn try_load(prefix: &Path) -> anyhow::Result<Self> {
        let config_path = prefix.join("aws/cloudfront/config.ron");
        if config_path.is_file() {
            tracing::info!("Loading CloudFront invalidator config file at {:?}", config_path);
            let config: InvalidatorConfig = RON.from_str(&std::fs::read_to_string(config_path)?)?;
            Ok(config)
        } else {
            Ok(InvalidatorConfig::from(AwsConfig::try_load(prefix)?))
        }
    }

    fn aws(&self) -> &AwsConfig {
        &self.aws
    }
}
