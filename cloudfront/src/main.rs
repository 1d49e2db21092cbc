use std::path::PathBuf;

use anyhow::bail;
use cloudfront_invalidator::{config::InvalidatorConfig, invalidator::Invalidator};
use cloudfront_invalidator_core::{config::AwsServiceConfig, util::to_pretty_ron};
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let Some(bucket) = std::env::args().nth(1) else {
        bail!("usage: cloudfront-invalidator <bucket>");
    };

    let prefix = match std::env::var_os("CLOUDFRONT_INVALIDATOR_PREFIX") {
        Some(prefix) => PathBuf::from(prefix),
        None => std::env::current_dir()?,
    };

    let config = InvalidatorConfig::try_load(&prefix).await?;
    if let Some(account_id) = config.verify_sts().await? {
        tracing::info!("Credentials verified for account {}", account_id);
    }

    let invalidator = Invalidator::from_config(&config).await?;
    let result = invalidator.invalidate_bucket_paths(&bucket, &config.paths).await?;

    println!("{}", to_pretty_ron(&result)?);
    Ok(())
}
