use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bucket_storage::{BucketClient, StoreConfig};
use publisher::job::{BuildStatus, UploadJob};
use publisher::notify::Notifier;
use publisher::publish::Publisher;

/// Uploads build outputs to object storage and notifies a webhook
#[derive(Parser)]
#[command(name = "publisher")]
struct Cli {
    #[command(flatten)]
    job: UploadJob,

    /// Workspace root that the local path pattern resolves against
    #[arg(long, env = "WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// Terminal status of the build this step belongs to
    #[arg(long, env = "BUILD_STATUS", value_enum, default_value = "success")]
    build_status: BuildStatus,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    cli.job.validate()?;

    let env: HashMap<String, String> = std::env::vars().collect();

    let store = BucketClient::new(&StoreConfig {
        endpoint: cli.job.endpoint.clone(),
        access_key_id: cli.job.access_key_id.clone(),
        access_key_secret: cli.job.access_key_secret.clone(),
        bucket: cli.job.bucket.clone(),
        region: cli.job.region.clone(),
    });

    let notifier = match &cli.job.webhook_url {
        Some(url) => Some(Notifier::new(url.clone(), cli.job.webhook_skip_tls_verify)?),
        None => None,
    };

    info!("starting publisher in workspace {}", cli.workspace.display());
    let publisher = Publisher::new(store, cli.job.clone(), notifier);
    publisher.run(&cli.workspace, &env, cli.build_status).await?;

    Ok(())
}
