use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::domain::UploadJob;
use crate::pipeline::{batch, fetching, testing, uploading};
use crate::remote::http::{DEFAULT_BASE_URL, HttpRemoteClient};
use crate::remote::traits::RemoteClient;
use crate::runner::basic::BasicRunner;

mod config;
mod domain;
mod pipeline;
mod remote;
mod runner;
mod watcher;


/// Gap between consecutive output submissions, to stay under the judge's
/// rate limit.
const UPLOAD_PACE: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    set_panic_hook();

    run(Config::parse()).await
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let client =
        HttpRemoteClient::new(DEFAULT_BASE_URL, &config.session, &config.term, config.problem);
    tracing::info!("view the question at: {}", client.statement_url());

    // Subscribe before fetching so a rebuild that lands while assets are
    // still downloading is not missed.
    let mut changes = watcher::subscribe(watcher::parent_dir(&config.executable))?;

    let remote: Arc<dyn RemoteClient> = Arc::new(client);
    let assets = fetching::fetch_assets(remote.clone(), config.samples, config.hidden).await?;

    let runner = BasicRunner::new(&config.executable);
    testing::run_until_pass(&assets.samples, &runner, &mut changes, &config.executable).await?;

    let outputs = batch::run_hidden_inputs(&assets.hidden, &runner).await?;

    let file_name = config
        .source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or("source path has no file name")?;
    let source_bytes = tokio::fs::read(&config.source).await?;

    let mut jobs = vec![UploadJob::source(file_name, source_bytes)];
    jobs.extend(
        outputs
            .into_iter()
            .enumerate()
            .map(|(index, payload)| UploadJob::output(index, payload)),
    );
    uploading::upload_all(remote, jobs, UPLOAD_PACE).await?;

    tracing::info!("everything ok");
    Ok(())
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
