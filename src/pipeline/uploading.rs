use std::sync::Arc;
use std::time::Duration;

use futures::stream::FuturesUnordered;
use tokio_stream::StreamExt;

use crate::domain::UploadJob;
use crate::remote::traits::{RemoteClient, RemoteError};

/// Dispatch every submission concurrently and block until all of them have
/// landed. Submission `k` holds off `k` pace units before sending: the
/// judge rate-limits uploads that arrive together.
#[tracing::instrument(skip(remote, jobs))]
pub async fn upload_all(
    remote: Arc<dyn RemoteClient>,
    jobs: Vec<UploadJob>,
    pace: Duration,
) -> Result<(), RemoteError> {
    tracing::info!("uploading {} submissions", jobs.len());

    let mut submissions = FuturesUnordered::new();
    for job in jobs {
        let remote = remote.clone();
        submissions.push(async move {
            let delay = pace * job.sequence_index as u32;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            remote.submit(&job).await
        });
    }

    while let Some(result) = submissions.next().await {
        result?;
    }
    Ok(())
}
