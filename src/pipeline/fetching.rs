use std::sync::Arc;

use futures::stream::FuturesUnordered;
use tokio_stream::StreamExt;

use crate::domain::TestCase;
use crate::remote::traits::{RemoteClient, RemoteError, Resource};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("hidden input {index} is missing on the judge")]
    MissingHiddenInput { index: usize },
}

#[derive(Debug)]
pub struct FetchedAssets {
    pub samples: Vec<TestCase>,
    pub hidden: Vec<Vec<u8>>,
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    SampleIn(usize),
    SampleOut(usize),
    Hidden(usize),
}

/// Fetch all `2 * sample_count + hidden_count` assets in parallel and
/// return once every one has completed. Each task writes its own slot;
/// nothing reads the slots before the barrier drains.
#[tracing::instrument(skip(remote))]
pub async fn fetch_assets(
    remote: Arc<dyn RemoteClient>,
    sample_count: usize,
    hidden_count: usize,
) -> Result<FetchedAssets, FetchError> {
    tracing::info!("fetching test cases");

    let mut requests = Vec::with_capacity(2 * sample_count + hidden_count);
    for index in 0..sample_count {
        requests.push((Slot::SampleIn(index), Resource::SampleInput { index }));
        requests.push((Slot::SampleOut(index), Resource::SampleOutput { index }));
    }
    for index in 0..hidden_count {
        requests.push((Slot::Hidden(index), Resource::HiddenInput { index }));
    }

    let mut fetches = FuturesUnordered::new();
    for (slot, resource) in requests {
        let remote = remote.clone();
        fetches.push(async move { (slot, remote.fetch(&resource).await) });
    }

    let mut sample_inputs: Vec<Option<Vec<u8>>> = vec![None; sample_count];
    let mut sample_outputs: Vec<Option<Vec<u8>>> = vec![None; sample_count];
    let mut hidden_inputs: Vec<Option<Vec<u8>>> = vec![None; hidden_count];

    while let Some((slot, result)) = fetches.next().await {
        let body = result?;
        match slot {
            Slot::SampleIn(index) => sample_inputs[index] = body,
            Slot::SampleOut(index) => sample_outputs[index] = body,
            Slot::Hidden(index) => hidden_inputs[index] = body,
        }
    }

    let samples = sample_inputs
        .into_iter()
        .zip(sample_outputs)
        .map(|pair| match pair {
            (Some(input), Some(expected)) => TestCase::sample(input, expected),
            _ => TestCase::missing(),
        })
        .collect();

    let hidden = hidden_inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| input.ok_or(FetchError::MissingHiddenInput { index }))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FetchedAssets { samples, hidden })
}
