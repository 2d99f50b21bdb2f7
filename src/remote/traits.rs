use crate::domain::UploadJob;

/// An asset the judge serves for one problem. How a resource maps onto a
/// URL is the transport's business.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    SampleInput { index: usize },
    SampleOutput { index: usize },
    HiddenInput { index: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Transport to the grading service. `fetch` distinguishes a missing asset
/// (`Ok(None)`, soft) from everything else going wrong (fatal); neither
/// operation retries, since the server-side state after a partial failure
/// is ambiguous.
#[mockall::automock]
#[async_trait::async_trait]
pub trait RemoteClient: std::fmt::Debug + Send + Sync {
    async fn fetch(&self, resource: &Resource) -> Result<Option<Vec<u8>>, RemoteError>;

    async fn submit(&self, job: &UploadJob) -> Result<(), RemoteError>;
}
