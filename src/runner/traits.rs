#[derive(Debug, Clone, thiserror::Error)]
pub enum RunError {
    #[error("failed to launch executable: {msg}")]
    FailedToLaunch { msg: String },
    #[error("executable exited with {status}")]
    Exited { status: std::process::ExitStatus },
}

/// Runs the monitored executable once against one input. The test loop and
/// the batch runner share this seam; only the error policy differs between
/// them.
#[async_trait::async_trait]
pub trait Runner: std::fmt::Debug + Send + Sync {
    /// Feed `input` to the executable's stdin and return captured stdout.
    /// The child's stderr goes straight to the operator's console.
    async fn run(&self, input: &[u8]) -> Result<Vec<u8>, RunError>;
}
