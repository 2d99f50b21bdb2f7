use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::runner::traits::{RunError, Runner};

/// Spawns the configured executable per run. stdin is piped and fed the
/// case input, stdout is captured in full, stderr is inherited so compiler
/// debug prints and assertions reach the console unfiltered.
#[derive(Debug, Clone)]
pub struct BasicRunner {
    executable: PathBuf,
}

impl BasicRunner {
    pub fn new(executable: impl AsRef<Path>) -> Self {
        BasicRunner {
            executable: executable.as_ref().into(),
        }
    }
}

#[async_trait::async_trait]
impl Runner for BasicRunner {
    async fn run(&self, input: &[u8]) -> Result<Vec<u8>, RunError> {
        let mut child = Command::new(&self.executable)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| RunError::FailedToLaunch {
                msg: format!("failed to spawn {}: {}", self.executable.display(), e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(input).await {
                let _ = child.kill().await;
                return Err(RunError::FailedToLaunch {
                    msg: format!("failed to write to stdin: {e}"),
                });
            }
            // Dropping the handle closes the pipe and signals EOF.
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| RunError::FailedToLaunch {
                msg: format!("failed to wait for process: {e}"),
            })?;

        if !output.status.success() {
            return Err(RunError::Exited {
                status: output.status,
            });
        }

        Ok(output.stdout)
    }
}
