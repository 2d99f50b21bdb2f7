use std::fmt;
use std::path::Path;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::domain::{ChangeEvent, ChangeKind};

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("filesystem watch failed: {0}")]
    Backend(#[from] notify::Error),
    #[error("change stream closed")]
    StreamClosed,
}

/// Live, order-preserving stream of filesystem changes. Keeps the backend
/// watcher alive for as long as the stream exists; dropping the stream ends
/// the subscription.
pub struct ChangeStream {
    _watcher: Option<RecommendedWatcher>,
    rx: mpsc::UnboundedReceiver<Result<ChangeEvent, WatchError>>,
}

impl ChangeStream {
    /// A stream fed by hand instead of by the filesystem. Lets loop tests
    /// inject events without touching disk.
    #[cfg(test)]
    pub fn channel() -> (
        mpsc::UnboundedSender<Result<ChangeEvent, WatchError>>,
        ChangeStream,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, ChangeStream { _watcher: None, rx })
    }

    /// Next event, blocking until one arrives. A closed stream is an
    /// infrastructure failure, not a quiet end.
    pub async fn next(&mut self) -> Result<ChangeEvent, WatchError> {
        self.rx.recv().await.unwrap_or(Err(WatchError::StreamClosed))
    }
}

impl fmt::Debug for ChangeStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeStream")
            .field("watching", &self._watcher.is_some())
            .finish_non_exhaustive()
    }
}

/// Watch `dir` (non-recursively) for the process lifetime. The caller
/// watches the executable's parent directory rather than the file itself:
/// build tools frequently replace the output via rename, and the watch on
/// the old inode would go stale.
pub fn subscribe(dir: &Path) -> Result<ChangeStream, WatchError> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |result: Result<Event, notify::Error>| {
        match result {
            Ok(event) => {
                for change in to_change_events(event) {
                    let _ = tx.send(Ok(change));
                }
            }
            Err(e) => {
                let _ = tx.send(Err(WatchError::Backend(e)));
            }
        }
    })?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("watching {} for changes", dir.display());

    Ok(ChangeStream {
        _watcher: Some(watcher),
        rx,
    })
}

/// Directory to watch for a given executable path. A bare file name has an
/// empty parent, which means the current directory.
pub fn parent_dir(executable: &Path) -> &Path {
    match executable.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn to_change_events(event: Event) -> Vec<ChangeEvent> {
    let kind = match event.kind {
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            ChangeKind::Write
        }
        EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Rename,
        _ => ChangeKind::Other,
    };
    event
        .paths
        .into_iter()
        .map(|path| ChangeEvent { path, kind })
        .collect()
}
