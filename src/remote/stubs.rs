use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::domain::UploadJob;
use crate::remote::traits::{RemoteClient, RemoteError, Resource};

#[derive(Clone, Debug)]
pub enum FetchScript {
    Body(Vec<u8>),
    Missing,
}

/// Scripted `RemoteClient` for tests. Resources without a script behave as
/// missing assets; submissions are recorded with their dispatch time so
/// pacing can be asserted under a paused clock.
#[derive(Debug, Default)]
pub struct RemoteClientStub {
    fetches: HashMap<Resource, FetchScript>,
    fail_submissions: bool,
    delay: Duration,
    submitted: Mutex<Vec<(Instant, UploadJob)>>,
}

impl RemoteClientStub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fetch(mut self, resource: Resource, script: FetchScript) -> Self {
        self.fetches.insert(resource, script);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_submissions(mut self) -> Self {
        self.fail_submissions = true;
        self
    }

    pub fn submitted(&self) -> Vec<UploadJob> {
        self.submitted
            .lock()
            .expect("submissions lock poisoned")
            .iter()
            .map(|(_, job)| job.clone())
            .collect()
    }

    pub fn submitted_at(&self) -> Vec<(Instant, UploadJob)> {
        self.submitted
            .lock()
            .expect("submissions lock poisoned")
            .clone()
    }
}

#[async_trait::async_trait]
impl RemoteClient for RemoteClientStub {
    async fn fetch(&self, resource: &Resource) -> Result<Option<Vec<u8>>, RemoteError> {
        tokio::time::sleep(self.delay).await;
        match self.fetches.get(resource) {
            Some(FetchScript::Body(body)) => Ok(Some(body.clone())),
            Some(FetchScript::Missing) | None => Ok(None),
        }
    }

    async fn submit(&self, job: &UploadJob) -> Result<(), RemoteError> {
        let dispatched = Instant::now();
        tokio::time::sleep(self.delay).await;
        if self.fail_submissions {
            return Err(RemoteError::UnexpectedStatus {
                status: 500,
                url: "stub://submit".to_string(),
            });
        }
        self.submitted
            .lock()
            .expect("submissions lock poisoned")
            .push((dispatched, job.clone()));
        Ok(())
    }
}
