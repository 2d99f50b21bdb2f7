use std::collections::VecDeque;
use std::sync::Mutex;

use crate::runner::traits::{RunError, Runner};

/// Scripted `Runner` for loop and batch tests: returns the scripted results
/// in order and records every input it was given. An exhausted script is a
/// launch failure rather than a panic, so a test that over-runs its script
/// fails with a visible assertion instead of aborting the runtime.
#[derive(Debug, Default)]
pub struct RunnerStub {
    script: Mutex<VecDeque<Result<Vec<u8>, RunError>>>,
    calls: Mutex<Vec<Vec<u8>>>,
}

impl RunnerStub {
    pub fn new(script: Vec<Result<Vec<u8>, RunError>>) -> Self {
        RunnerStub {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Inputs seen so far, in call order.
    pub fn calls(&self) -> Vec<Vec<u8>> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl Runner for RunnerStub {
    async fn run(&self, input: &[u8]) -> Result<Vec<u8>, RunError> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(input.to_vec());
        self.script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(RunError::FailedToLaunch {
                    msg: "runner stub script exhausted".to_string(),
                })
            })
    }
}
