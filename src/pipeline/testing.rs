use std::io::Write;
use std::path::Path;

use crate::domain::TestCase;
use crate::runner::traits::Runner;
use crate::watcher::{ChangeStream, WatchError};

#[derive(Debug)]
enum LoopState {
    Running,
    WaitingForChange,
    Done,
}

struct IterationTally {
    passed: usize,
}

/// Run the sample cases until every one with an expected output matches,
/// suspending on failure until the monitored executable is rebuilt. A
/// qualifying change re-runs the whole set from the first case; nothing is
/// memoized between iterations.
#[tracing::instrument(skip(samples, runner, changes))]
pub async fn run_until_pass(
    samples: &[TestCase],
    runner: &dyn Runner,
    changes: &mut ChangeStream,
    executable: &Path,
) -> Result<(), WatchError> {
    let mut state = LoopState::Running;
    loop {
        state = match state {
            LoopState::Running => {
                tracing::info!("running tests");
                let tally = run_iteration(samples, runner).await;
                if tally.passed == samples.len() {
                    tracing::info!("all sample tests passed");
                    LoopState::Done
                } else {
                    tracing::warn!("{}/{} tests passed", tally.passed, samples.len());
                    LoopState::WaitingForChange
                }
            }
            LoopState::WaitingForChange => {
                tracing::info!("waiting for {} to change", executable.display());
                loop {
                    let change = changes.next().await?;
                    if change.qualifies(executable) {
                        tracing::info!("detected file change, rerunning tests");
                        break;
                    }
                    tracing::debug!(path = %change.path.display(), "ignoring unrelated change");
                }
                LoopState::Running
            }
            LoopState::Done => return Ok(()),
        };
    }
}

async fn run_iteration(samples: &[TestCase], runner: &dyn Runner) -> IterationTally {
    let mut passed = 0;
    for (index, case) in samples.iter().enumerate() {
        let Some(expected) = case.expected.as_deref() else {
            // Missing sample asset: vacuously passed, never executed.
            passed += 1;
            continue;
        };
        match runner.run(&case.input).await {
            Ok(stdout) => {
                if stdout == expected {
                    passed += 1;
                } else {
                    report_mismatch(index, &case.input, expected, &stdout);
                }
            }
            Err(err) => {
                // A crash invalidates the whole run; skip the rest of this
                // iteration. Cases that already passed keep their tally.
                tracing::error!("execution failed in test {}: {}", index + 1, err);
                break;
            }
        }
    }
    IterationTally { passed }
}

fn report_mismatch(index: usize, input: &[u8], expected: &[u8], actual: &[u8]) {
    tracing::error!("test {} failed", index + 1);
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "input:");
    let _ = out.write_all(input);
    let _ = writeln!(out, "expected:");
    let _ = out.write_all(expected);
    let _ = writeln!(out, "actual:");
    let _ = out.write_all(actual);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::domain::{ChangeEvent, ChangeKind};
    use crate::runner::stubs::RunnerStub;
    use crate::runner::traits::RunError;

    fn launch_failure() -> Result<Vec<u8>, RunError> {
        Err(RunError::FailedToLaunch {
            msg: "boom".to_string(),
        })
    }

    fn write_event(path: &str) -> Result<ChangeEvent, WatchError> {
        Ok(ChangeEvent {
            path: PathBuf::from(path),
            kind: ChangeKind::Write,
        })
    }

    #[tokio::test]
    async fn vacuous_cases_never_invoke_the_executable() {
        let samples = vec![TestCase::missing(), TestCase::missing()];
        let runner = RunnerStub::new(vec![]);
        let (_tx, mut changes) = ChangeStream::channel();

        run_until_pass(&samples, &runner, &mut changes, Path::new("a.out"))
            .await
            .expect("all-missing samples pass immediately");
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn cases_run_in_ascending_index_order() {
        let samples = vec![
            TestCase::sample(b"a".to_vec(), b"x".to_vec()),
            TestCase::sample(b"b".to_vec(), b"y".to_vec()),
            TestCase::sample(b"c".to_vec(), b"z".to_vec()),
        ];
        let runner = RunnerStub::new(vec![
            Ok(b"x".to_vec()),
            Ok(b"y".to_vec()),
            Ok(b"z".to_vec()),
        ]);
        let (_tx, mut changes) = ChangeStream::channel();

        run_until_pass(&samples, &runner, &mut changes, Path::new("a.out"))
            .await
            .expect("all samples match");
        assert_eq!(
            runner.calls(),
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]
        );
    }

    #[tokio::test]
    async fn mismatch_reports_and_continues_within_iteration() {
        let samples = vec![
            TestCase::sample(b"a".to_vec(), b"x".to_vec()),
            TestCase::sample(b"b".to_vec(), b"y".to_vec()),
        ];
        let runner = RunnerStub::new(vec![Ok(b"wrong".to_vec()), Ok(b"y".to_vec())]);

        let tally = run_iteration(&samples, &runner).await;
        assert_eq!(tally.passed, 1);
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn crash_skips_remaining_cases_but_keeps_prior_passes() {
        let samples = vec![
            TestCase::sample(b"a".to_vec(), b"x".to_vec()),
            TestCase::sample(b"b".to_vec(), b"y".to_vec()),
            TestCase::sample(b"c".to_vec(), b"z".to_vec()),
        ];
        let runner = RunnerStub::new(vec![Ok(b"x".to_vec()), launch_failure()]);

        let tally = run_iteration(&samples, &runner).await;
        assert_eq!(tally.passed, 1);
        // The third case is never attempted.
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn unrelated_change_does_not_trigger_a_rerun() {
        let samples = vec![TestCase::sample(b"a".to_vec(), b"x".to_vec())];
        let runner = RunnerStub::new(vec![Ok(b"wrong".to_vec())]);
        let (tx, mut changes) = ChangeStream::channel();
        tx.send(write_event("main.cpp")).expect("send failed");

        let result = tokio::time::timeout(
            Duration::from_millis(100),
            run_until_pass(&samples, &runner, &mut changes, Path::new("a.out")),
        )
        .await;
        assert!(result.is_err(), "loop must still be waiting");
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn qualifying_change_triggers_exactly_one_rerun() {
        let samples = vec![
            TestCase::sample(b"1\n".to_vec(), b"one\n".to_vec()),
            TestCase::sample(b"2\n".to_vec(), b"two\n".to_vec()),
        ];
        let runner = RunnerStub::new(vec![
            Ok(b"one\n".to_vec()),
            Ok(b"wrong\n".to_vec()),
            Ok(b"one\n".to_vec()),
            Ok(b"two\n".to_vec()),
        ]);
        let (tx, mut changes) = ChangeStream::channel();
        tx.send(write_event("notes.txt")).expect("send failed");
        tx.send(write_event("a.out")).expect("send failed");

        run_until_pass(&samples, &runner, &mut changes, Path::new("a.out"))
            .await
            .expect("second iteration passes");
        assert_eq!(runner.calls().len(), 4);
    }

    #[tokio::test]
    async fn crash_waits_for_a_change_then_recovers() {
        let samples = vec![TestCase::sample(b"1\n".to_vec(), b"one\n".to_vec())];
        let runner = RunnerStub::new(vec![launch_failure(), Ok(b"one\n".to_vec())]);
        let (tx, mut changes) = ChangeStream::channel();
        tx.send(write_event("a.out")).expect("send failed");

        run_until_pass(&samples, &runner, &mut changes, Path::new("a.out"))
            .await
            .expect("recovers after rebuild");
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn closed_stream_is_fatal() {
        let samples = vec![TestCase::sample(b"a".to_vec(), b"x".to_vec())];
        let runner = RunnerStub::new(vec![Ok(b"wrong".to_vec())]);
        let (tx, mut changes) = ChangeStream::channel();
        drop(tx);

        let result = run_until_pass(&samples, &runner, &mut changes, Path::new("a.out")).await;
        assert!(matches!(result, Err(WatchError::StreamClosed)));
    }
}
