use std::path::{Path, PathBuf};

/// One test case as served by the judge. Sample cases carry an expected
/// output; hidden cases do not. A sample whose asset was missing on the
/// server also has `expected = None` and is counted as passed without ever
/// running the executable.
#[derive(Clone, Debug)]
pub struct TestCase {
    pub input: Vec<u8>,
    pub expected: Option<Vec<u8>>,
}

impl TestCase {
    pub fn sample(input: Vec<u8>, expected: Vec<u8>) -> Self {
        TestCase {
            input,
            expected: Some(expected),
        }
    }

    /// A sample pair with a missing half. Vacuously passing.
    pub fn missing() -> Self {
        TestCase {
            input: Vec::new(),
            expected: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Write,
    Rename,
    Other,
}

/// A filesystem event reported by the change watcher.
#[derive(Clone, Debug)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    /// Whether this event should trigger a re-run: a write or rename whose
    /// basename is the monitored executable's basename.
    pub fn qualifies(&self, executable: &Path) -> bool {
        matches!(self.kind, ChangeKind::Write | ChangeKind::Rename)
            && self.path.file_name() == executable.file_name()
    }
}

/// One multipart submission: the source file or one hidden-input output.
/// The judge associates `fno`/`formCount` with the sequence index, not with
/// arrival order, so the index travels with the job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadJob {
    pub field_name: String,
    pub file_name: String,
    pub payload: Vec<u8>,
    pub sequence_index: usize,
}

impl UploadJob {
    pub fn source(file_name: String, payload: Vec<u8>) -> Self {
        UploadJob {
            field_name: "program".to_string(),
            file_name,
            payload,
            sequence_index: 0,
        }
    }

    /// Output upload for hidden input `index` (0-indexed). The judge expects
    /// field `out{n}` with `fno = n` where `n = index + 1`.
    pub fn output(index: usize, payload: Vec<u8>) -> Self {
        UploadJob {
            field_name: format!("out{}", index + 1),
            file_name: "out.txt".to_string(),
            payload,
            sequence_index: index + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifying_event_matches_basename_only() {
        let executable = Path::new("target/debug/a.out");
        let event = ChangeEvent {
            path: PathBuf::from("a.out"),
            kind: ChangeKind::Write,
        };
        assert!(event.qualifies(executable));

        let unrelated = ChangeEvent {
            path: PathBuf::from("main.cpp"),
            kind: ChangeKind::Write,
        };
        assert!(!unrelated.qualifies(executable));
    }

    #[test]
    fn rename_qualifies_other_does_not() {
        let executable = Path::new("a.out");
        let rename = ChangeEvent {
            path: PathBuf::from("build/a.out"),
            kind: ChangeKind::Rename,
        };
        assert!(rename.qualifies(executable));

        let other = ChangeEvent {
            path: PathBuf::from("a.out"),
            kind: ChangeKind::Other,
        };
        assert!(!other.qualifies(executable));
    }

    #[test]
    fn source_job_has_index_zero() {
        let job = UploadJob::source("main.cpp".to_string(), b"int main() {}".to_vec());
        assert_eq!(job.field_name, "program");
        assert_eq!(job.file_name, "main.cpp");
        assert_eq!(job.sequence_index, 0);
    }

    #[test]
    fn output_jobs_are_one_indexed() {
        for index in 0..5 {
            let job = UploadJob::output(index, vec![b'x']);
            assert_eq!(job.field_name, format!("out{}", index + 1));
            assert_eq!(job.file_name, "out.txt");
            assert_eq!(job.sequence_index, index + 1);
        }
    }
}
