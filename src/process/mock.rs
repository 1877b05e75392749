use crate::error::{Result, TrackingError};
use crate::process::{classify, Invoker, ProcessResult, Stdin};
use std::collections::VecDeque;
use std::io;
use std::sync::{Mutex, MutexGuard};

/// One call observed by [MockInvoker]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub args: Vec<String>,
    pub stdin: Stdin,
}

#[derive(Debug)]
enum Response {
    Exit {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    SpawnFailure,
}

/// Mock invoker for testing without spawning processes
///
/// Responses are replayed in the order they were queued and go through the
/// same exit code classification as the real invoker. A call with nothing
/// queued behaves like a missing executable.
#[derive(Debug, Default)]
pub struct MockInvoker {
    responses: Mutex<VecDeque<Response>>,
    invocations: Mutex<Vec<Invocation>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockInvoker {
    /// Create a new mock with no queued responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw exit code with the streams the tool would print
    pub fn push_exit(&self, code: i32, stdout: impl Into<String>, stderr: impl Into<String>) {
        locked(&self.responses).push_back(Response::Exit {
            code: Some(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        });
    }

    /// Queue an exit code 0 response
    pub fn push_success(&self, stdout: impl Into<String>) {
        self.push_exit(0, stdout, "");
    }

    /// Queue an exit code 128 response
    pub fn push_fatal(&self, stderr: impl Into<String>) {
        self.push_exit(crate::process::FATAL_APPLICATION_EXIT, "", stderr);
    }

    /// Queue a child that died without an exit code
    pub fn push_killed(&self) {
        locked(&self.responses).push_back(Response::Exit {
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        });
    }

    /// Queue a failure to start the process
    pub fn push_spawn_failure(&self) {
        locked(&self.responses).push_back(Response::SpawnFailure);
    }

    /// Every call made so far, oldest first
    pub fn invocations(&self) -> Vec<Invocation> {
        locked(&self.invocations).clone()
    }

    /// Arguments of every call made so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.invocations().into_iter().map(|i| i.args).collect()
    }
}

impl Invoker for MockInvoker {
    fn run(&self, args: &[&str], stdin: Stdin) -> Result<ProcessResult> {
        locked(&self.invocations).push(Invocation {
            args: args.iter().map(|a| a.to_string()).collect(),
            stdin,
        });

        match locked(&self.responses).pop_front() {
            Some(Response::Exit {
                code,
                stdout,
                stderr,
            }) => classify(code, stdout, stderr),
            Some(Response::SpawnFailure) | None => Err(TrackingError::Spawn {
                program: "mock".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no response queued"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_replays_in_order() {
        let mock = MockInvoker::new();
        mock.push_success("first");
        mock.push_fatal("second");

        assert_eq!(
            mock.run(&["a"], Stdin::Inherit).unwrap(),
            ProcessResult::Success("first".to_string())
        );
        assert_eq!(
            mock.run(&["b"], Stdin::Null).unwrap(),
            ProcessResult::FatalApplicationError("second".to_string())
        );
    }

    #[test]
    fn test_mock_records_invocations() {
        let mock = MockInvoker::new();
        mock.push_success("");

        let _ = mock.run(&["branch", "docs", "main"], Stdin::Null);

        assert_eq!(
            mock.invocations(),
            vec![Invocation {
                args: vec!["branch".to_string(), "docs".to_string(), "main".to_string()],
                stdin: Stdin::Null,
            }]
        );
    }

    #[test]
    fn test_mock_unexpected_exit_escalates() {
        let mock = MockInvoker::new();
        mock.push_exit(1, "out", "err");

        let err = mock.run(&["status"], Stdin::Inherit).unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_mock_without_response_fails_to_spawn() {
        let mock = MockInvoker::new();
        let err = mock.run(&["version"], Stdin::Inherit).unwrap_err();
        assert!(matches!(err, TrackingError::Spawn { .. }));
        assert_eq!(mock.calls().len(), 1);
    }

    #[test]
    fn test_mock_default() {
        let mock = MockInvoker::default();
        assert!(mock.invocations().is_empty());
    }
}
