//! Mock implementations for testing
//!
//! [`RecordingRunner`] stands in for [`crate::ShellRunner`] so dispatch can be
//! verified without spawning processes.

#![cfg(any(test, feature = "mocks"))]

use std::io;

use crate::runner::{CommandRunner, Invocation, RunStatus};

/// What the mock returns for every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockResponse {
    /// The command "ran" and ended with this status.
    Status(RunStatus),
    /// The command could not be spawned.
    SpawnError(io::ErrorKind),
}

/// Records invocations instead of running them.
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    calls: Vec<Invocation>,
    response: MockResponse,
}

impl RecordingRunner {
    /// Runner whose commands all succeed.
    pub fn new() -> Self {
        Self::with_response(MockResponse::Status(RunStatus::SUCCESS))
    }

    /// Runner whose commands all exit with `code`.
    pub fn exiting_with(code: i32) -> Self {
        Self::with_response(MockResponse::Status(RunStatus::exited(code)))
    }

    /// Runner whose commands all fail to spawn with `kind`.
    pub fn failing_to_spawn(kind: io::ErrorKind) -> Self {
        Self::with_response(MockResponse::SpawnError(kind))
    }

    /// Runner with an explicit response.
    pub fn with_response(response: MockResponse) -> Self {
        Self {
            calls: Vec::new(),
            response,
        }
    }

    /// Every invocation seen so far, in order.
    pub fn calls(&self) -> &[Invocation] {
        &self.calls
    }

    /// Number of invocations seen so far.
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<RunStatus> {
        self.calls.push(invocation.clone());
        match self.response {
            MockResponse::Status(status) => Ok(status),
            MockResponse::SpawnError(kind) => Err(io::Error::new(kind, "mock spawn failure")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut runner = RecordingRunner::new();
        runner.run(&Invocation::new("a", Vec::new())).unwrap();
        runner.run(&Invocation::new("b", Vec::new())).unwrap();
        let programs: Vec<_> = runner.calls().iter().map(|c| c.program.as_str()).collect();
        assert_eq!(programs, ["a", "b"]);
    }

    #[test]
    fn spawn_error_is_still_recorded() {
        let mut runner = RecordingRunner::failing_to_spawn(io::ErrorKind::NotFound);
        let err = runner.run(&Invocation::new("x", Vec::new())).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(runner.call_count(), 1);
    }
}
