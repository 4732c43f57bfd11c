//! Process boundary.
//!
//! The dispatcher only ever builds an [`Invocation`] and hands it to a
//! [`CommandRunner`]. [`ShellRunner`] is the real implementation; tests use
//! `mocks::RecordingRunner`.

use std::fmt;
use std::io;
use std::process::{Command, ExitStatus};

/// A fully-resolved external command: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable looked up on `PATH` (e.g. `cmd.exe`).
    pub program: String,
    /// Arguments, ending with the upload script path.
    pub args: Vec<String>,
}

impl Invocation {
    /// Create an invocation.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
}

impl RunStatus {
    /// Status of a process that exited with code 0.
    pub const SUCCESS: RunStatus = RunStatus { code: Some(0) };

    /// Status of a process that exited with `code`.
    pub const fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// `true` only for exit code 0.
    pub const fn success(self) -> bool {
        matches!(self.code, Some(0))
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs an [`Invocation`] to completion.
pub trait CommandRunner {
    /// Start the command and block until it exits.
    ///
    /// `Err` means the process could not be started. A process that started
    /// and failed is reported through [`RunStatus`].
    fn run(&mut self, invocation: &Invocation) -> io::Result<RunStatus>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, invocation: &Invocation) -> io::Result<RunStatus> {
        (**self).run(invocation)
    }
}

/// Spawns the command on the host with inherited stdio.
///
/// Output of the upload script goes straight to the build log and nothing is
/// captured. There is no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<RunStatus> {
        tracing::debug!(command = %invocation, "spawning upload command");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()?;
        Ok(status.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let inv = Invocation::new("cmd.exe", vec!["/c".into(), "C:\\up.bat".into()]);
        assert_eq!(inv.to_string(), "cmd.exe /c C:\\up.bat");
    }

    #[test]
    fn only_zero_is_success() {
        assert!(RunStatus::SUCCESS.success());
        assert!(!RunStatus::exited(1).success());
        assert!(!RunStatus { code: None }.success());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let inv = Invocation::new("upload-hook-definitely-not-installed", Vec::new());
        assert!(ShellRunner.run(&inv).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn shell_runner_reports_exit_codes() {
        let ok = Invocation::new("sh", vec!["-c".into(), "exit 0".into()]);
        let failed = Invocation::new("sh", vec!["-c".into(), "exit 3".into()]);
        assert_eq!(ShellRunner.run(&ok).unwrap(), RunStatus::SUCCESS);
        assert_eq!(ShellRunner.run(&failed).unwrap(), RunStatus::exited(3));
    }
}
