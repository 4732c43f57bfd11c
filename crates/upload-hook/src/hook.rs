//! Post-build dispatcher.
//!
//! One call per finished artifact: print the artifact path, pick the family
//! from the platform identifier, run that family's upload script. Platforms
//! without a script are skipped without any output.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::UploadConfig;
use crate::error::HookError;
use crate::family::{normalize_platform, Family};
use crate::runner::{CommandRunner, RunStatus};

/// Extension of the firmware image the hook runs after.
pub const ARTIFACT_EXTENSION: &str = "bin";

/// Build metadata handed to the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBuildContext {
    /// Path of the finished firmware image. Printed, never opened.
    pub artifact: PathBuf,
    /// Raw platform identifier from the build configuration (`PIOPLATFORM`).
    pub platform: String,
}

impl PostBuildContext {
    /// Create a context.
    pub fn new(artifact: impl Into<PathBuf>, platform: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            platform: platform.into(),
        }
    }
}

/// `$BUILD_DIR/${PROGNAME}.bin`
pub fn artifact_path(build_dir: &Path, progname: &str) -> PathBuf {
    build_dir.join(format!("{progname}.{ARTIFACT_EXTENSION}"))
}

/// What the dispatcher did for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The family's script ran and exited successfully.
    Uploaded {
        /// Family whose script ran.
        family: Family,
        /// Exit status of the script.
        status: RunStatus,
    },
    /// No script for this platform; nothing ran.
    Skipped {
        /// Normalized platform name.
        platform: String,
    },
}

/// Runs the upload script matching a build's platform.
#[derive(Debug)]
pub struct Dispatcher<R> {
    config: UploadConfig,
    runner: R,
}

impl<R: CommandRunner> Dispatcher<R> {
    /// Create a dispatcher.
    pub fn new(config: UploadConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Resolved configuration.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Borrow the runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Consume the dispatcher and return the runner.
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Handle one finished artifact.
    ///
    /// Writes `bin file: <artifact>` to `out` exactly once, before anything
    /// else. At most one command is run.
    pub fn on_artifact<W: Write>(
        &mut self,
        ctx: &PostBuildContext,
        out: &mut W,
    ) -> Result<DispatchOutcome, HookError> {
        writeln!(out, "bin file: {}", ctx.artifact.display()).map_err(HookError::Output)?;

        let platform = normalize_platform(&ctx.platform);
        let Some(family) = Family::from_normalized(&platform) else {
            tracing::debug!(%platform, "no upload script for platform, skipping");
            return Ok(DispatchOutcome::Skipped {
                platform: platform.into_owned(),
            });
        };

        let invocation = self.config.invocation_for(family);
        tracing::info!(%family, command = %invocation, "running upload script");

        let status = self
            .runner
            .run(&invocation)
            .map_err(|source| HookError::Spawn {
                family,
                program: invocation.program.clone(),
                source,
            })?;

        if !status.success() {
            tracing::warn!(%family, code = ?status.code, "upload script failed");
            return Err(HookError::UploadFailed {
                family,
                script: self.config.script_for(family).to_path_buf(),
                code: status.code,
            });
        }

        Ok(DispatchOutcome::Uploaded { family, status })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::mocks::RecordingRunner;

    type Dispatched = (Result<DispatchOutcome, HookError>, String, RecordingRunner);

    fn dispatch(platform: &str, runner: RecordingRunner) -> Dispatched {
        let mut dispatcher = Dispatcher::new(UploadConfig::default(), runner);
        let ctx = PostBuildContext::new(".pio/build/dev/firmware.bin", platform);
        let mut out = Vec::new();
        let result = dispatcher.on_artifact(&ctx, &mut out);
        (result, String::from_utf8(out).unwrap(), dispatcher.into_runner())
    }

    #[test]
    fn artifact_path_joins_progname_with_bin_extension() {
        assert_eq!(
            artifact_path(Path::new(".pio/build/esp32dev"), "firmware"),
            PathBuf::from(".pio/build/esp32dev/firmware.bin")
        );
    }

    #[test]
    fn esp8266_runs_command_a_only() {
        let (result, _, runner) = dispatch("espressif8266", RecordingRunner::new());
        assert_eq!(
            result.unwrap(),
            DispatchOutcome::Uploaded {
                family: Family::Esp8266,
                status: RunStatus::SUCCESS
            }
        );
        assert_eq!(runner.calls(), [UploadConfig::default().invocation_for(Family::Esp8266)]);
    }

    #[test]
    fn esp32_runs_command_b_only() {
        let (result, _, runner) = dispatch("espressif32", RecordingRunner::new());
        assert!(matches!(
            result.unwrap(),
            DispatchOutcome::Uploaded { family: Family::Esp32, .. }
        ));
        assert_eq!(runner.calls(), [UploadConfig::default().invocation_for(Family::Esp32)]);
    }

    #[test]
    fn unknown_platform_is_a_silent_no_op() {
        let (result, out, runner) = dispatch("unknown", RecordingRunner::new());
        assert_eq!(
            result.unwrap(),
            DispatchOutcome::Skipped {
                platform: "unknown".to_string()
            }
        );
        assert_eq!(runner.call_count(), 0);
        assert_eq!(out, "bin file: .pio/build/dev/firmware.bin\n");
    }

    #[test]
    fn artifact_is_printed_once_per_outcome() {
        for platform in ["espressif8266", "espressif32", "unknown"] {
            let (_, out, _) = dispatch(platform, RecordingRunner::new());
            assert_eq!(out.matches("bin file: ").count(), 1, "{platform}");
        }
    }

    #[test]
    fn non_zero_exit_is_reported() {
        let (result, out, runner) = dispatch("espressif32", RecordingRunner::exiting_with(1));
        match result.unwrap_err() {
            HookError::UploadFailed { family, code, .. } => {
                assert_eq!(family, Family::Esp32);
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.call_count(), 1);
        assert_eq!(out.matches("bin file: ").count(), 1);
    }

    #[test]
    fn spawn_failure_is_reported() {
        let runner = RecordingRunner::failing_to_spawn(std::io::ErrorKind::NotFound);
        let (result, _, _) = dispatch("espressif8266", runner);
        assert!(matches!(
            result.unwrap_err(),
            HookError::Spawn { family: Family::Esp8266, ref program, .. } if program == "cmd.exe"
        ));
    }
}
