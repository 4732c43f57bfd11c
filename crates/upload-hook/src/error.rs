//! Error type shared by every layer of the dispatcher.

use std::path::PathBuf;

use thiserror_no_std::Error;

use crate::family::Family;

/// Failures surfaced by configuration loading and dispatch.
///
/// An unrecognized platform is not an error: the dispatcher reports it as
/// [`crate::DispatchOutcome::Skipped`].
#[derive(Debug, Error)]
pub enum HookError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`crate::UploadConfig`].
    #[error("invalid upload config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Writing the `bin file:` line to the caller's output failed.
    #[error("failed to write build output: {0}")]
    Output(#[source] std::io::Error),

    /// The host shell could not be started at all.
    #[error("failed to spawn `{program}` for {family}: {source}")]
    Spawn {
        /// Target family whose script was being run.
        family: Family,
        /// Program handed to the OS.
        program: String,
        /// Underlying spawn failure.
        #[source]
        source: std::io::Error,
    },

    /// The upload script ran and exited unsuccessfully.
    #[error("{family} upload script {} failed ({})", .script.display(), describe_code(.code.as_ref()))]
    UploadFailed {
        /// Target family whose script was run.
        family: Family,
        /// Script path passed to the shell.
        script: PathBuf,
        /// Exit code, `None` when the child was killed by a signal.
        code: Option<i32>,
    },
}

fn describe_code(code: Option<&i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_failed_message_includes_exit_code() {
        let err = HookError::UploadFailed {
            family: Family::Esp32,
            script: PathBuf::from("esp32.bat"),
            code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "esp32 upload script esp32.bat failed (exit code 2)"
        );
    }

    #[test]
    fn upload_failed_without_code_mentions_signal() {
        let err = HookError::UploadFailed {
            family: Family::Esp8266,
            script: PathBuf::from("esp8266.bat"),
            code: None,
        };
        assert!(err.to_string().ends_with("(terminated by signal)"));
    }
}
