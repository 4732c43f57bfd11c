use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use upload_hook::{
    artifact_path, CommandRunner, DispatchOutcome, Dispatcher, HookError, PostBuildContext,
    ShellRunner, UploadConfig,
};

/// Explicit artifact wins; otherwise `$BUILD_DIR/${PROGNAME}.bin`.
pub fn resolve_artifact(
    artifact: Option<PathBuf>,
    build_dir: Option<PathBuf>,
    progname: &str,
) -> Result<PathBuf> {
    match (artifact, build_dir) {
        (Some(artifact), _) => Ok(artifact),
        (None, Some(build_dir)) => Ok(artifact_path(&build_dir, progname)),
        (None, None) => anyhow::bail!("either ARTIFACT or --build-dir is required"),
    }
}

pub fn run(artifact: PathBuf, platform: String, config: Option<&Path>) -> Result<()> {
    let config = UploadConfig::load(config).context("Failed to load upload config")?;
    let mut dispatcher = Dispatcher::new(config, ShellRunner);
    let stdout = std::io::stdout();
    run_with(
        &mut dispatcher,
        &PostBuildContext::new(artifact, platform),
        &mut stdout.lock(),
    )
}

pub(crate) fn run_with<R: CommandRunner, W: Write>(
    dispatcher: &mut Dispatcher<R>,
    ctx: &PostBuildContext,
    out: &mut W,
) -> Result<()> {
    let start = Instant::now();

    match dispatcher.on_artifact(ctx, out) {
        Ok(DispatchOutcome::Uploaded { family, .. }) => {
            writeln!(
                out,
                "{}",
                format!(
                    "✓ {} upload finished in {:.2}s",
                    family,
                    start.elapsed().as_secs_f64()
                )
                .green()
            )?;
            Ok(())
        }
        // No script for this platform; stay quiet.
        Ok(DispatchOutcome::Skipped { .. }) => Ok(()),
        Err(err) => {
            // The error itself is printed once, by main's anyhow report.
            if let Some(banner) = failure_banner(&err) {
                eprintln!("{}", banner.red().bold());
            }
            match err {
                HookError::UploadFailed { .. } => Err(err)
                    .context("Upload failed - check that the board is connected to the host"),
                HookError::Spawn { .. } => {
                    Err(err).context("Is the host shell reachable from this environment?")
                }
                _ => Err(err.into()),
            }
        }
    }
}

fn failure_banner(err: &HookError) -> Option<&'static str> {
    match err {
        HookError::UploadFailed { .. } => Some("✗ Upload failed"),
        HookError::Spawn { .. } => Some("✗ Could not start the upload script"),
        _ => None,
    }
}
