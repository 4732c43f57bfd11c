//! Post-build upload dispatcher for ESP firmware builds.
//!
//! The build system produces `$BUILD_DIR/${PROGNAME}.bin` and then hands
//! control to this crate. The platform identifier from the build
//! configuration (`espressif8266`, `espressif32`, ...) is normalized to a bare
//! family name and exactly one upload script is run through the host command
//! interpreter. When the build runs under WSL2 this is `cmd.exe /c <script>`,
//! because the serial ports are only reachable from the Windows side.
//!
//! # Layers
//!
//! ```text
//! build system (PlatformIO post action, Makefile, ...)
//!         ↓
//! pio-upload binary (cli crate)
//!         ↓
//! Dispatcher (this crate) ── UploadConfig
//!         ↓
//! CommandRunner ── ShellRunner (std::process) / RecordingRunner (tests)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use upload_hook::{Dispatcher, PostBuildContext, ShellRunner, UploadConfig};
//!
//! let config = UploadConfig::load(None)?;
//! let mut dispatcher = Dispatcher::new(config, ShellRunner);
//! let ctx = PostBuildContext::new(".pio/build/esp32/firmware.bin", "espressif32");
//! dispatcher.on_artifact(&ctx, &mut std::io::stdout())?;
//! # Ok::<(), upload_hook::HookError>(())
//! ```
//!
//! # Features
//!
//! - `mocks`: export `mocks::RecordingRunner` for downstream tests

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // output goes through the caller's writer or tracing
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod family;
pub mod hook;
pub mod mocks;
pub mod runner;

pub use config::{ShellConfig, UploadConfig};
pub use error::HookError;
pub use family::{normalize_platform, Family};
pub use hook::{artifact_path, DispatchOutcome, Dispatcher, PostBuildContext};
pub use runner::{CommandRunner, Invocation, RunStatus, ShellRunner};
