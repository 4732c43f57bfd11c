//! Upload command configuration.
//!
//! Resolution order, later layers win:
//!
//! 1. Built-in defaults (`cmd.exe /c` and the two desktop batch scripts)
//! 2. Optional JSON file, every field optional
//! 3. Environment variables ([`ENV_SHELL`], [`ENV_ESP8266_SCRIPT`], [`ENV_ESP32_SCRIPT`])
//!
//! ```json
//! {
//!   "shell": { "program": "cmd.exe", "args": ["/c"] },
//!   "esp8266": "C:\\tools\\esp8266_upload.bat",
//!   "esp32": "C:\\tools\\esp32_upload.bat"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::HookError;
use crate::family::Family;
use crate::runner::Invocation;

/// Overrides the shell program (arguments keep their configured value).
pub const ENV_SHELL: &str = "UPLOAD_HOOK_SHELL";
/// Overrides the ESP8266 upload script.
pub const ENV_ESP8266_SCRIPT: &str = "UPLOAD_HOOK_ESP8266_SCRIPT";
/// Overrides the ESP32 upload script.
pub const ENV_ESP32_SCRIPT: &str = "UPLOAD_HOOK_ESP32_SCRIPT";

const DEFAULT_SHELL: &str = "cmd.exe";
const DEFAULT_SHELL_ARGS: &[&str] = &["/c"];
const DEFAULT_ESP8266_SCRIPT: &str = r"C:\Users\Paul\OneDrive\Desktop\esp8266_heaptest.bat";
const DEFAULT_ESP32_SCRIPT: &str = r"C:\Users\Paul\OneDrive\Desktop\esp32_heaptest.bat";

/// Host command interpreter used to run the upload scripts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShellConfig {
    /// Interpreter executable.
    pub program: String,
    /// Arguments placed before the script path.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_SHELL.to_string(),
            args: DEFAULT_SHELL_ARGS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Where each family's upload script lives and how to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Interpreter for the scripts.
    pub shell: ShellConfig,
    /// Script run for [`Family::Esp8266`].
    pub esp8266: PathBuf,
    /// Script run for [`Family::Esp32`].
    pub esp32: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            shell: ShellConfig::default(),
            esp8266: PathBuf::from(DEFAULT_ESP8266_SCRIPT),
            esp32: PathBuf::from(DEFAULT_ESP32_SCRIPT),
        }
    }
}

/// On-disk layer; absent fields keep the value underneath.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    shell: Option<ShellConfig>,
    esp8266: Option<PathBuf>,
    esp32: Option<PathBuf>,
}

impl UploadConfig {
    /// Defaults with the JSON document merged on top.
    pub fn from_json_str(json: &str) -> Result<Self, HookError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        Ok(Self::default().merge(file))
    }

    /// Resolve defaults, then `path` (if given), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, HookError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// [`UploadConfig::load`] with an injectable environment lookup.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HookError> {
        let config = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| {
                    HookError::ConfigRead {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                tracing::debug!(path = %path.display(), "loaded upload config file");
                Self::from_json_str(&json)?
            }
            None => Self::default(),
        };
        Ok(config.apply_env(lookup))
    }

    /// Apply environment overrides through `lookup`. Empty values are ignored.
    #[must_use]
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(program) = get(ENV_SHELL) {
            self.shell.program = program;
        }
        if let Some(script) = get(ENV_ESP8266_SCRIPT) {
            self.esp8266 = PathBuf::from(script);
        }
        if let Some(script) = get(ENV_ESP32_SCRIPT) {
            self.esp32 = PathBuf::from(script);
        }
        self
    }

    /// Upload script for `family`.
    pub fn script_for(&self, family: Family) -> &Path {
        match family {
            Family::Esp8266 => &self.esp8266,
            Family::Esp32 => &self.esp32,
        }
    }

    /// `shell.program shell.args... <script>`, nothing else.
    pub fn invocation_for(&self, family: Family) -> Invocation {
        let mut args = self.shell.args.clone();
        args.push(self.script_for(family).to_string_lossy().into_owned());
        Invocation::new(self.shell.program.clone(), args)
    }

    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(shell) = file.shell {
            self.shell = shell;
        }
        if let Some(script) = file.esp8266 {
            self.esp8266 = script;
        }
        if let Some(script) = file.esp32 {
            self.esp32 = script;
        }
        self
    }
}
