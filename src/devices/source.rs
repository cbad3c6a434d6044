//! Device sources backed by an external command or a JSON file.

use crate::devices::{data::DeviceRecord, traits::DeviceSource};
use crate::error::{ForwardError, Result};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

/// Program run by [`CommandSource::default`].
pub const DEFAULT_SOURCE_PROGRAM: &str = "python3.8";

/// Arguments passed to [`DEFAULT_SOURCE_PROGRAM`].
pub const DEFAULT_SOURCE_ARGS: [&str; 2] = ["sample.py", "devices"];

/// Runs a router client command and parses its stdout as a JSON device list.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl Default for CommandSource {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_PROGRAM, DEFAULT_SOURCE_ARGS)
    }
}

impl CommandSource {
    /// Create a source that runs `program` with `args`.
    pub fn new<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The full command line, for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl DeviceSource for CommandSource {
    async fn fetch_devices(&self) -> Result<Vec<DeviceRecord>> {
        info!(command = %self.command_line(), "Getting devices");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| {
                ForwardError::source_error(format!("failed to run `{}`: {}", self.command_line(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ForwardError::source_error(format!(
                "`{}` exited with {}: {}",
                self.command_line(),
                output.status,
                stderr.trim()
            )));
        }

        debug!(bytes = output.stdout.len(), "Parsing results");
        let devices: Vec<DeviceRecord> = serde_json::from_slice(&output.stdout)?;
        info!(count = devices.len(), "Fetched devices");
        Ok(devices)
    }
}

/// Reads a previously captured device list from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DeviceSource for FileSource {
    async fn fetch_devices(&self) -> Result<Vec<DeviceRecord>> {
        info!(path = %self.path.display(), "Reading devices from file");
        let content = tokio::fs::read(&self.path).await?;
        let devices: Vec<DeviceRecord> = serde_json::from_slice(&content)?;
        info!(count = devices.len(), "Fetched devices");
        Ok(devices)
    }
}
