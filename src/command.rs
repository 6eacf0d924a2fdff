//! Process invocation behind the [`CommandRunner`] seam.
//!
//! The provisioner never spawns processes itself. It hands a list of
//! `netsh wlan` arguments to a runner, which makes the parsers and the
//! connect fallback testable with canned output.

use std::time::Duration;

use tokio::process::Command;
use trait_variant::make;

use crate::error::{ProvisionError, ProvisionResult};

/// Windows `CREATE_NO_WINDOW` process creation flag.
#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Captured result of one finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Error text for the caller: stderr when present, otherwise `fallback`.
    pub fn error_or(&self, fallback: &str) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            fallback.to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Runs one `netsh wlan` invocation and waits for it with a hard timeout.
#[make(Send)]
pub trait CommandRunner: Send + Sync + 'static {
    /// Run with `args` appended after `netsh wlan`.
    ///
    /// Returns [`ProvisionError::CommandTimeout`] when `timeout` elapses and
    /// [`ProvisionError::Process`] when the process cannot be started. A
    /// nonzero exit is not an error at this level.
    async fn run(&self, args: &[&str], timeout: Duration) -> ProvisionResult<CommandOutput>;
}

/// Real runner backed by `netsh.exe`.
#[derive(Debug, Clone)]
pub struct NetshRunner {
    program: String,
}

impl NetshRunner {
    pub fn new() -> Self {
        Self {
            program: "netsh".to_string(),
        }
    }
}

impl Default for NetshRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for NetshRunner {
    async fn run(&self, args: &[&str], timeout: Duration) -> ProvisionResult<CommandOutput> {
        let mut command = Command::new(&self.program);
        command.arg("wlan").args(args).kill_on_drop(true);

        #[cfg(target_os = "windows")]
        command.creation_flags(CREATE_NO_WINDOW);

        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| ProvisionError::CommandTimeout)?
            .map_err(|e| ProvisionError::Process(format!("Failed to execute netsh: {e}")))?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: decode(&output.stdout),
            stderr: decode(&output.stderr),
        })
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exit_zero_is_success() {
        let ok = CommandOutput {
            exit_code: Some(0),
            ..Default::default()
        };
        let failed = CommandOutput {
            exit_code: Some(1),
            ..Default::default()
        };
        let killed = CommandOutput::default();

        assert!(ok.success());
        assert!(!failed.success());
        assert!(!killed.success());
    }

    #[test]
    fn error_text_prefers_stderr() {
        let out = CommandOutput {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: "  There is no profile \"Cafe\" assigned.\n".to_string(),
        };
        assert_eq!(
            out.error_or("generic"),
            "There is no profile \"Cafe\" assigned."
        );

        let silent = CommandOutput {
            exit_code: Some(1),
            ..Default::default()
        };
        assert_eq!(silent.error_or("generic"), "generic");
    }

    #[test]
    fn decode_strips_carriage_returns() {
        assert_eq!(decode(b"SSID 1 : Home\r\nSSID 2 : Cafe\r\n"), "SSID 1 : Home\nSSID 2 : Cafe\n");
    }

    #[tokio::test]
    async fn missing_program_is_a_process_error() {
        let runner = NetshRunner {
            program: "definitely-not-a-real-netsh-binary".to_string(),
        };
        let err = runner
            .run(&["show", "networks"], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::Process(_)));
    }
}
