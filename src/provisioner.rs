//! The [`NetworkProvisioner`] facade.
//!
//! The operations themselves live next to their result types:
//! [`scan`](NetworkProvisioner::scan) in [`crate::scan`],
//! [`status`](NetworkProvisioner::status) and
//! [`connect`](NetworkProvisioner::connect) in [`crate::connection`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::command::{CommandOutput, CommandRunner, NetshRunner};
use crate::error::ProvisionResult;
use crate::platform::Platform;

pub const SCAN_TIMEOUT: Duration = Duration::from_secs(15);
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(10);
/// Per-invocation bound for every netsh call made while connecting.
pub const CONNECT_STEP_TIMEOUT: Duration = Duration::from_secs(15);

/// Stateless facade over the OS WiFi tooling.
///
/// Each call spawns its own netsh processes and builds a fresh result, so one
/// provisioner can be shared freely between tasks.
#[derive(Debug)]
pub struct NetworkProvisioner<R = NetshRunner> {
    runner: R,
    platform: Platform,
    profile_dir: Option<PathBuf>,
}

impl NetworkProvisioner<NetshRunner> {
    /// Provisioner for the current machine.
    pub fn system() -> Self {
        Self::new(NetshRunner::new(), Platform::current())
    }
}

impl<R: CommandRunner> NetworkProvisioner<R> {
    pub fn new(runner: R, platform: Platform) -> Self {
        Self {
            runner,
            platform,
            profile_dir: None,
        }
    }

    /// Create temporary profile files in `dir` instead of the OS temp dir.
    pub fn with_profile_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profile_dir = Some(dir.into());
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub(crate) fn profile_dir(&self) -> Option<&Path> {
        self.profile_dir.as_deref()
    }

    pub(crate) async fn netsh(
        &self,
        args: &[&str],
        timeout: Duration,
    ) -> ProvisionResult<CommandOutput> {
        debug!(?args, "running netsh wlan");
        let output = self.runner.run(args, timeout).await?;
        debug!(exit_code = ?output.exit_code, "netsh finished");
        Ok(output)
    }
}
