//! WiFi network scanning.
//!
//! Runs `netsh wlan show networks` and collects the SSIDs it reports.
//!
//! # Example
//!
//! ```no_run
//! use wifi_provisioner::NetworkProvisioner;
//! use wifi_provisioner::scan::display_networks;
//!
//! # async fn demo() {
//! let provisioner = NetworkProvisioner::system();
//! let result = provisioner.scan().await;
//! display_networks(&result);
//! # }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::command::CommandRunner;
use crate::error::ProvisionError;
use crate::provisioner::{NetworkProvisioner, SCAN_TIMEOUT};

/// Visible networks, or the reason none could be listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Unique SSIDs in order of first appearance.
    pub networks: Vec<String>,
    pub error: Option<String>,
}

impl ScanResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            networks: Vec::new(),
            error: Some(error.into()),
        }
    }
}

impl<R: CommandRunner> NetworkProvisioner<R> {
    /// List the networks currently visible to the WLAN adapter.
    ///
    /// Never fails: problems are reported in [`ScanResult::error`].
    pub async fn scan(&self) -> ScanResult {
        if !self.platform().has_netsh() {
            return ScanResult::failed(ProvisionError::UnsupportedPlatform("scan").to_string());
        }

        let output = match self.netsh(&["show", "networks"], SCAN_TIMEOUT).await {
            Ok(output) => output,
            Err(err) => {
                warn!(%err, "WiFi scan failed");
                return ScanResult::failed(err.scan_message());
            }
        };

        if !output.success() {
            warn!(exit_code = ?output.exit_code, "netsh scan exited with an error");
            return ScanResult::failed(output.error_or("Failed to scan networks."));
        }

        let networks = parse_networks(&output.stdout);
        debug!(count = networks.len(), "scan complete");
        ScanResult {
            networks,
            error: None,
        }
    }
}

/// Extract SSIDs from `netsh wlan show networks` output.
///
/// Every line holding both `SSID` and `:` contributes the trimmed text after
/// the first colon. Empty names and repeats are skipped.
pub fn parse_networks(output: &str) -> Vec<String> {
    let mut networks = Vec::new();
    let mut seen = HashSet::new();

    for line in output.lines() {
        if !line.contains("SSID") {
            continue;
        }
        let Some((_, name)) = line.split_once(':') else {
            continue;
        };

        let name = name.trim();
        if !name.is_empty() && seen.insert(name.to_string()) {
            networks.push(name.to_string());
        }
    }

    networks
}

/// Print scan results for the CLI.
pub fn display_networks(result: &ScanResult) {
    if let Some(error) = &result.error {
        println!("Scan failed: {}", error);
        return;
    }

    if result.networks.is_empty() {
        println!("No networks found.");
        return;
    }

    println!("{:<4} {}", "#", "SSID");
    println!("{}", "-".repeat(40));
    for (index, ssid) in result.networks.iter().enumerate() {
        println!("{:<4} {}", index + 1, ssid);
    }
}
