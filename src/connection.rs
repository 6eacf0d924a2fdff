//! Connection status and joining networks.
//!
//! [`NetworkProvisioner::connect`] first asks netsh to join a network through
//! an already stored profile. Only when that fails and a passphrase was given
//! does it install a WPA2-Personal profile and try once more:
//!
//! ```text
//! netsh wlan connect name=<ssid>
//!   ok        -> done
//!   failed    -> netsh wlan add profile filename=<tmp.xml> interface=* user=current
//!                  "already exists" -> delete profile name=<ssid>, add once more
//!                  still failing    -> elevation hint
//!                netsh wlan connect name=<ssid>
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::command::{CommandOutput, CommandRunner};
use crate::error::{ProvisionError, ProvisionResult};
use crate::profile::WlanProfile;
use crate::provisioner::{CONNECT_STEP_TIMEOUT, NetworkProvisioner, STATUS_TIMEOUT};

lazy_static! {
    static ref SSID_LINE: Regex = Regex::new(r"(?i)SSID\s*:\s*(.+)").unwrap();
}

const UNKNOWN_NETWORK: &str = "Network not in saved list. Enter the password to add it, \
     or run the service as Administrator.";
const CONNECT_FAILED: &str = "Connection failed. Check password and try again.";

/// Current association of the WLAN adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResult {
    /// Set only while `connected` is true.
    pub connected_ssid: Option<String>,
    pub connected: bool,
    pub error: Option<String>,
}

impl StatusResult {
    pub fn disconnected() -> Self {
        Self::default()
    }
}

/// Outcome of a connect attempt. `error` is set exactly when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectResult {
    pub success: bool,
    pub error: Option<String>,
    pub ssid: String,
}

impl ConnectResult {
    pub fn connected(ssid: impl Into<String>) -> Self {
        Self {
            success: true,
            error: None,
            ssid: ssid.into(),
        }
    }

    pub fn failed(ssid: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ssid: ssid.into(),
        }
    }
}

impl<R: CommandRunner> NetworkProvisioner<R> {
    /// Report which network, if any, the adapter is connected to.
    ///
    /// Any failure reads as "not connected" so the UI always gets a usable answer.
    pub async fn status(&self) -> StatusResult {
        if !self.platform().has_netsh() {
            return StatusResult::disconnected();
        }

        match self.netsh(&["show", "interfaces"], STATUS_TIMEOUT).await {
            Ok(output) if output.success() => parse_status(&output.stdout),
            Ok(output) => {
                debug!(exit_code = ?output.exit_code, "netsh status exited with an error");
                StatusResult::disconnected()
            }
            Err(err) => {
                warn!(%err, "WiFi status query failed");
                StatusResult::disconnected()
            }
        }
    }

    /// Join `ssid`, installing a WPA2-Personal profile from `password` when
    /// the network is not yet known to the OS.
    ///
    /// Never fails: problems are reported in [`ConnectResult::error`].
    pub async fn connect(&self, ssid: &str, password: Option<&str>) -> ConnectResult {
        let ssid = ssid.trim();
        let password = password.map(str::trim).filter(|p| !p.is_empty());

        match self.try_connect(ssid, password).await {
            Ok(()) => {
                info!(ssid, "connected to WiFi network");
                ConnectResult::connected(ssid)
            }
            Err(err) => {
                warn!(ssid, %err, "WiFi connect failed");
                ConnectResult::failed(ssid, err.connect_message())
            }
        }
    }

    async fn try_connect(&self, ssid: &str, password: Option<&str>) -> ProvisionResult<()> {
        if ssid.is_empty() {
            return Err(ProvisionError::InvalidInput("SSID is required.".to_string()));
        }
        if !self.platform().has_netsh() {
            return Err(ProvisionError::UnsupportedPlatform("connect"));
        }

        let direct = self.connect_known(ssid).await?;
        if direct.success() {
            return Ok(());
        }

        let Some(password) = password else {
            return Err(ProvisionError::CommandFailed(direct.error_or(UNKNOWN_NETWORK)));
        };

        debug!(ssid, "no usable stored profile, provisioning one");
        self.install_profile(&WlanProfile::wpa2_personal(ssid, password))
            .await?;

        let retry = self.connect_known(ssid).await?;
        if retry.success() {
            Ok(())
        } else {
            Err(ProvisionError::CommandFailed(retry.error_or(CONNECT_FAILED)))
        }
    }

    async fn connect_known(&self, ssid: &str) -> ProvisionResult<CommandOutput> {
        let name = format!("name={ssid}");
        self.netsh(&["connect", &name], CONNECT_STEP_TIMEOUT).await
    }

    /// Add `profile` for all interfaces, replacing a stored one of the same
    /// name once. The temp file is gone when this returns.
    async fn install_profile(&self, profile: &WlanProfile) -> ProvisionResult<()> {
        let file = profile.write_temp(self.profile_dir())?;
        let filename = format!("filename={}", file.display());
        let add = ["add", "profile", filename.as_str(), "interface=*", "user=current"];

        let mut added = self.netsh(&add, CONNECT_STEP_TIMEOUT).await?;
        if !added.success() && is_conflict(&added) {
            debug!(error = %ProvisionError::ProfileAddConflict, "replacing stored profile");
            let name = format!("name={}", profile.name);
            self.netsh(&["delete", "profile", &name], CONNECT_STEP_TIMEOUT)
                .await?;
            added = self.netsh(&add, CONNECT_STEP_TIMEOUT).await?;
        }

        if added.success() {
            Ok(())
        } else {
            warn!(error = %added.error_or("no output"), "netsh refused the profile");
            Err(ProvisionError::ProfileAddFailed)
        }
    }
}

// TODO: English-only; switch to a locale-independent signal once netsh exposes one.
fn is_conflict(output: &CommandOutput) -> bool {
    let needle = "already exists";
    output.stderr.to_lowercase().contains(needle) || output.stdout.to_lowercase().contains(needle)
}

/// Parse `netsh wlan show interfaces` output.
///
/// `connected` holds only when the state reads exactly `connected` and an
/// SSID line was found.
pub fn parse_status(output: &str) -> StatusResult {
    let mut ssid = None;
    let mut state = None;

    for line in output.lines() {
        let line = line.trim();
        if line.starts_with("SSID") {
            if let Some(caps) = SSID_LINE.captures(line) {
                let name = caps[1].trim();
                if !name.is_empty() {
                    ssid = Some(name.to_string());
                }
            }
        }
        if line.contains("State") {
            if let Some((_, value)) = line.split_once(':') {
                state = Some(value.trim().to_lowercase());
            }
        }
    }

    let connected = state.as_deref() == Some("connected") && ssid.is_some();
    StatusResult {
        connected_ssid: if connected { ssid } else { None },
        connected,
        error: None,
    }
}

/// Print a status report for the CLI.
pub fn display_status(status: &StatusResult) {
    match &status.connected_ssid {
        Some(ssid) if status.connected => println!("Connected: {}", ssid),
        _ => println!("Connected: (none)"),
    }

    if let Some(error) = &status.error {
        println!("Error:     {}", error);
    }
}
