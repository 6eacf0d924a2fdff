//! WiFi provisioning backend for the writing assistant.
//!
//! This library scans for WiFi networks, reports the current connection and
//! joins networks by driving Windows' `netsh wlan` tooling. On any other
//! platform every operation returns a safe, well-formed answer without
//! spawning a process.
//!
//! # Modules
//!
//! - [`command`] - `netsh` invocation behind the [`CommandRunner`] trait
//! - [`config`] - Configuration file with server settings and saved networks
//! - [`connection`] - Connection status and the connect-or-provision workflow
//! - [`error`] - Error taxonomy used inside the provisioner
//! - [`platform`] - Platform capability detection
//! - [`profile`] - WPA2-Personal WLAN profile XML documents
//! - [`provisioner`] - The [`NetworkProvisioner`] facade
//! - [`scan`] - Network scanning
//! - [`server`] - HTTP API for the editor UI
//!
//! # Example Usage
//!
//! ```no_run
//! use wifi_provisioner::NetworkProvisioner;
//!
//! # async fn demo() {
//! let provisioner = NetworkProvisioner::system();
//!
//! let scan = provisioner.scan().await;
//! println!("Visible: {:?}", scan.networks);
//!
//! let result = provisioner.connect("HomeNet", Some("hunter22")).await;
//! if let Some(error) = result.error {
//!     eprintln!("Connect failed: {}", error);
//! }
//! # }
//! ```

pub mod command;
pub mod config;
pub mod connection;
pub mod error;
pub mod platform;
pub mod profile;
pub mod provisioner;
pub mod scan;
pub mod server;

#[cfg(test)]
pub mod mock_runner;

pub use command::{CommandOutput, CommandRunner, NetshRunner};
pub use connection::{ConnectResult, StatusResult};
pub use error::{ProvisionError, ProvisionResult};
pub use platform::Platform;
pub use profile::WlanProfile;
pub use provisioner::NetworkProvisioner;
pub use scan::ScanResult;
