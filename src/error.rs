use thiserror::Error;

/// Result type for provisioning steps
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Hint returned when netsh refuses to install a profile.
pub const ELEVATION_HINT: &str = "Adding a new WiFi network requires Administrator rights. \
     Stop this service, open Command Prompt or PowerShell with 'Run as administrator', \
     and start wifi-provisioner again from there.";

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("WiFi {0} is only supported on Windows.")]
    UnsupportedPlatform(&'static str),

    #[error("netsh did not finish in time")]
    CommandTimeout,

    #[error("{0}")]
    CommandFailed(String),

    #[error("A profile with this name already exists")]
    ProfileAddConflict,

    #[error("{}", ELEVATION_HINT)]
    ProfileAddFailed,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Failed to prepare WLAN profile: {0}")]
    Profile(String),

    #[error("{0}")]
    Process(String),
}

impl ProvisionError {
    /// Message shown to the UI when a scan ends with this error.
    pub fn scan_message(&self) -> String {
        match self {
            ProvisionError::CommandTimeout => "Scan timed out.".to_string(),
            other => other.to_string(),
        }
    }

    /// Message shown to the UI when a connect ends with this error.
    pub fn connect_message(&self) -> String {
        match self {
            ProvisionError::CommandTimeout => "Connection timed out.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for ProvisionError {
    fn from(err: std::io::Error) -> Self {
        ProvisionError::Profile(err.to_string())
    }
}
