/// Operating system capability the provisioner runs against.
///
/// Only Windows ships the `netsh wlan` tooling. Every other platform gets the
/// safe no-op answers, without spawning anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unsupported,
}

impl Platform {
    /// Detect the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Unsupported
        }
    }

    pub fn has_netsh(self) -> bool {
        self == Platform::Windows
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}
