//! WPA2-Personal WLAN profile documents for `netsh wlan add profile`.
//!
//! The document is built from typed structs and serialized with quick-xml, so
//! SSIDs and passphrases are always escaped and never spliced into markup by
//! hand.

use std::io::Write;
use std::path::Path;

use quick_xml::se::{QuoteLevel, Serializer};
use serde::{Deserialize, Serialize};
use tempfile::{Builder, TempPath};

use crate::error::{ProvisionError, ProvisionResult};

const PROFILE_NAMESPACE: &str = "http://www.microsoft.com/networking/WLAN/profile/v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "WLANProfile", rename_all = "camelCase")]
pub struct WlanProfile {
    #[serde(rename = "@xmlns", default = "default_namespace")]
    xmlns: String,
    pub name: String,
    #[serde(rename = "SSIDConfig")]
    pub ssid_config: SsidConfig,
    pub connection_type: String,
    pub connection_mode: String,
    #[serde(rename = "MSM")]
    pub msm: Msm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsidConfig {
    #[serde(rename = "SSID")]
    pub ssid: SsidName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsidName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Msm {
    pub security: Security,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub auth_encryption: AuthEncryption,
    pub shared_key: SharedKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthEncryption {
    pub authentication: String,
    pub encryption: String,
    pub use_one_x: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedKey {
    pub key_type: String,
    pub protected: bool,
    pub key_material: String,
}

fn default_namespace() -> String {
    PROFILE_NAMESPACE.to_string()
}

impl WlanProfile {
    /// Auto-connecting WPA2-PSK/AES profile named after its SSID.
    pub fn wpa2_personal(ssid: &str, passphrase: &str) -> Self {
        Self {
            xmlns: default_namespace(),
            name: ssid.to_string(),
            ssid_config: SsidConfig {
                ssid: SsidName {
                    name: ssid.to_string(),
                },
            },
            connection_type: "ESS".to_string(),
            connection_mode: "auto".to_string(),
            msm: Msm {
                security: Security {
                    auth_encryption: AuthEncryption {
                        authentication: "WPA2PSK".to_string(),
                        encryption: "AES".to_string(),
                        use_one_x: false,
                    },
                    shared_key: SharedKey {
                        key_type: "passPhrase".to_string(),
                        protected: false,
                        key_material: passphrase.to_string(),
                    },
                },
            },
        }
    }

    pub fn ssid(&self) -> &str {
        &self.ssid_config.ssid.name
    }

    pub fn passphrase(&self) -> &str {
        &self.msm.security.shared_key.key_material
    }

    /// Render the profile as an XML document.
    ///
    /// All five reserved characters (`& < > " '`) are escaped in text content.
    pub fn to_xml(&self) -> ProvisionResult<String> {
        let mut body = String::new();
        let mut serializer = Serializer::new(&mut body);
        serializer.set_quote_level(QuoteLevel::Full);
        serializer.indent(' ', 2);
        self.serialize(serializer)
            .map_err(|e| ProvisionError::Profile(e.to_string()))?;

        Ok(format!("<?xml version=\"1.0\"?>\n{}", body.trim_start()))
    }

    pub fn from_xml(xml: &str) -> ProvisionResult<Self> {
        quick_xml::de::from_str(xml).map_err(|e| ProvisionError::Profile(e.to_string()))
    }

    /// Write the document to a fresh `.xml` temp file.
    ///
    /// The file is removed when the returned [`TempPath`] is dropped, on every
    /// exit path of the caller.
    pub fn write_temp(&self, dir: Option<&Path>) -> ProvisionResult<TempPath> {
        let xml = self.to_xml()?;

        let mut builder = Builder::new();
        builder.prefix("wlan-profile-").suffix(".xml");
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(xml.as_bytes())?;
        file.flush()?;

        // Close our handle so netsh can open the file; the path still owns deletion.
        Ok(file.into_temp_path())
    }
}
