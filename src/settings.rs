use crate::error::SettingsError;
use crate::validator_client::DEFAULT_VALIDATOR_URL;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Tool settings, read from an optional TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub validator_url: String,
    pub request_timeout_secs: u64,
    /// Prefix of the downloaded file name
    pub product_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            validator_url: DEFAULT_VALIDATOR_URL.to_string(),
            request_timeout_secs: 30,
            product_name: "openapi".to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&text).map_err(|source| SettingsError::Invalid {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
