//! Defines the top level configuration for the client host.

use std::collections::BTreeSet;

use epoch_light_client::types::client_type::ClientType;

use crate::HostError;

/// The default number of epochs a single update may advance
pub const DEFAULT_MAX_EPOCH_HEADERS: u64 = 16;

/// The top level configuration for the client host.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct HostConfig {
    /// The configuration for the supported client types.
    pub clients: Vec<ClientModuleConfig>,
}

/// The configuration for a client type.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct ClientModuleConfig {
    /// The client type.
    pub client_type: ClientType,
    /// The maximum number of epoch headers accepted in a single header.
    #[serde(default = "default_max_epoch_headers")]
    pub max_epoch_headers: u64,
    /// Whether the client type is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Returns true, used as a default value for boolean fields.
const fn default_true() -> bool {
    true
}

const fn default_max_epoch_headers() -> u64 {
    DEFAULT_MAX_EPOCH_HEADERS
}

impl HostConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the configuration is invalid
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every client type appears once and accepts at least one epoch header.
    ///
    /// # Errors
    /// Returns [`HostError::InvalidConfig`] describing the first problem found
    pub fn validate(&self) -> Result<(), HostError> {
        let mut seen = BTreeSet::new();
        for client in &self.clients {
            if !seen.insert(client.client_type) {
                return Err(HostError::InvalidConfig(format!(
                    "client type {} is configured more than once",
                    client.client_type
                )));
            }
            if client.max_epoch_headers == 0 {
                return Err(HostError::InvalidConfig(format!(
                    "max_epoch_headers of {} must be greater than zero",
                    client.client_type
                )));
            }
        }
        Ok(())
    }

    /// The enabled client configurations.
    pub fn enabled_clients(&self) -> impl Iterator<Item = &ClientModuleConfig> {
        self.clients.iter().filter(|client| client.enabled)
    }
}
