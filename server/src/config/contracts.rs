use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::eth::{parse_address, Address};

/// One network entry of the deployment file
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub url: String,
    pub data_address: String,
    pub app_address: String,
}

/// Resolved endpoint and contract addresses for a single network
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractEndpoint {
    pub network: String,
    pub rpc_url: String,
    pub data_address: Address,
    pub app_address: Address,
}

/// Deployment file written at migration time: network name → addresses.
///
/// ```json
/// {
///   "localhost": { "url": "http://localhost:8545", "dataAddress": "0x…", "appAddress": "0x…" }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DeploymentConfig {
    pub networks: HashMap<String, NetworkConfig>,
}

impl DeploymentConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Looks up `network` and validates its addresses.
    pub fn endpoint(&self, network: &str) -> Result<ContractEndpoint, ConfigError> {
        let entry = self
            .networks
            .get(network)
            .ok_or_else(|| ConfigError::MissingNetwork(network.to_string()))?;

        let data_address =
            parse_address(&entry.data_address).ok_or_else(|| ConfigError::InvalidAddress {
                field: "dataAddress",
                value: entry.data_address.clone(),
            })?;
        let app_address =
            parse_address(&entry.app_address).ok_or_else(|| ConfigError::InvalidAddress {
                field: "appAddress",
                value: entry.app_address.clone(),
            })?;

        Ok(ContractEndpoint {
            network: network.to_string(),
            rpc_url: entry.url.clone(),
            data_address,
            app_address,
        })
    }
}
