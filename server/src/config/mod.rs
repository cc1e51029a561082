//! Process configuration: deployment addresses and runtime settings

pub mod contracts;
pub mod settings;

pub use contracts::{ContractEndpoint, DeploymentConfig, NetworkConfig};
pub use settings::AppConfig;
