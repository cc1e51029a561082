use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Runtime settings read from the environment once at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Deployment file produced by the contract migration
    pub deployment_path: PathBuf,
    /// Key into the deployment file
    pub network: String,
    pub cors_allowed_origins: Vec<String>,

    /// Size of the account pool considered for oracles; positions `1..oracle_count`
    /// register, position 0 is the contract owner.
    pub oracle_count: usize,
    pub oracle_gas: u64,
    pub tx_gas: u64,
    pub receipt_timeout: Duration,

    pub oracle_simulation_enabled: bool,
    pub event_poll_interval: Duration,
    /// Upper bound on blocks covered by a single `eth_getLogs` request
    pub event_block_range: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:8000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            port: parse_or(&lookup, "PORT", 3001)?,
            deployment_path: lookup("FLIGHTSURETY_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("server/config.json")),
            network: lookup("FLIGHTSURETY_NETWORK").unwrap_or_else(|| "localhost".to_string()),
            cors_allowed_origins,
            oracle_count: parse_or(&lookup, "ORACLE_COUNT", 20)?,
            oracle_gas: parse_or(&lookup, "ORACLE_GAS", 1_000_000)?,
            tx_gas: parse_or(&lookup, "TX_GAS", 3_000_000)?,
            receipt_timeout: Duration::from_secs(parse_or(&lookup, "RECEIPT_TIMEOUT_SECONDS", 60)?),
            oracle_simulation_enabled: parse_or(&lookup, "ORACLE_SIMULATION_ENABLED", true)?,
            event_poll_interval: Duration::from_millis(parse_or(
                &lookup,
                "EVENT_POLL_INTERVAL_MS",
                2_000,
            )?),
            event_block_range: parse_or::<_, u64>(&lookup, "EVENT_BLOCK_RANGE", 500)?.max(1),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_local_development() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.network, "localhost");
        assert_eq!(config.oracle_count, 20);
        assert_eq!(config.oracle_gas, 1_000_000);
        assert!(config.oracle_simulation_enabled);
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:8000"]);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("ORACLE_COUNT", "30"),
            ("ORACLE_SIMULATION_ENABLED", "false"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("EVENT_BLOCK_RANGE", "0"),
        ])
        .unwrap();
        assert_eq!(config.oracle_count, 30);
        assert!(!config.oracle_simulation_enabled);
        assert_eq!(config.cors_allowed_origins.len(), 2);
        assert_eq!(config.event_block_range, 1);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "PORT", .. }));
    }
}
