//! Error types shared by the gateway, the oracle simulator and the HTTP layer

use axum::http::StatusCode;
use thiserror::Error;

use crate::eth::abi::AbiError;

/// Failures while loading or resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("network `{0}` is not present in the deployment config")]
    MissingNetwork(String),

    #[error("invalid address for `{field}`: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Failures surfaced by any call through the contract gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),

    #[error("transaction reverted: {0}")]
    Reverted(String),

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no {0} account available on the node")]
    NoAccount(&'static str),

    #[error("failed to decode contract data: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Classifies a JSON-RPC error object returned by the node.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();

        if lowered.contains("insufficient funds") {
            GatewayError::InsufficientFunds(message)
        } else if lowered.contains("revert") || lowered.contains("invalid opcode") {
            GatewayError::Reverted(message)
        } else {
            GatewayError::Rpc { code, message }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::InsufficientFunds(_) => StatusCode::PAYMENT_REQUIRED,
            GatewayError::Reverted(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::Network(_) | GatewayError::Rpc { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Config(_) | GatewayError::NoAccount(_) | GatewayError::Decode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Network(err.to_string())
    }
}

impl From<AbiError> for GatewayError {
    fn from(err: AbiError) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_ganache_revert() {
        let err = GatewayError::from_rpc(
            -32000,
            "VM Exception while processing transaction: revert Airline is not funded",
        );
        assert!(matches!(err, GatewayError::Reverted(_)));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn classifies_insufficient_funds() {
        let err = GatewayError::from_rpc(
            -32000,
            "sender doesn't have enough funds: insufficient funds for gas * price + value",
        );
        assert!(matches!(err, GatewayError::InsufficientFunds(_)));
    }

    #[test]
    fn unknown_rpc_errors_keep_their_code() {
        match GatewayError::from_rpc(-32601, "method not found") {
            GatewayError::Rpc { code, .. } => assert_eq!(code, -32601),
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
