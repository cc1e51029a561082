use async_trait::async_trait;

use crate::error::GatewayError;
use crate::eth::{Address, TxReceipt, U256};
use crate::gateway::FlightSuretyGateway;
use crate::models::{ContractEvent, OracleResponse};

/// The slice of the contract the oracle simulator talks to
#[async_trait]
pub trait OracleContract: Send + Sync {
    async fn accounts(&self) -> Result<Vec<Address>, GatewayError>;

    async fn registration_fee(&self) -> Result<U256, GatewayError>;

    async fn register_oracle(&self, oracle: Address, fee: U256) -> Result<TxReceipt, GatewayError>;

    async fn get_my_indexes(&self, oracle: Address) -> Result<[u8; 3], GatewayError>;

    async fn submit_oracle_response(
        &self,
        oracle: Address,
        response: &OracleResponse,
    ) -> Result<TxReceipt, GatewayError>;

    async fn latest_block(&self) -> Result<u64, GatewayError>;

    async fn contract_events(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ContractEvent>, GatewayError>;
}

#[async_trait]
impl OracleContract for FlightSuretyGateway {
    async fn accounts(&self) -> Result<Vec<Address>, GatewayError> {
        FlightSuretyGateway::accounts(self).await
    }

    async fn registration_fee(&self) -> Result<U256, GatewayError> {
        FlightSuretyGateway::registration_fee(self).await
    }

    async fn register_oracle(&self, oracle: Address, fee: U256) -> Result<TxReceipt, GatewayError> {
        FlightSuretyGateway::register_oracle(self, oracle, fee).await
    }

    async fn get_my_indexes(&self, oracle: Address) -> Result<[u8; 3], GatewayError> {
        FlightSuretyGateway::get_my_indexes(self, oracle).await
    }

    async fn submit_oracle_response(
        &self,
        oracle: Address,
        response: &OracleResponse,
    ) -> Result<TxReceipt, GatewayError> {
        FlightSuretyGateway::submit_oracle_response(self, oracle, response).await
    }

    async fn latest_block(&self) -> Result<u64, GatewayError> {
        self.block_number().await
    }

    async fn contract_events(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ContractEvent>, GatewayError> {
        FlightSuretyGateway::contract_events(self, from_block, to_block).await
    }
}
