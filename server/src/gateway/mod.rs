//! Typed access to the deployed FlightSuretyApp contract
//!
//! Every operation maps to exactly one contract call or transaction. Errors are
//! reported to the caller as [`GatewayError`]; nothing is retried here.

pub mod events;
pub mod methods;

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::config::{ContractEndpoint, DeploymentConfig};
use crate::error::GatewayError;
use crate::eth::abi::{self, ParamKind, Token};
use crate::eth::units::parse_ether;
use crate::eth::{Address, CallRequest, ChainClient, HttpChainClient, LogFilter, TxReceipt, U256};
use crate::models::{ContractEvent, FlightStatusQuery, OracleResponse};

use events::{decode_event, flight_status_info_topic, oracle_request_topic};

const AIRLINE_POOL: usize = 5;
const PASSENGER_POOL: usize = 5;

/// Transaction tuning applied to every send
#[derive(Clone, Copy, Debug)]
pub struct GatewayOptions {
    pub tx_gas: u64,
    pub oracle_gas: u64,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            tx_gas: 3_000_000,
            oracle_gas: 1_000_000,
        }
    }
}

/// Node accounts partitioned into the roles the dapp uses
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountRoles {
    pub all: Vec<Address>,
    pub owner: Option<Address>,
    pub airlines: Vec<Address>,
    pub passengers: Vec<Address>,
}

impl AccountRoles {
    /// owner = `accounts[0]`, airlines = `accounts[1..=5]`, passengers = `accounts[6..=10]`
    pub fn assign(accounts: Vec<Address>) -> Self {
        let owner = accounts.first().copied();
        let airlines = accounts.iter().skip(1).take(AIRLINE_POOL).copied().collect();
        let passengers = accounts
            .iter()
            .skip(1 + AIRLINE_POOL)
            .take(PASSENGER_POOL)
            .copied()
            .collect();

        Self {
            all: accounts,
            owner,
            airlines,
            passengers,
        }
    }
}

pub struct FlightSuretyGateway {
    client: Arc<dyn ChainClient>,
    endpoint: ContractEndpoint,
    roles: AccountRoles,
    options: GatewayOptions,
}

impl FlightSuretyGateway {
    /// Resolves `network`, opens an HTTP JSON-RPC client and loads the node's accounts.
    pub async fn connect(
        config: &DeploymentConfig,
        network: &str,
        options: GatewayOptions,
        receipt_timeout: std::time::Duration,
    ) -> Result<Self, GatewayError> {
        let endpoint = config.endpoint(network)?;
        let client = HttpChainClient::new(endpoint.rpc_url.clone(), receipt_timeout)?;
        Self::initialize(endpoint, Arc::new(client), options).await
    }

    /// Same as [`connect`](Self::connect) with a caller-supplied chain client.
    /// The network is resolved before the client is touched.
    pub async fn with_client(
        config: &DeploymentConfig,
        network: &str,
        client: Arc<dyn ChainClient>,
        options: GatewayOptions,
    ) -> Result<Self, GatewayError> {
        let endpoint = config.endpoint(network)?;
        Self::initialize(endpoint, client, options).await
    }

    async fn initialize(
        endpoint: ContractEndpoint,
        client: Arc<dyn ChainClient>,
        options: GatewayOptions,
    ) -> Result<Self, GatewayError> {
        let accounts = client.accounts().await?;
        let roles = AccountRoles::assign(accounts);

        info!(
            network = %endpoint.network,
            app = ?endpoint.app_address,
            accounts = roles.all.len(),
            "contract gateway ready"
        );

        Ok(Self {
            client,
            endpoint,
            roles,
            options,
        })
    }

    pub fn endpoint(&self) -> &ContractEndpoint {
        &self.endpoint
    }

    fn owner(&self) -> Result<Address, GatewayError> {
        self.roles.owner.ok_or(GatewayError::NoAccount("owner"))
    }

    fn first_airline(&self) -> Result<Address, GatewayError> {
        self.roles
            .airlines
            .first()
            .copied()
            .ok_or(GatewayError::NoAccount("airline"))
    }

    fn first_passenger(&self) -> Result<Address, GatewayError> {
        self.roles
            .passengers
            .first()
            .copied()
            .ok_or(GatewayError::NoAccount("passenger"))
    }

    fn request(&self, from: Address, signature: &str, tokens: &[Token]) -> CallRequest {
        CallRequest::new(
            from,
            self.endpoint.app_address,
            abi::encode_call(signature, tokens),
        )
    }

    async fn call_decoded(
        &self,
        from: Address,
        signature: &str,
        outputs: &[ParamKind],
    ) -> Result<Vec<Token>, GatewayError> {
        let raw = self.client.call(&self.request(from, signature, &[])).await?;
        Ok(abi::decode(outputs, &raw)?)
    }

    async fn transact(&self, request: CallRequest) -> Result<TxReceipt, GatewayError> {
        let receipt = self.client.send_transaction(&request).await?;
        debug!(
            tx_hash = ?receipt.transaction_hash,
            block = receipt.block_number,
            "transaction mined"
        );
        Ok(receipt)
    }

    // ===== Dapp operations =====

    pub async fn is_operational(&self) -> Result<bool, GatewayError> {
        let mut tokens = self
            .call_decoded(self.owner()?, methods::IS_OPERATIONAL, &[ParamKind::Bool])
            .await?;
        Ok(tokens.remove(0).into_bool()?)
    }

    #[instrument(skip(self), fields(airline = ?airline))]
    pub async fn register_airline(
        &self,
        airline: Address,
        name: &str,
    ) -> Result<TxReceipt, GatewayError> {
        let request = self
            .request(
                self.owner()?,
                methods::REGISTER_AIRLINE,
                &[Token::Address(airline), Token::String(name.to_string())],
            )
            .with_gas(self.options.tx_gas);
        self.transact(request).await
    }

    /// Buys insurance for `flight` on behalf of the first passenger account.
    /// `amount` is in ether.
    #[instrument(skip(self), fields(airline = ?airline))]
    pub async fn purchase_insurance(
        &self,
        airline: Address,
        flight: &str,
        amount: &str,
    ) -> Result<TxReceipt, GatewayError> {
        let value = parse_ether(amount).map_err(GatewayError::InvalidInput)?;
        let request = self
            .request(
                self.first_passenger()?,
                methods::BUY_INSURANCE,
                &[
                    Token::Address(airline),
                    Token::String(flight.to_string()),
                    Token::Uint(U256::from(unix_now())),
                ],
            )
            .with_value(value)
            .with_gas(self.options.tx_gas);
        self.transact(request).await
    }

    /// Pays `amount` ether of participation funding from the airline's own account.
    #[instrument(skip(self), fields(airline = ?airline))]
    pub async fn submit_airline_funding(
        &self,
        airline: Address,
        amount: &str,
    ) -> Result<TxReceipt, GatewayError> {
        let value = parse_ether(amount).map_err(GatewayError::InvalidInput)?;
        let request = self
            .request(airline, methods::FUND, &[])
            .with_value(value)
            .with_gas(self.options.tx_gas);
        self.transact(request).await
    }

    #[instrument(skip(self))]
    pub async fn withdraw_insurance_payout(&self) -> Result<TxReceipt, GatewayError> {
        let request = self
            .request(self.owner()?, methods::WITHDRAW, &[])
            .with_gas(self.options.tx_gas);
        self.transact(request).await
    }

    #[instrument(skip(self), fields(airline = ?airline))]
    pub async fn register_flight(
        &self,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<TxReceipt, GatewayError> {
        let request = self
            .request(
                airline,
                methods::REGISTER_FLIGHT,
                &[
                    Token::Address(airline),
                    Token::String(flight.to_string()),
                    Token::Uint(U256::from(timestamp)),
                ],
            )
            .with_gas(self.options.tx_gas);
        self.transact(request).await
    }

    pub async fn airline_count(&self) -> Result<u64, GatewayError> {
        let mut tokens = self
            .call_decoded(self.owner()?, methods::GET_AIRLINE_COUNT, &[ParamKind::Uint])
            .await?;
        Ok(tokens.remove(0).into_u64()?)
    }

    /// Asks the oracles about `flight` of the first airline, stamped with the
    /// current time. Every call submits a new request.
    pub async fn fetch_flight_status(
        &self,
        flight: &str,
    ) -> Result<(FlightStatusQuery, TxReceipt), GatewayError> {
        let query = FlightStatusQuery {
            airline: self.first_airline()?,
            flight: flight.to_string(),
            timestamp: unix_now(),
        };
        let receipt = self.fetch_flight_status_for(&query).await?;
        Ok((query, receipt))
    }

    #[instrument(skip(self, query), fields(flight = %query.flight, timestamp = query.timestamp))]
    pub async fn fetch_flight_status_for(
        &self,
        query: &FlightStatusQuery,
    ) -> Result<TxReceipt, GatewayError> {
        let request = self
            .request(
                self.owner()?,
                methods::FETCH_FLIGHT_STATUS,
                &[
                    Token::Address(query.airline),
                    Token::String(query.flight.clone()),
                    Token::Uint(U256::from(query.timestamp)),
                ],
            )
            .with_gas(self.options.tx_gas);
        self.transact(request).await
    }

    // ===== Oracle operations =====

    pub async fn registration_fee(&self) -> Result<U256, GatewayError> {
        let mut tokens = self
            .call_decoded(self.owner()?, methods::REGISTRATION_FEE, &[ParamKind::Uint])
            .await?;
        Ok(tokens.remove(0).into_uint()?)
    }

    pub async fn register_oracle(
        &self,
        oracle: Address,
        fee: U256,
    ) -> Result<TxReceipt, GatewayError> {
        let request = self
            .request(oracle, methods::REGISTER_ORACLE, &[])
            .with_value(fee)
            .with_gas(self.options.oracle_gas);
        self.transact(request).await
    }

    pub async fn get_my_indexes(&self, oracle: Address) -> Result<[u8; 3], GatewayError> {
        let tokens = self
            .call_decoded(
                oracle,
                methods::GET_MY_INDEXES,
                &[ParamKind::Uint, ParamKind::Uint, ParamKind::Uint],
            )
            .await?;

        let mut indexes = [0u8; 3];
        for (slot, token) in indexes.iter_mut().zip(tokens) {
            *slot = token.into_u8()?;
        }
        Ok(indexes)
    }

    pub async fn submit_oracle_response(
        &self,
        oracle: Address,
        response: &OracleResponse,
    ) -> Result<TxReceipt, GatewayError> {
        let request = self
            .request(
                oracle,
                methods::SUBMIT_ORACLE_RESPONSE,
                &[
                    Token::Uint(U256::from(response.index)),
                    Token::Address(response.airline),
                    Token::String(response.flight.clone()),
                    Token::Uint(U256::from(response.timestamp)),
                    Token::Uint(U256::from(response.status.code())),
                ],
            )
            .with_gas(self.options.oracle_gas);
        self.transact(request).await
    }

    pub async fn accounts(&self) -> Result<Vec<Address>, GatewayError> {
        self.client.accounts().await
    }

    pub async fn block_number(&self) -> Result<u64, GatewayError> {
        self.client.block_number().await
    }

    /// `OracleRequest` and `FlightStatusInfo` events in `from_block..=to_block`,
    /// in chain order. Logs that fail to decode are skipped with a warning.
    pub async fn contract_events(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ContractEvent>, GatewayError> {
        let filter = LogFilter {
            address: self.endpoint.app_address,
            topics: vec![oracle_request_topic(), flight_status_info_topic()],
            from_block,
            to_block,
        };

        let mut logs = self.client.get_logs(&filter).await?;
        logs.sort_by_key(|log| (log.block_number, log.log_index));

        Ok(logs
            .iter()
            .filter_map(|log| match decode_event(log) {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(
                        block = log.block_number,
                        error = %err,
                        "skipping undecodable contract log"
                    );
                    None
                }
            })
            .collect())
    }
}

pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_follow_account_positions() {
        let accounts: Vec<Address> = (0..12).map(Address::from_low_u64_be).collect();
        let roles = AccountRoles::assign(accounts.clone());

        assert_eq!(roles.owner, Some(accounts[0]));
        assert_eq!(roles.airlines, accounts[1..=5].to_vec());
        assert_eq!(roles.passengers, accounts[6..=10].to_vec());
    }

    #[test]
    fn roles_tolerate_small_account_lists() {
        let roles = AccountRoles::assign(vec![Address::from_low_u64_be(1)]);
        assert!(roles.owner.is_some());
        assert!(roles.airlines.is_empty());
        assert!(roles.passengers.is_empty());
    }
}
