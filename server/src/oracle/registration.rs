use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::eth::units::format_ether;
use crate::eth::Address;

use super::contract::OracleContract;

/// An oracle account together with the three request indexes it answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisteredOracle {
    pub address: Address,
    pub indexes: [u8; 3],
}

impl RegisteredOracle {
    pub fn listens_to(&self, index: u8) -> bool {
        self.indexes.contains(&index)
    }
}

/// Registers the accounts at positions `1..oracle_count` as oracles.
///
/// Each account is handled on its own: a failing fee query, registration or
/// index read is logged and the next account is tried. A reverted
/// registration usually means the account was registered by an earlier run,
/// so its indexes are read back and adopted. Only a failure to list accounts
/// aborts the whole pass.
pub async fn register_oracles<C>(
    contract: &C,
    oracle_count: usize,
) -> Result<Vec<RegisteredOracle>, GatewayError>
where
    C: OracleContract + ?Sized,
{
    let accounts = contract.accounts().await?;
    let candidates: Vec<Address> = accounts
        .into_iter()
        .take(oracle_count)
        .skip(1)
        .collect();

    info!(candidates = candidates.len(), "registering oracles");

    let mut registered = Vec::with_capacity(candidates.len());
    for (offset, oracle) in candidates.into_iter().enumerate() {
        let position = offset + 1;
        match register_one(contract, oracle).await {
            Ok(indexes) => {
                info!(position, oracle = ?oracle, ?indexes, "oracle registered");
                registered.push(RegisteredOracle {
                    address: oracle,
                    indexes,
                });
            }
            Err(err) => {
                warn!(position, oracle = ?oracle, error = %err, "oracle registration failed");
            }
        }
    }

    Ok(registered)
}

async fn register_one<C>(contract: &C, oracle: Address) -> Result<[u8; 3], GatewayError>
where
    C: OracleContract + ?Sized,
{
    let fee = contract.registration_fee().await?;
    debug!(oracle = ?oracle, fee = %format_ether(fee), "paying oracle registration fee");

    match contract.register_oracle(oracle, fee).await {
        Ok(_) => contract.get_my_indexes(oracle).await,
        Err(GatewayError::Reverted(reason)) => {
            let indexes = contract
                .get_my_indexes(oracle)
                .await
                .map_err(|_| GatewayError::Reverted(reason))?;
            info!(oracle = ?oracle, "adopting existing oracle registration");
            Ok(indexes)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listens_only_to_own_indexes() {
        let oracle = RegisteredOracle {
            address: Address::from_low_u64_be(1),
            indexes: [2, 7, 9],
        };
        assert!(oracle.listens_to(7));
        assert!(!oracle.listens_to(3));
    }
}
