use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::eth::Address;
use crate::models::{FlightStatus, OracleRequest};

/// Where an oracle gets the status it reports for a request
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn status_for(
        &self,
        oracle: Address,
        request: &OracleRequest,
    ) -> anyhow::Result<FlightStatus>;
}

/// Picks one of the six status codes uniformly at random for every answer.
pub struct RandomStatusSource {
    rng: Mutex<StdRng>,
}

impl RandomStatusSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for tests and demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn draw(&self) -> FlightStatus {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        FlightStatus::ALL[rng.gen_range(0..FlightStatus::ALL.len())]
    }
}

impl Default for RandomStatusSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusSource for RandomStatusSource {
    async fn status_for(
        &self,
        _oracle: Address,
        _request: &OracleRequest,
    ) -> anyhow::Result<FlightStatus> {
        Ok(self.draw())
    }
}
