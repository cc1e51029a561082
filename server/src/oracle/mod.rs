//! Oracle simulation: registers oracle accounts, follows `OracleRequest`
//! events and answers them with simulated flight statuses.

pub mod contract;
pub mod registration;
pub mod simulator;
pub mod source;
pub mod state;
pub mod subscription;

pub use contract::OracleContract;
pub use registration::{register_oracles, RegisteredOracle};
pub use simulator::{OracleSimulator, ResponseOutcome, SimulatorSettings, StartError};
pub use source::{RandomStatusSource, StatusSource};
pub use state::{SimulatorPhase, SimulatorSnapshot, SimulatorState};
pub use subscription::EventSubscription;
