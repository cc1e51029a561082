//! Canonical signatures of the FlightSuretyApp ABI surface

pub const IS_OPERATIONAL: &str = "isOperational()";
pub const REGISTER_AIRLINE: &str = "registerAirline(address,string)";
pub const BUY_INSURANCE: &str = "buyInsurance(address,string,uint256)";
pub const FUND: &str = "fund()";
pub const WITHDRAW: &str = "withdraw()";
pub const FETCH_FLIGHT_STATUS: &str = "fetchFlightStatus(address,string,uint256)";
pub const REGISTER_FLIGHT: &str = "registerFlight(address,string,uint256)";
pub const GET_AIRLINE_COUNT: &str = "getAirlineCount()";

pub const REGISTRATION_FEE: &str = "REGISTRATION_FEE()";
pub const REGISTER_ORACLE: &str = "registerOracle()";
pub const GET_MY_INDEXES: &str = "getMyIndexes()";
pub const SUBMIT_ORACLE_RESPONSE: &str = "submitOracleResponse(uint8,address,string,uint256,uint8)";

pub const ORACLE_REQUEST_EVENT: &str = "OracleRequest(uint8,address,string,uint256)";
pub const FLIGHT_STATUS_INFO_EVENT: &str = "FlightStatusInfo(address,string,uint256,uint8)";
