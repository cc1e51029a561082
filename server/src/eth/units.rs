//! Ether ↔ wei conversion for amounts entered by users

use super::types::U256;

const ETHER_DECIMALS: usize = 18;

/// Converts a decimal ether amount such as `"0.5"` into wei.
pub fn parse_ether(amount: &str) -> Result<U256, String> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err("amount is empty".to_string());
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(format!("`{amount}` is not a number"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(format!("`{amount}` is not a decimal ether amount"));
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(format!("`{amount}` has more than {ETHER_DECIMALS} decimals"));
    }

    let digits = format!("{whole}{fraction:0<width$}", width = ETHER_DECIMALS);
    U256::from_dec_str(&digits).map_err(|_| format!("`{amount}` is too large"))
}

/// Renders a wei amount as ether with trailing zeros trimmed.
pub fn format_ether(wei: U256) -> String {
    let unit = U256::exp10(ETHER_DECIMALS);
    let whole = wei / unit;
    let fraction = wei % unit;

    if fraction.is_zero() {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", fraction.to_string(), width = ETHER_DECIMALS);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}
