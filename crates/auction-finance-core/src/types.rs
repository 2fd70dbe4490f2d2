use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AuctionFinanceError;
use crate::AuctionFinanceResult;

/// Amounts in the deal currency (BRL in practice). Never f64.
pub type Money = Decimal;

/// Rates expressed as percentages (7.1 = 7.1%). Divide by 100 before use.
pub type Percent = Decimal;

/// Whole months (loan terms, holding periods).
pub type Months = u32;

/// Largest absolute amount the calculators accept (one quadrillion).
/// Products of bounded amounts, rates and `u32` month counts stay inside
/// Decimal's range.
pub const MAX_AMOUNT: Money = dec!(1000000000000000);

/// Largest absolute percentage rate the calculators accept.
pub const MAX_RATE: Percent = dec!(1000);

/// What every calculator returns: the result, the inputs it actually used,
/// and any non-fatal oddities it noticed along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    /// Inputs echoed back with defaults resolved
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Wrap a result in the output envelope.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Percentage to fraction: 7.1 -> 0.071
pub fn pct(rate: Percent) -> Decimal {
    rate / dec!(100)
}

/// Round a monetary amount to cents.
pub fn cents(value: Money) -> Money {
    value.round_dp(2)
}

/// Reject an amount whose magnitude exceeds `MAX_AMOUNT`.
pub fn check_amount(field: &str, value: Money) -> AuctionFinanceResult<()> {
    if value.abs() > MAX_AMOUNT {
        return Err(AuctionFinanceError::InvalidInput {
            field: field.to_string(),
            reason: format!("Amount must not exceed {MAX_AMOUNT} in magnitude"),
        });
    }
    Ok(())
}

/// Reject a percentage whose magnitude exceeds `MAX_RATE`.
pub fn check_rate(field: &str, value: Percent) -> AuctionFinanceResult<()> {
    if value.abs() > MAX_RATE {
        return Err(AuctionFinanceError::InvalidInput {
            field: field.to_string(),
            reason: format!("Rate must not exceed {MAX_RATE}% in magnitude"),
        });
    }
    Ok(())
}
