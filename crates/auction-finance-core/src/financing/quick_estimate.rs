use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::assumptions::MarketAssumptions;
use crate::error::AuctionFinanceError;
use crate::financing::amortization::loan_payment;
use crate::financing::inputs::{default_interest_rate, default_loan_term};
use crate::types::{cents, check_amount, check_rate, pct, with_metadata, ComputationOutput, Money, Months, Percent};
use crate::AuctionFinanceResult;

/// Minimal inputs for a back-of-the-envelope estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickEstimateInput {
    pub property_value: Money,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default = "default_interest_rate")]
    pub interest_rate: Percent,
    #[serde(default = "default_loan_term")]
    pub loan_term: Months,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingDetails {
    pub principal: Money,
    pub interest_rate: Percent,
    pub loan_term_years: Decimal,
    pub loan_term_months: Months,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickEstimate {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_amount: Money,
    pub documentation_costs: Money,
    pub total_initial_cost: Money,
    pub estimated_monthly_rent: Money,
    pub estimated_annual_rent: Money,
    /// Annual rent over property value (%)
    pub gross_yield: Percent,
    pub financing_details: FinancingDetails,
}

pub fn quick_estimate(input: &QuickEstimateInput) -> AuctionFinanceResult<ComputationOutput<QuickEstimate>> {
    quick_estimate_with(input, &MarketAssumptions::default())
}

/// Payment, upfront cash and rent yield from four numbers. Amounts are rounded to cents.
pub fn quick_estimate_with(
    input: &QuickEstimateInput,
    assumptions: &MarketAssumptions,
) -> AuctionFinanceResult<ComputationOutput<QuickEstimate>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.property_value <= Decimal::ZERO {
        return Err(AuctionFinanceError::InvalidInput {
            field: "property_value".into(),
            reason: "Property value must be greater than zero".into(),
        });
    }

    check_amount("property_value", input.property_value)?;
    check_amount("down_payment", input.down_payment)?;
    check_rate("interest_rate", input.interest_rate)?;

    let principal = input.property_value - input.down_payment;
    if principal <= Decimal::ZERO {
        warnings.push(format!(
            "Down payment covers the property value; principal is {principal}"
        ));
    }

    debug!(%principal, rate = %input.interest_rate, term = input.loan_term, "quick estimate");

    let loan = loan_payment(principal, input.interest_rate, input.loan_term)?;
    let total_amount = principal + loan.total_interest;

    let documentation_costs = input.property_value * pct(assumptions.defaults.documentation);
    let total_initial_cost = input.down_payment + documentation_costs;

    let estimated_rent = input.property_value * pct(assumptions.defaults.monthly_rent);
    let annual_rent = estimated_rent * dec!(12);
    let gross_yield = annual_rent / input.property_value * dec!(100);

    let output = QuickEstimate {
        monthly_payment: cents(loan.monthly_payment),
        total_interest: cents(loan.total_interest),
        total_amount: cents(total_amount),
        documentation_costs: cents(documentation_costs),
        total_initial_cost: cents(total_initial_cost),
        estimated_monthly_rent: cents(estimated_rent),
        estimated_annual_rent: cents(annual_rent),
        gross_yield: gross_yield.round_dp(2),
        financing_details: FinancingDetails {
            principal: cents(principal),
            interest_rate: input.interest_rate,
            loan_term_years: Decimal::from(input.loan_term) / dec!(12),
            loan_term_months: input.loan_term,
        },
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Quick Financing Estimate (Price amortization)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> QuickEstimateInput {
        QuickEstimateInput {
            property_value: dec!(200000),
            down_payment: dec!(40000),
            interest_rate: dec!(7.1),
            loan_term: 360,
        }
    }

    #[test]
    fn test_quick_estimate_basics() {
        let out = quick_estimate(&sample()).unwrap().result;
        assert_eq!(out.documentation_costs, dec!(10000));
        assert_eq!(out.total_initial_cost, dec!(50000));
        assert_eq!(out.estimated_monthly_rent, dec!(1200));
        assert_eq!(out.estimated_annual_rent, dec!(14400));
        assert_eq!(out.gross_yield, dec!(7.2));
        assert_eq!(out.financing_details.principal, dec!(160000));
        assert_eq!(out.financing_details.loan_term_years, dec!(30));
    }

    #[test]
    fn test_total_amount_is_principal_plus_interest() {
        let out = quick_estimate(&sample()).unwrap().result;
        let diff = out.total_amount - (out.financing_details.principal + out.total_interest);
        assert!(diff.abs() <= dec!(0.01));
        assert!((out.monthly_payment * dec!(360) - out.total_amount).abs() < dec!(2));
    }

    #[test]
    fn test_zero_rate_quick_estimate() {
        let input = QuickEstimateInput {
            interest_rate: Decimal::ZERO,
            loan_term: 160,
            ..sample()
        };
        let out = quick_estimate(&input).unwrap().result;
        assert_eq!(out.monthly_payment, dec!(1000));
        assert_eq!(out.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_serde_defaults_match_financing_inputs() {
        let parsed: QuickEstimateInput =
            serde_json::from_str(r#"{"property_value": "200000"}"#).unwrap();
        let full = crate::financing::FinancingInputs::new(dec!(200000));
        assert_eq!(parsed.interest_rate, full.interest_rate);
        assert_eq!(parsed.loan_term, full.loan_term);
        assert_eq!(parsed.down_payment, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_out_of_range_down_payment() {
        let input = QuickEstimateInput {
            down_payment: dec!(-70000000000000000000000000000),
            ..sample()
        };
        let err = quick_estimate(&input).unwrap_err();
        assert_eq!(err.fields(), vec!["down_payment".to_string()]);
    }

    #[test]
    fn test_rejects_non_positive_value() {
        let input = QuickEstimateInput {
            property_value: Decimal::ZERO,
            ..sample()
        };
        let err = quick_estimate(&input).unwrap_err();
        assert_eq!(err.fields(), vec!["property_value".to_string()]);
    }
}
