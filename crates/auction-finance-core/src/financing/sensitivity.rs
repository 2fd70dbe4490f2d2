use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::debug;

use crate::assumptions::MarketAssumptions;
use crate::financing::calculator::{compute, FinancingResults};
use crate::financing::inputs::FinancingInputs;
use crate::financing::risk::{assess_risks, RiskAnalysis};
use crate::types::{with_metadata, ComputationOutput};
use crate::AuctionFinanceResult;

/// The alternate outcomes tested around the base case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Cheaper sale, costlier renovation, six fewer months of rent
    Pessimistic,
    /// Dearer sale, cheaper renovation, 10% more rent
    Optimistic,
    /// Property stays empty until the sale
    NoRental,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScenarioKind::Pessimistic => "pessimistic",
            ScenarioKind::Optimistic => "optimistic",
            ScenarioKind::NoRental => "no_rental",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResults {
    pub pessimistic: FinancingResults,
    pub optimistic: FinancingResults,
    pub no_rental: FinancingResults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAnalysis {
    pub base: FinancingResults,
    pub scenarios: ScenarioResults,
    pub risk_analysis: RiskAnalysis,
}

/// Build a scenario variant as a fresh value; `base` is only read.
///
/// Multipliers apply to the effective values, so an unset sale price or rent is
/// first resolved from the property value and then scaled.
pub fn derive_scenario(
    base: &FinancingInputs,
    kind: ScenarioKind,
    assumptions: &MarketAssumptions,
) -> FinancingInputs {
    let m = &assumptions.scenarios;
    let defaults = &assumptions.defaults;

    match kind {
        ScenarioKind::Pessimistic => FinancingInputs {
            sale_price: Some(base.effective_sale_price(defaults) * m.pessimistic_sale_price),
            maintenance_reforms: base.maintenance_reforms * m.pessimistic_maintenance,
            rental_time: base
                .rental_time
                .saturating_sub(m.pessimistic_rental_cut_months)
                .max(1),
            ..base.clone()
        },
        ScenarioKind::Optimistic => FinancingInputs {
            sale_price: Some(base.effective_sale_price(defaults) * m.optimistic_sale_price),
            maintenance_reforms: base.maintenance_reforms * m.optimistic_maintenance,
            monthly_rent: Some(base.effective_monthly_rent(defaults) * m.optimistic_rent),
            ..base.clone()
        },
        ScenarioKind::NoRental => FinancingInputs {
            monthly_rent: Some(Decimal::ZERO),
            rental_time: 0,
            ..base.clone()
        },
    }
}

/// Base case, three derived scenarios, and a risk assessment over them.
pub fn analyze_sensitivity(
    input: &FinancingInputs,
) -> AuctionFinanceResult<ComputationOutput<SensitivityAnalysis>> {
    analyze_sensitivity_with(input, &MarketAssumptions::default())
}

pub fn analyze_sensitivity_with(
    input: &FinancingInputs,
    assumptions: &MarketAssumptions,
) -> AuctionFinanceResult<ComputationOutput<SensitivityAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.check_bounds()?;
    let base = compute(input, assumptions, &mut warnings)?;

    let run = |kind: ScenarioKind| -> AuctionFinanceResult<FinancingResults> {
        let variant = derive_scenario(input, kind, assumptions);
        debug!(scenario = %kind, "computing sensitivity scenario");
        // Base-case warnings already cover the shared inputs
        let mut scratch = Vec::new();
        compute(&variant, assumptions, &mut scratch)
    };

    let scenarios = ScenarioResults {
        pessimistic: run(ScenarioKind::Pessimistic)?,
        optimistic: run(ScenarioKind::Optimistic)?,
        no_rental: run(ScenarioKind::NoRental)?,
    };

    let risk_analysis = assess_risks(&base, &scenarios.pessimistic, &scenarios.no_rental, assumptions);

    let output = SensitivityAnalysis {
        base,
        scenarios,
        risk_analysis,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Financing Sensitivity Analysis (pessimistic / optimistic / no-rental)",
        &input.resolved(&assumptions.defaults),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> FinancingInputs {
        FinancingInputs {
            down_payment: dec!(10080),
            sale_price: Some(dec!(290000)),
            monthly_rent: Some(dec!(1800)),
            iptu_arrears: dec!(891),
            maintenance_reforms: dec!(6000),
            ..FinancingInputs::new(dec!(191280))
        }
    }

    #[test]
    fn test_pessimistic_overrides() {
        let a = MarketAssumptions::default();
        let v = derive_scenario(&sample_input(), ScenarioKind::Pessimistic, &a);
        assert_eq!(v.sale_price, Some(dec!(232000)));
        assert_eq!(v.maintenance_reforms, dec!(9000));
        assert_eq!(v.rental_time, 12);
        assert_eq!(v.monthly_rent, Some(dec!(1800)));
    }

    #[test]
    fn test_pessimistic_rental_floor_of_one_month() {
        let a = MarketAssumptions::default();
        let short = FinancingInputs {
            rental_time: 4,
            ..sample_input()
        };
        assert_eq!(derive_scenario(&short, ScenarioKind::Pessimistic, &a).rental_time, 1);
    }

    #[test]
    fn test_optimistic_overrides() {
        let a = MarketAssumptions::default();
        let v = derive_scenario(&sample_input(), ScenarioKind::Optimistic, &a);
        assert_eq!(v.sale_price, Some(dec!(348000)));
        assert_eq!(v.maintenance_reforms, dec!(4800));
        assert_eq!(v.monthly_rent, Some(dec!(1980)));
        assert_eq!(v.rental_time, 18);
    }

    #[test]
    fn test_no_rental_zero_is_not_reinflated() {
        let a = MarketAssumptions::default();
        let unset_rent = FinancingInputs {
            monthly_rent: None,
            ..sample_input()
        };
        let v = derive_scenario(&unset_rent, ScenarioKind::NoRental, &a);
        assert_eq!(v.monthly_rent, Some(Decimal::ZERO));
        let r = compute(&v, &a, &mut Vec::new()).unwrap();
        assert_eq!(r.total_rental_income, Decimal::ZERO);
        assert_eq!(r.timeline.rental_period.monthly_income, Decimal::ZERO);
    }

    #[test]
    fn test_scenarios_scale_defaulted_sale_price() {
        let a = MarketAssumptions::default();
        let unset = FinancingInputs::new(dec!(100000));
        let v = derive_scenario(&unset, ScenarioKind::Pessimistic, &a);
        // 120% default, then 80%
        assert_eq!(v.sale_price, Some(dec!(96000)));
    }

    #[test]
    fn test_base_input_untouched() {
        let input = sample_input();
        let snapshot = input.clone();
        analyze_sensitivity(&input).unwrap();
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_scenarios_are_independent() {
        let out = analyze_sensitivity(&sample_input()).unwrap().result;
        // Each scenario is derived from the base, never from a previous scenario
        assert_eq!(out.scenarios.optimistic.timeline.sale.gross_value, dec!(348000));
        assert_eq!(out.scenarios.no_rental.timeline.sale.gross_value, dec!(290000));
        assert_eq!(out.scenarios.pessimistic.timeline.sale.gross_value, dec!(232000));
        assert_eq!(out.base.timeline.sale.gross_value, dec!(290000));
    }

    #[test]
    fn test_ordering_of_outcomes() {
        let out = analyze_sensitivity(&sample_input()).unwrap().result;
        assert!(out.scenarios.pessimistic.final_profit < out.base.final_profit);
        assert!(out.scenarios.optimistic.final_profit > out.base.final_profit);
        assert!(out.scenarios.no_rental.final_profit < out.base.final_profit);
    }
}
