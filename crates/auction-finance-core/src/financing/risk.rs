use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::MarketAssumptions;
use crate::financing::calculator::FinancingResults;

/// Severity of a risk factor; also its weight in the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn weight(self) -> u32 {
        match self {
            RiskLevel::High => 3,
            RiskLevel::Medium => 2,
            RiskLevel::Low => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    #[serde(rename = "type")]
    pub level: RiskLevel,
    pub description: String,
    /// Size of the exposure: a loss amount or a return gap in percentage points
    pub impact: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub risk_factors: Vec<RiskFactor>,
    /// 3 per high, 2 per medium, 1 per low factor
    pub risk_score: u32,
    pub recommendations: Vec<String>,
}

const GENERIC_RECOMMENDATIONS: [&str; 5] = [
    "Inspect the property in detail before buying",
    "Get several quotes for the renovation work",
    "Study the rental market in the neighbourhood",
    "Consider insuring the property",
    "Keep complete and organised documentation",
];

/// Score the base case against its pessimistic and no-rental variants.
pub fn assess_risks(
    base: &FinancingResults,
    pessimistic: &FinancingResults,
    no_rental: &FinancingResults,
    assumptions: &MarketAssumptions,
) -> RiskAnalysis {
    let cdi = assumptions.benchmarks.cdi;
    let thresholds = &assumptions.risk;
    let mut risk_factors = Vec::new();

    if pessimistic.final_profit < Decimal::ZERO {
        risk_factors.push(RiskFactor {
            level: RiskLevel::High,
            description: "Loss in the pessimistic scenario".into(),
            impact: pessimistic.final_profit.abs(),
        });
    }

    if base.annual_return < cdi {
        risk_factors.push(RiskFactor {
            level: RiskLevel::Medium,
            description: "Annual return below the CDI benchmark".into(),
            impact: cdi - base.annual_return,
        });
    }

    if no_rental.annual_return < base.annual_return * thresholds.vacancy_return_floor {
        risk_factors.push(RiskFactor {
            level: RiskLevel::Medium,
            description: "Vacancy has a large impact on the return".into(),
            impact: base.annual_return - no_rental.annual_return,
        });
    }

    if base.total_investment > thresholds.liquidity_investment {
        risk_factors.push(RiskFactor {
            level: RiskLevel::Low,
            description: "High-value investment may be less liquid".into(),
            impact: Decimal::ZERO,
        });
    }

    let risk_score = risk_factors.iter().map(|r| r.level.weight()).sum();
    let recommendations = recommendations(&risk_factors, base, assumptions);

    RiskAnalysis {
        risk_factors,
        risk_score,
        recommendations,
    }
}

/// Risk-specific advice first, then the fixed due-diligence checklist.
pub fn recommendations(
    risk_factors: &[RiskFactor],
    base: &FinancingResults,
    assumptions: &MarketAssumptions,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    if risk_factors.iter().any(|r| r.level == RiskLevel::High) {
        out.push("Consider lowering the bid or looking for other opportunities".into());
        out.push("Keep an emergency reserve covering at least 6 months of costs".into());
    }

    if base.annual_return < assumptions.risk.low_annual_return {
        out.push("Weigh whether the return justifies the risk and work involved".into());
    }

    if base.total_investment > assumptions.risk.diversification_investment {
        out.push("Consider diversifying across several smaller properties".into());
    }

    out.extend(GENERIC_RECOMMENDATIONS.iter().map(|s| s.to_string()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::{calculate_financing, FinancingInputs};
    use rust_decimal_macros::dec;

    fn healthy_deal() -> FinancingResults {
        let input = FinancingInputs {
            down_payment: dec!(10080),
            sale_price: Some(dec!(290000)),
            monthly_rent: Some(dec!(1800)),
            iptu_arrears: dec!(891),
            ..FinancingInputs::new(dec!(191280))
        };
        calculate_financing(&input).unwrap().result
    }

    #[test]
    fn test_weights() {
        assert_eq!(RiskLevel::High.weight(), 3);
        assert_eq!(RiskLevel::Medium.weight(), 2);
        assert_eq!(RiskLevel::Low.weight(), 1);
    }

    #[test]
    fn test_healthy_deal_gets_only_the_checklist() {
        let base = healthy_deal();
        let analysis = assess_risks(&base, &base, &base, &MarketAssumptions::default());
        assert!(analysis.risk_factors.is_empty());
        assert_eq!(analysis.risk_score, 0);
        assert_eq!(analysis.recommendations, GENERIC_RECOMMENDATIONS.map(String::from).to_vec());
    }

    #[test]
    fn test_score_sums_every_factor_and_advice_is_ordered() {
        let base = FinancingResults {
            annual_return: dec!(5),
            total_investment: dec!(250000),
            ..healthy_deal()
        };
        let pessimistic = FinancingResults {
            final_profit: dec!(-1000),
            ..base.clone()
        };
        let no_rental = FinancingResults {
            annual_return: Decimal::ZERO,
            ..base.clone()
        };

        let analysis = assess_risks(&base, &pessimistic, &no_rental, &MarketAssumptions::default());
        let levels: Vec<RiskLevel> = analysis.risk_factors.iter().map(|r| r.level).collect();
        assert_eq!(
            levels,
            vec![RiskLevel::High, RiskLevel::Medium, RiskLevel::Medium, RiskLevel::Low]
        );
        assert_eq!(analysis.risk_score, 8);
        assert_eq!(analysis.risk_factors[0].impact, dec!(1000));
        assert_eq!(analysis.risk_factors[1].impact, dec!(7.5));

        let recs = &analysis.recommendations;
        assert_eq!(recs.len(), 9);
        assert!(recs[0].starts_with("Consider lowering the bid"));
        assert!(recs[1].starts_with("Keep an emergency reserve"));
        assert!(recs[2].starts_with("Weigh whether the return"));
        assert!(recs[3].starts_with("Consider diversifying"));
        assert_eq!(recs[4..], GENERIC_RECOMMENDATIONS.map(String::from));
    }

    #[test]
    fn test_medium_risk_alone_adds_no_specific_advice() {
        // Between the low-return threshold (10%) and the CDI (12.5%)
        let base = FinancingResults {
            annual_return: dec!(11),
            ..healthy_deal()
        };
        let analysis = assess_risks(&base, &base, &base, &MarketAssumptions::default());
        assert_eq!(analysis.risk_factors.len(), 1);
        assert_eq!(analysis.risk_factors[0].level, RiskLevel::Medium);
        assert_eq!(analysis.risk_score, 2);
        assert_eq!(analysis.recommendations.len(), GENERIC_RECOMMENDATIONS.len());
    }

    #[test]
    fn test_thresholds_come_from_assumptions() {
        let base = healthy_deal();
        let mut assumptions = MarketAssumptions::default();
        assumptions.risk.liquidity_investment = dec!(10000);
        assumptions.risk.diversification_investment = dec!(20000);

        let analysis = assess_risks(&base, &base, &base, &assumptions);
        assert_eq!(analysis.risk_score, 1);
        assert_eq!(analysis.risk_factors[0].level, RiskLevel::Low);
        assert!(analysis.recommendations[0].starts_with("Consider diversifying"));
    }
}
