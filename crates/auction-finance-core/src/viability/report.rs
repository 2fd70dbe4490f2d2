use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

use crate::assumptions::MarketAssumptions;
use crate::types::{check_amount, check_rate, with_metadata, ComputationOutput, Money, Months, Percent};
use crate::viability::investment::{investment_total, InvestmentBreakdown};
use crate::viability::strategy::{
    compare_strategies, rent_sensitivity, rental_roi, resale_roi, RentSensitivity, RentalRoi,
    ResaleRoi, Strategy, StrategyComparison,
};
use crate::AuctionFinanceResult;

fn default_horizon_years() -> u32 {
    10
}

fn default_resale_months() -> Months {
    12
}

fn default_rent_variation() -> Percent {
    dec!(20)
}

/// Inputs for a full rental-versus-resale viability report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViabilityReportInput {
    pub winning_bid: Money,
    #[serde(default)]
    pub renovation_budget: Money,
    pub monthly_rent: Money,
    pub estimated_sale_price: Money,
    /// Named one-off costs (moving, documents, ...)
    #[serde(default)]
    pub additional_costs: BTreeMap<String, Money>,
    #[serde(default = "default_horizon_years")]
    pub rental_horizon_years: u32,
    #[serde(default = "default_resale_months")]
    pub resale_months: Months,
    /// Rent swing (%) tested in the sensitivity block
    #[serde(default = "default_rent_variation")]
    pub rent_variation: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub rental_annual_roi: Percent,
    pub resale_annual_roi: Percent,
    pub rental_payback_years: Option<Decimal>,
    pub recommended_strategy: Strategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViabilityReport {
    pub generated_at: DateTime<Utc>,
    pub investment: InvestmentBreakdown,
    pub rental: RentalRoi,
    pub resale: ResaleRoi,
    pub rent_sensitivity: RentSensitivity,
    pub comparison: StrategyComparison,
    pub summary: ReportSummary,
}

impl ViabilityReportInput {
    /// Fail on the first amount or rate too large to compute with.
    pub fn check_bounds(&self) -> AuctionFinanceResult<()> {
        check_amount("winning_bid", self.winning_bid)?;
        check_amount("renovation_budget", self.renovation_budget)?;
        check_amount("monthly_rent", self.monthly_rent)?;
        check_amount("estimated_sale_price", self.estimated_sale_price)?;
        for (name, amount) in &self.additional_costs {
            check_amount(&format!("additional_costs.{name}"), *amount)?;
        }
        check_rate("rent_variation", self.rent_variation)
    }
}

pub fn viability_report(
    input: &ViabilityReportInput,
) -> AuctionFinanceResult<ComputationOutput<ViabilityReport>> {
    viability_report_with(input, &MarketAssumptions::default())
}

/// Total investment, both exit strategies, rent sensitivity and a recommendation.
pub fn viability_report_with(
    input: &ViabilityReportInput,
    assumptions: &MarketAssumptions,
) -> AuctionFinanceResult<ComputationOutput<ViabilityReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let rates = &assumptions.viability;

    debug!(
        winning_bid = %input.winning_bid,
        monthly_rent = %input.monthly_rent,
        sale_price = %input.estimated_sale_price,
        "building viability report"
    );

    input.check_bounds()?;

    let investment = investment_total(
        input.winning_bid,
        input.renovation_budget,
        &input.additional_costs,
        rates,
    )?;
    let total = investment.total_investment;

    let rental = rental_roi(total, input.monthly_rent, input.rental_horizon_years, rates)?;
    let resale = resale_roi(total, input.estimated_sale_price, input.resale_months, rates)?;
    let sensitivity = rent_sensitivity(
        total,
        input.monthly_rent,
        input.rent_variation,
        input.rental_horizon_years,
        rates,
    )?;
    let comparison = compare_strategies(
        total,
        input.monthly_rent,
        input.estimated_sale_price,
        input.resale_months,
        input.rental_horizon_years,
        rates,
    )?;

    if rental.payback_years.is_none() {
        warnings.push("Net rental result is not positive; the investment never pays back".into());
    }
    if resale.net_profit < Decimal::ZERO {
        warnings.push(format!(
            "Resale at {} loses {} after costs and taxes",
            input.estimated_sale_price,
            resale.net_profit.abs()
        ));
    }

    let summary = ReportSummary {
        rental_annual_roi: rental.annual_roi,
        resale_annual_roi: resale.annual_roi,
        rental_payback_years: rental.payback_years,
        recommended_strategy: comparison.recommended,
    };

    let output = ViabilityReport {
        generated_at: Utc::now(),
        investment,
        rental,
        resale,
        rent_sensitivity: sensitivity,
        comparison,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Auction Purchase Viability (rental vs resale)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
