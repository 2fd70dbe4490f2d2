use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::ViabilityRates;
use crate::error::AuctionFinanceError;
use crate::time_value::percent_of;
use crate::types::{pct, Money, Months, Percent};
use crate::AuctionFinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalCostBreakdown {
    pub vacancy: Money,
    pub rent_default: Money,
    pub management: Money,
    pub maintenance: Money,
    pub iptu: Money,
    pub insurance: Money,
}

/// Buy-to-let returns on the total investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalRoi {
    pub gross_annual_rent: Money,
    pub net_annual_rent: Money,
    pub annual_operating_costs: Money,
    pub net_annual_result: Money,
    pub annual_roi: Percent,
    /// `None` when the property never pays for itself
    pub payback_years: Option<Decimal>,
    pub horizon_years: u32,
    pub accumulated_result: Money,
    pub horizon_roi: Percent,
    pub cost_breakdown: RentalCostBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResaleCostBreakdown {
    pub broker_commission: Money,
    pub itbi: Money,
    pub marketing: Money,
    pub capital_gains_tax: Money,
}

/// Flip returns on the total investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResaleRoi {
    pub estimated_sale_price: Money,
    pub total_sale_costs: Money,
    pub net_sale_proceeds: Money,
    pub net_profit: Money,
    pub total_roi: Percent,
    /// Simple (non-compounded) annualisation of `total_roi`
    pub annual_roi: Percent,
    pub months: Months,
    pub cost_breakdown: ResaleCostBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentScenario {
    pub monthly_rent: Money,
    pub annual_roi: Percent,
    pub payback_years: Option<Decimal>,
    pub net_annual_result: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentSensitivity {
    pub pessimistic: RentScenario,
    pub realistic: RentScenario,
    pub optimistic: RentScenario,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Rental,
    Resale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalSummary {
    pub annual_roi: Percent,
    pub payback_years: Option<Decimal>,
    pub annual_result: Money,
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResaleSummary {
    pub annual_roi: Percent,
    pub payback_years: Decimal,
    pub total_result: Money,
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub rental: RentalSummary,
    pub resale: ResaleSummary,
    pub recommended: Strategy,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Net yield of renting the property out, after vacancy, defaults, management
/// and annual holding costs charged on the total investment.
pub fn rental_roi(
    total_investment: Money,
    monthly_rent: Money,
    horizon_years: u32,
    rates: &ViabilityRates,
) -> AuctionFinanceResult<RentalRoi> {
    require_positive_investment(total_investment)?;

    let gross_annual_rent = monthly_rent * dec!(12);
    let vacancy = gross_annual_rent * pct(rates.vacancy);
    let rent_default = gross_annual_rent * pct(rates.rent_default);
    let management = gross_annual_rent * pct(rates.management);
    let net_annual_rent = gross_annual_rent - vacancy - rent_default - management;

    let maintenance = total_investment * pct(rates.maintenance);
    let iptu = total_investment * pct(rates.iptu);
    let insurance = total_investment * pct(rates.insurance);
    let annual_operating_costs = maintenance + iptu + insurance;

    let net_annual_result = net_annual_rent - annual_operating_costs;
    let annual_roi = percent_of(net_annual_result, total_investment, "annual rental ROI")?;
    let payback_years = if net_annual_result > Decimal::ZERO {
        let years = total_investment.checked_div(net_annual_result).ok_or_else(|| {
            AuctionFinanceError::NonFinite {
                context: format!("payback of {total_investment} at {net_annual_result} a year"),
            }
        })?;
        Some(years)
    } else {
        None
    };

    let accumulated_result = net_annual_result * Decimal::from(horizon_years);
    let horizon_roi = percent_of(accumulated_result, total_investment, "rental ROI over the horizon")?;

    Ok(RentalRoi {
        gross_annual_rent,
        net_annual_rent,
        annual_operating_costs,
        net_annual_result,
        annual_roi,
        payback_years,
        horizon_years,
        accumulated_result,
        horizon_roi,
        cost_breakdown: RentalCostBreakdown {
            vacancy,
            rent_default,
            management,
            maintenance,
            iptu,
            insurance,
        },
    })
}

/// Profit from reselling after `months`, net of selling costs and a flat
/// capital-gains tax on any gain over the total investment.
pub fn resale_roi(
    total_investment: Money,
    sale_price: Money,
    months: Months,
    rates: &ViabilityRates,
) -> AuctionFinanceResult<ResaleRoi> {
    require_positive_investment(total_investment)?;
    if months == 0 {
        return Err(AuctionFinanceError::InvalidInput {
            field: "resale_months".into(),
            reason: "Resale period must be at least 1 month".into(),
        });
    }

    let broker_commission = sale_price * pct(rates.resale_broker);
    let itbi = sale_price * pct(rates.resale_itbi);
    let marketing = sale_price * pct(rates.resale_marketing);

    let gain = sale_price - total_investment;
    let capital_gains_tax = if gain > Decimal::ZERO {
        gain * pct(rates.resale_capital_gains_tax)
    } else {
        Decimal::ZERO
    };

    let total_sale_costs = broker_commission + itbi + marketing + capital_gains_tax;
    let net_sale_proceeds = sale_price - total_sale_costs;
    let net_profit = net_sale_proceeds - total_investment;

    let total_roi = percent_of(net_profit, total_investment, "resale ROI")?;
    let annual_roi = (total_roi / Decimal::from(months))
        .checked_mul(dec!(12))
        .ok_or_else(|| AuctionFinanceError::NonFinite {
            context: format!("annual resale ROI over {months} months"),
        })?;

    Ok(ResaleRoi {
        estimated_sale_price: sale_price,
        total_sale_costs,
        net_sale_proceeds,
        net_profit,
        total_roi,
        annual_roi,
        months,
        cost_breakdown: ResaleCostBreakdown {
            broker_commission,
            itbi,
            marketing,
            capital_gains_tax,
        },
    })
}

/// Rental ROI with the rent moved down and up by `variation` percent.
pub fn rent_sensitivity(
    total_investment: Money,
    base_rent: Money,
    variation: Percent,
    horizon_years: u32,
    rates: &ViabilityRates,
) -> AuctionFinanceResult<RentSensitivity> {
    let swing = pct(variation);
    let scenario = |rent: Money| -> AuctionFinanceResult<RentScenario> {
        let roi = rental_roi(total_investment, rent, horizon_years, rates)?;
        Ok(RentScenario {
            monthly_rent: rent,
            annual_roi: roi.annual_roi,
            payback_years: roi.payback_years,
            net_annual_result: roi.net_annual_result,
        })
    };

    Ok(RentSensitivity {
        pessimistic: scenario(base_rent * (Decimal::ONE - swing))?,
        realistic: scenario(base_rent)?,
        optimistic: scenario(base_rent * (Decimal::ONE + swing))?,
    })
}

/// Rental versus resale; rental wins only with a strictly higher annual ROI.
pub fn compare_strategies(
    total_investment: Money,
    monthly_rent: Money,
    sale_price: Money,
    resale_months: Months,
    horizon_years: u32,
    rates: &ViabilityRates,
) -> AuctionFinanceResult<StrategyComparison> {
    let rental = rental_roi(total_investment, monthly_rent, horizon_years, rates)?;
    let resale = resale_roi(total_investment, sale_price, resale_months, rates)?;

    let recommended = if rental.annual_roi > resale.annual_roi {
        Strategy::Rental
    } else {
        Strategy::Resale
    };

    Ok(StrategyComparison {
        rental: RentalSummary {
            annual_roi: rental.annual_roi,
            payback_years: rental.payback_years,
            annual_result: rental.net_annual_result,
            strategy: "Recurring passive income".into(),
        },
        resale: ResaleSummary {
            annual_roi: resale.annual_roi,
            payback_years: Decimal::from(resale_months) / dec!(12),
            total_result: resale.net_profit,
            strategy: "One-off capital gain".into(),
        },
        recommended,
    })
}

fn require_positive_investment(total_investment: Money) -> AuctionFinanceResult<()> {
    if total_investment <= Decimal::ZERO {
        return Err(AuctionFinanceError::InvalidInput {
            field: "total_investment".into(),
            reason: "Total investment must be greater than zero".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOTAL: Decimal = dec!(257500);

    #[test]
    fn test_rental_roi_known_answer() {
        let r = rental_roi(TOTAL, dec!(1800), 10, &ViabilityRates::default()).unwrap();
        assert_eq!(r.gross_annual_rent, dec!(21600));
        assert_eq!(r.net_annual_rent, dec!(17496));
        assert_eq!(r.annual_operating_costs, dec!(8497.5));
        assert_eq!(r.net_annual_result, dec!(8998.5));
        assert!((r.annual_roi - dec!(3.4946)).abs() < dec!(0.001));
        let payback = r.payback_years.unwrap();
        assert!((payback - dec!(28.616)).abs() < dec!(0.01));
        assert_eq!(r.accumulated_result, dec!(89985));
    }

    #[test]
    fn test_rental_never_pays_back() {
        let r = rental_roi(TOTAL, dec!(100), 10, &ViabilityRates::default()).unwrap();
        assert!(r.net_annual_result < Decimal::ZERO);
        assert_eq!(r.payback_years, None);
    }

    #[test]
    fn test_rental_rejects_zero_investment() {
        assert!(rental_roi(Decimal::ZERO, dec!(1000), 10, &ViabilityRates::default()).is_err());
    }

    #[test]
    fn test_resale_roi_known_answer() {
        let r = resale_roi(TOTAL, dec!(280000), 12, &ViabilityRates::default()).unwrap();
        assert_eq!(r.cost_breakdown.capital_gains_tax, dec!(3375));
        assert_eq!(r.total_sale_costs, dec!(28575));
        assert_eq!(r.net_sale_proceeds, dec!(251425));
        assert_eq!(r.net_profit, dec!(-6075));
        assert_eq!(r.annual_roi, r.total_roi);
    }

    #[test]
    fn test_resale_no_tax_below_cost() {
        let r = resale_roi(TOTAL, dec!(200000), 6, &ViabilityRates::default()).unwrap();
        assert_eq!(r.cost_breakdown.capital_gains_tax, Decimal::ZERO);
        assert_eq!(r.annual_roi, r.total_roi * dec!(2));
    }

    #[test]
    fn test_resale_zero_months_rejected() {
        let err = resale_roi(TOTAL, dec!(280000), 0, &ViabilityRates::default()).unwrap_err();
        assert_eq!(err.fields(), vec!["resale_months".to_string()]);
    }

    #[test]
    fn test_rent_sensitivity_ordering() {
        let s = rent_sensitivity(TOTAL, dec!(1800), dec!(20), 10, &ViabilityRates::default()).unwrap();
        assert_eq!(s.pessimistic.monthly_rent, dec!(1440));
        assert_eq!(s.optimistic.monthly_rent, dec!(2160));
        assert!(s.pessimistic.annual_roi < s.realistic.annual_roi);
        assert!(s.realistic.annual_roi < s.optimistic.annual_roi);
    }

    #[test]
    fn test_compare_prefers_rental_when_resale_loses() {
        let c = compare_strategies(TOTAL, dec!(1800), dec!(280000), 12, 10, &ViabilityRates::default())
            .unwrap();
        assert_eq!(c.recommended, Strategy::Rental);
        assert_eq!(c.resale.payback_years, dec!(1));
        assert_eq!(c.resale.total_result, dec!(-6075));
    }

    #[test]
    fn test_compare_prefers_resale_on_strong_flip() {
        let c = compare_strategies(TOTAL, dec!(1800), dec!(400000), 12, 10, &ViabilityRates::default())
            .unwrap();
        assert_eq!(c.recommended, Strategy::Resale);
    }
}
