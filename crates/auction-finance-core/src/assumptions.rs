//! Market constants and policy thresholds read by every calculator.
//!
//! Everything here is plain data with serde defaults, so a partial JSON or YAML
//! file only needs to name the values it overrides.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Months, Percent};

/// Benchmark annual rates shown next to every result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkRates {
    pub cdi: Percent,
    pub savings: Percent,
    pub stocks: Percent,
}

impl Default for BenchmarkRates {
    fn default() -> Self {
        Self {
            cdi: dec!(12.5),
            savings: dec!(6.2),
            stocks: dec!(15.0),
        }
    }
}

/// Ratios used when the caller leaves an input unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultRatios {
    /// Documentation / registry costs as % of property value
    pub documentation: Percent,
    /// Monthly rent as % of property value
    pub monthly_rent: Percent,
    /// Sale price as % of property value
    pub sale_price: Percent,
}

impl Default for DefaultRatios {
    fn default() -> Self {
        Self {
            documentation: dec!(5),
            monthly_rent: dec!(0.6),
            sale_price: dec!(120),
        }
    }
}

/// Multipliers applied to the base case when deriving sensitivity scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioMultipliers {
    pub pessimistic_sale_price: Decimal,
    pub pessimistic_maintenance: Decimal,
    pub pessimistic_rental_cut_months: Months,
    pub optimistic_sale_price: Decimal,
    pub optimistic_maintenance: Decimal,
    pub optimistic_rent: Decimal,
}

impl Default for ScenarioMultipliers {
    fn default() -> Self {
        Self {
            pessimistic_sale_price: dec!(0.8),
            pessimistic_maintenance: dec!(1.5),
            pessimistic_rental_cut_months: 6,
            optimistic_sale_price: dec!(1.2),
            optimistic_maintenance: dec!(0.8),
            optimistic_rent: dec!(1.1),
        }
    }
}

/// Thresholds behind the risk factors and recommendations. The money amounts
/// are in the same currency unit as the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Investment above which a liquidity risk is flagged
    pub liquidity_investment: Money,
    /// Investment above which diversification is recommended
    pub diversification_investment: Money,
    /// Annual return (%) below which the effort is questioned
    pub low_annual_return: Percent,
    /// Fraction of the base annual return the no-rental case must keep
    pub vacancy_return_floor: Decimal,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            liquidity_investment: dec!(100000),
            diversification_investment: dec!(200000),
            low_annual_return: dec!(10),
            vacancy_return_floor: dec!(0.5),
        }
    }
}

/// Lender financing rates (% a year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingRates {
    pub caixa_sac: Percent,
    pub caixa_price: Percent,
    pub banco_brasil: Percent,
    pub itau: Percent,
    pub bradesco: Percent,
    pub santander: Percent,
}

impl Default for FinancingRates {
    fn default() -> Self {
        Self {
            caixa_sac: dec!(7.1),
            caixa_price: dec!(7.3),
            banco_brasil: dec!(7.5),
            itau: dec!(8.2),
            bradesco: dec!(8.0),
            santander: dec!(8.1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentRates {
    pub cdi: Percent,
    pub selic: Percent,
    pub savings: Percent,
    pub cdb: Percent,
    pub lci_lca: Percent,
    pub stocks_ibovespa: Percent,
}

impl Default for InvestmentRates {
    fn default() -> Self {
        Self {
            cdi: dec!(12.5),
            selic: dec!(11.75),
            savings: dec!(6.2),
            cdb: dec!(12.8),
            lci_lca: dec!(10.5),
            stocks_ibovespa: dec!(15.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealEstateRates {
    pub average_yield: Percent,
    pub appreciation_rate: Percent,
    pub vacancy_rate: Percent,
    pub management_fee: Percent,
}

impl Default for RealEstateRates {
    fn default() -> Self {
        Self {
            average_yield: dec!(6.5),
            appreciation_rate: dec!(5.2),
            vacancy_rate: dec!(8.5),
            management_fee: dec!(8.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicIndicators {
    pub inflation_ipca: Percent,
    pub inflation_igpm: Percent,
    /// BRL per USD
    pub dollar_rate: Decimal,
    pub unemployment_rate: Percent,
}

impl Default for EconomicIndicators {
    fn default() -> Self {
        Self {
            inflation_ipca: dec!(4.68),
            inflation_igpm: dec!(5.12),
            dollar_rate: dec!(5.15),
            unemployment_rate: dec!(8.2),
        }
    }
}

/// Reference rate table published alongside the calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketRates {
    pub financing: FinancingRates,
    pub investments: InvestmentRates,
    pub real_estate: RealEstateRates,
    pub economic_indicators: EconomicIndicators,
    pub last_updated: DateTime<Utc>,
}

impl Default for MarketRates {
    fn default() -> Self {
        Self {
            financing: FinancingRates::default(),
            investments: InvestmentRates::default(),
            real_estate: RealEstateRates::default(),
            economic_indicators: EconomicIndicators::default(),
            last_updated: Utc
                .with_ymd_and_hms(2024, 1, 15, 10, 0, 0)
                .single()
                .unwrap_or_default(),
        }
    }
}

/// Cost and income rates for the simplified buy-to-let / flip viability model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViabilityRates {
    /// Property transfer tax on the winning bid
    pub itbi: Percent,
    pub notary: Percent,
    pub auctioneer_fee: Percent,
    /// Margin added on top of the renovation budget
    pub renovation_contingency: Percent,
    pub vacancy: Percent,
    pub rent_default: Percent,
    pub management: Percent,
    /// Annual, on total investment
    pub maintenance: Percent,
    /// Annual, on total investment
    pub iptu: Percent,
    /// Annual, on total investment
    pub insurance: Percent,
    pub resale_broker: Percent,
    pub resale_itbi: Percent,
    pub resale_marketing: Percent,
    pub resale_capital_gains_tax: Percent,
}

impl Default for ViabilityRates {
    fn default() -> Self {
        Self {
            itbi: dec!(2),
            notary: dec!(1.5),
            auctioneer_fee: dec!(5),
            renovation_contingency: dec!(25),
            vacancy: dec!(8),
            rent_default: dec!(3),
            management: dec!(8),
            maintenance: dec!(2),
            iptu: dec!(1),
            insurance: dec!(0.3),
            resale_broker: dec!(6),
            resale_itbi: dec!(2),
            resale_marketing: dec!(1),
            resale_capital_gains_tax: dec!(15),
        }
    }
}

/// Every constant the calculators depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketAssumptions {
    /// Annual inflation (%) subtracted to get the real return
    pub inflation_rate: Percent,
    pub benchmarks: BenchmarkRates,
    pub capital_gains_tax_rate: Percent,
    pub defaults: DefaultRatios,
    pub scenarios: ScenarioMultipliers,
    pub risk: RiskThresholds,
    /// Rows returned by the amortization table before truncation
    pub amortization_row_limit: usize,
    /// Longest loan term the amortization table will schedule
    pub max_loan_term_months: Months,
    pub market_rates: MarketRates,
    pub viability: ViabilityRates,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            inflation_rate: dec!(4.68),
            benchmarks: BenchmarkRates::default(),
            capital_gains_tax_rate: dec!(15),
            defaults: DefaultRatios::default(),
            scenarios: ScenarioMultipliers::default(),
            risk: RiskThresholds::default(),
            amortization_row_limit: 60,
            max_loan_term_months: 600,
            market_rates: MarketRates::default(),
            viability: ViabilityRates::default(),
        }
    }
}

impl MarketAssumptions {
    /// Parse a (possibly partial) JSON document; unspecified keys keep their defaults.
    pub fn from_json_str(s: &str) -> crate::AuctionFinanceResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let a = MarketAssumptions::from_json_str(
            r#"{"inflation_rate": "3.5", "benchmarks": {"cdi": 10}}"#,
        )
        .unwrap();
        assert_eq!(a.inflation_rate, dec!(3.5));
        assert_eq!(a.benchmarks.cdi, dec!(10));
        assert_eq!(a.benchmarks.savings, dec!(6.2));
        assert_eq!(a.capital_gains_tax_rate, dec!(15));
        assert_eq!(a.amortization_row_limit, 60);
        assert_eq!(a.max_loan_term_months, 600);
    }

    #[test]
    fn test_market_rates_timestamp() {
        let rates = MarketRates::default();
        assert_eq!(rates.last_updated.to_rfc3339(), "2024-01-15T10:00:00+00:00");
    }
}
