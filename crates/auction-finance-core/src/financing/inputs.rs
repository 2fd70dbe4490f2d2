use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::DefaultRatios;
use crate::types::{check_amount, check_rate, pct, Money, Months, Percent};
use crate::AuctionFinanceResult;

pub(crate) fn default_interest_rate() -> Percent {
    dec!(7.1)
}

pub(crate) fn default_loan_term() -> Months {
    360
}

fn default_auction_commission() -> Percent {
    dec!(5)
}

fn default_time_to_sell() -> Months {
    22
}

fn default_rental_time() -> Months {
    18
}

fn default_broker_commission() -> Percent {
    dec!(6)
}

fn default_true() -> bool {
    true
}

/// Everything needed to evaluate one financed auction purchase, from bid to resale.
///
/// The value is never mutated by the calculators. Scenario variants are built with
/// struct update syntax over a clone, so the caller's record stays untouched.
///
/// `documentation_costs`, `sale_price` and `monthly_rent` are optional: `None`
/// means "derive from the property value", while `Some(0)` is an explicit zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingInputs {
    /// Auction price paid for the property
    pub property_value: Money,
    /// Value declared on the deed (informational)
    #[serde(default)]
    pub declared_value: Money,
    #[serde(default)]
    pub down_payment: Money,

    /// Annual interest rate (%)
    #[serde(default = "default_interest_rate")]
    pub interest_rate: Percent,
    /// Loan term in months
    #[serde(default = "default_loan_term")]
    pub loan_term: Months,

    /// Documentation and registry costs; defaults to 5% of property value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_costs: Option<Money>,
    /// Auctioneer commission (% of property value)
    #[serde(default = "default_auction_commission")]
    pub auction_commission: Percent,

    #[serde(default)]
    pub water_bill: Money,
    #[serde(default)]
    pub electricity_bill: Money,
    #[serde(default)]
    pub condominium_fees: Money,
    #[serde(default)]
    pub iptu_arrears: Money,
    #[serde(default)]
    pub other_debts: Money,

    /// Expected resale price; defaults to 120% of property value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
    /// Months from acquisition to sale
    #[serde(default = "default_time_to_sell")]
    pub time_to_sell: Months,
    /// Months the unit is rented before the sale
    #[serde(default = "default_rental_time")]
    pub rental_time: Months,
    /// Monthly rent; defaults to 0.6% of property value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rent: Option<Money>,
    #[serde(default)]
    pub monthly_iptu: Money,
    #[serde(default)]
    pub monthly_condominium: Money,
    #[serde(default)]
    pub maintenance_reforms: Money,
    /// Broker commission on the sale (%)
    #[serde(default = "default_broker_commission")]
    pub broker_commission: Percent,

    #[serde(default = "default_true")]
    pub is_first_property: bool,
    #[serde(default = "default_true")]
    pub will_reinvest: bool,
}

impl FinancingInputs {
    /// A record with every optional field at its documented default.
    pub fn new(property_value: Money) -> Self {
        Self {
            property_value,
            declared_value: Decimal::ZERO,
            down_payment: Decimal::ZERO,
            interest_rate: default_interest_rate(),
            loan_term: default_loan_term(),
            documentation_costs: None,
            auction_commission: default_auction_commission(),
            water_bill: Decimal::ZERO,
            electricity_bill: Decimal::ZERO,
            condominium_fees: Decimal::ZERO,
            iptu_arrears: Decimal::ZERO,
            other_debts: Decimal::ZERO,
            sale_price: None,
            time_to_sell: default_time_to_sell(),
            rental_time: default_rental_time(),
            monthly_rent: None,
            monthly_iptu: Decimal::ZERO,
            monthly_condominium: Decimal::ZERO,
            maintenance_reforms: Decimal::ZERO,
            broker_commission: default_broker_commission(),
            is_first_property: true,
            will_reinvest: true,
        }
    }

    /// Amount financed. May be zero or negative when the down payment covers the price.
    pub fn principal(&self) -> Money {
        self.property_value - self.down_payment
    }

    /// Debts inherited with the property at acquisition.
    pub fn pending_debts(&self) -> Money {
        self.water_bill + self.electricity_bill + self.condominium_fees + self.iptu_arrears + self.other_debts
    }

    pub fn auction_commission_value(&self) -> Money {
        self.property_value * pct(self.auction_commission)
    }

    pub fn effective_documentation_costs(&self, defaults: &DefaultRatios) -> Money {
        self.documentation_costs
            .unwrap_or_else(|| self.property_value * pct(defaults.documentation))
    }

    pub fn effective_sale_price(&self, defaults: &DefaultRatios) -> Money {
        self.sale_price
            .unwrap_or_else(|| self.property_value * pct(defaults.sale_price))
    }

    pub fn effective_monthly_rent(&self, defaults: &DefaultRatios) -> Money {
        self.monthly_rent
            .unwrap_or_else(|| self.property_value * pct(defaults.monthly_rent))
    }

    /// Fail on the first amount or rate too large to compute with.
    pub fn check_bounds(&self) -> AuctionFinanceResult<()> {
        let amounts = [
            ("property_value", Some(self.property_value)),
            ("declared_value", Some(self.declared_value)),
            ("down_payment", Some(self.down_payment)),
            ("documentation_costs", self.documentation_costs),
            ("water_bill", Some(self.water_bill)),
            ("electricity_bill", Some(self.electricity_bill)),
            ("condominium_fees", Some(self.condominium_fees)),
            ("iptu_arrears", Some(self.iptu_arrears)),
            ("other_debts", Some(self.other_debts)),
            ("sale_price", self.sale_price),
            ("monthly_rent", self.monthly_rent),
            ("monthly_iptu", Some(self.monthly_iptu)),
            ("monthly_condominium", Some(self.monthly_condominium)),
            ("maintenance_reforms", Some(self.maintenance_reforms)),
        ];
        for (field, value) in amounts {
            if let Some(v) = value {
                check_amount(field, v)?;
            }
        }

        check_rate("interest_rate", self.interest_rate)?;
        check_rate("auction_commission", self.auction_commission)?;
        check_rate("broker_commission", self.broker_commission)
    }

    /// Copy with every defaultable field pinned to its effective value.
    pub fn resolved(&self, defaults: &DefaultRatios) -> Self {
        Self {
            documentation_costs: Some(self.effective_documentation_costs(defaults)),
            sale_price: Some(self.effective_sale_price(defaults)),
            monthly_rent: Some(self.effective_monthly_rent(defaults)),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_unset_fields() {
        let input = FinancingInputs::new(dec!(100000));
        let d = DefaultRatios::default();
        assert_eq!(input.effective_documentation_costs(&d), dec!(5000));
        assert_eq!(input.effective_sale_price(&d), dec!(120000));
        assert_eq!(input.effective_monthly_rent(&d), dec!(600));
    }

    #[test]
    fn test_explicit_zero_is_kept() {
        let input = FinancingInputs {
            monthly_rent: Some(Decimal::ZERO),
            documentation_costs: Some(Decimal::ZERO),
            ..FinancingInputs::new(dec!(100000))
        };
        let d = DefaultRatios::default();
        assert_eq!(input.effective_monthly_rent(&d), Decimal::ZERO);
        assert_eq!(input.effective_documentation_costs(&d), Decimal::ZERO);
    }

    #[test]
    fn test_pending_debts_sum() {
        let input = FinancingInputs {
            water_bill: dec!(100),
            electricity_bill: dec!(50),
            condominium_fees: dec!(1200),
            iptu_arrears: dec!(891),
            other_debts: dec!(9),
            ..FinancingInputs::new(dec!(100000))
        };
        assert_eq!(input.pending_debts(), dec!(2250));
    }

    #[test]
    fn test_serde_defaults_match_constructor() {
        let parsed: FinancingInputs =
            serde_json::from_str(r#"{"property_value": "191280"}"#).unwrap();
        assert_eq!(parsed, FinancingInputs::new(dec!(191280)));
    }

    #[test]
    fn test_check_bounds_names_the_field() {
        assert!(FinancingInputs::new(dec!(191280)).check_bounds().is_ok());

        let huge = FinancingInputs {
            sale_price: Some(dec!(70000000000000000000000000000)),
            ..FinancingInputs::new(dec!(191280))
        };
        let err = huge.check_bounds().unwrap_err();
        assert_eq!(err.fields(), vec!["sale_price".to_string()]);

        let usurious = FinancingInputs {
            interest_rate: dec!(5000),
            ..FinancingInputs::new(dec!(191280))
        };
        assert_eq!(
            usurious.check_bounds().unwrap_err().fields(),
            vec!["interest_rate".to_string()]
        );
    }

    #[test]
    fn test_resolved_pins_defaults() {
        let r = FinancingInputs::new(dec!(200000)).resolved(&DefaultRatios::default());
        assert_eq!(r.sale_price, Some(dec!(240000)));
        assert_eq!(r.monthly_rent, Some(dec!(1200)));
        assert_eq!(r.documentation_costs, Some(dec!(10000)));
    }
}
