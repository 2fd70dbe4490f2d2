use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::assumptions::ViabilityRates;
use crate::error::AuctionFinanceError;
use crate::types::{pct, Money};
use crate::AuctionFinanceResult;

/// Cash needed to take an auctioned property from hammer to habitable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentBreakdown {
    pub winning_bid: Money,
    /// Property transfer tax
    pub itbi: Money,
    pub notary: Money,
    pub auctioneer_fee: Money,
    pub renovation_budget: Money,
    pub renovation_with_contingency: Money,
    pub other_costs: Money,
    pub total_investment: Money,
}

/// Winning bid plus transfer tax, notary, auctioneer, padded renovation and extras.
pub fn investment_total(
    winning_bid: Money,
    renovation_budget: Money,
    additional_costs: &BTreeMap<String, Money>,
    rates: &ViabilityRates,
) -> AuctionFinanceResult<InvestmentBreakdown> {
    if winning_bid <= Decimal::ZERO {
        return Err(AuctionFinanceError::InvalidInput {
            field: "winning_bid".into(),
            reason: "Winning bid must be greater than zero".into(),
        });
    }
    if renovation_budget < Decimal::ZERO {
        return Err(AuctionFinanceError::InvalidInput {
            field: "renovation_budget".into(),
            reason: "Renovation budget cannot be negative".into(),
        });
    }

    let itbi = winning_bid * pct(rates.itbi);
    let notary = winning_bid * pct(rates.notary);
    let auctioneer_fee = winning_bid * pct(rates.auctioneer_fee);
    let renovation_with_contingency =
        renovation_budget * (Decimal::ONE + pct(rates.renovation_contingency));
    let other_costs: Money = additional_costs.values().copied().sum();

    let total_investment =
        winning_bid + itbi + notary + auctioneer_fee + renovation_with_contingency + other_costs;

    Ok(InvestmentBreakdown {
        winning_bid,
        itbi,
        notary,
        auctioneer_fee,
        renovation_budget,
        renovation_with_contingency,
        other_costs,
        total_investment,
    })
}
