use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::assumptions::{BenchmarkRates, MarketAssumptions};
use crate::error::AuctionFinanceError;
use crate::financing::amortization::loan_payment;
use crate::financing::inputs::FinancingInputs;
use crate::time_value::{annualize, percent_of, present_value};
use crate::types::{pct, with_metadata, ComputationOutput, Money, Months, Percent};
use crate::AuctionFinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Every cost component by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub property_value: Money,
    pub documentation_costs: Money,
    pub auction_commission: Money,
    pub pending_debts: Money,
    pub broker_fee: Money,
    pub maintenance_reforms: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionEvent {
    pub month: Months,
    pub description: String,
    /// Cash out of pocket at closing (negative)
    pub cash_flow: Money,
    pub accumulated: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalPeriod {
    pub start_month: Months,
    pub end_month: Months,
    pub monthly_income: Money,
    pub monthly_costs: Money,
    pub net_monthly: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub month: Months,
    pub description: String,
    pub gross_value: Money,
    pub net_value: Money,
    /// Net sale value plus rental income, less the cash invested
    pub final_result: Money,
}

/// Cash-flow events from acquisition through sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub acquisition: AcquisitionEvent,
    pub rental_period: RentalPeriod,
    pub sale: SaleEvent,
}

/// Complete financing viability result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingResults {
    // Financing
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_financed: Money,

    // Costs
    pub total_acquisition_costs: Money,
    /// Installment plus monthly IPTU and condominium
    pub monthly_costs: Money,
    pub total_cost_until_sale: Money,
    pub present_value_costs: Money,

    // Income
    pub total_rental_income: Money,
    pub net_sale_value: Money,

    pub capital_gains_tax: Money,

    // Outcome
    pub final_profit: Money,
    /// Profit over cash invested (%)
    pub total_return: Percent,
    /// Compounded annual return over the holding period (%)
    pub annual_return: Percent,
    /// Annual return less inflation (%)
    pub real_return: Percent,
    /// Cash out of pocket: down payment, fees and inherited debts
    pub total_investment: Money,

    pub comparisons: BenchmarkRates,
    pub breakdown: CostBreakdown,
    pub timeline: Timeline,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full viability calculation with the default market assumptions.
pub fn calculate_financing(
    input: &FinancingInputs,
) -> AuctionFinanceResult<ComputationOutput<FinancingResults>> {
    calculate_financing_with(input, &MarketAssumptions::default())
}

pub fn calculate_financing_with(
    input: &FinancingInputs,
    assumptions: &MarketAssumptions,
) -> AuctionFinanceResult<ComputationOutput<FinancingResults>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.check_bounds()?;
    let output = compute(input, assumptions, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Auction Property Financing Viability (Price amortization)",
        &input.resolved(&assumptions.defaults),
        warnings,
        elapsed,
        output,
    ))
}

/// Capital-gains tax on resale.
///
/// Due only on a positive gain, and waived when the property is the seller's
/// first and the proceeds will be reinvested. Either flag alone being false
/// makes the gain taxable.
pub fn capital_gains_tax(
    sale_price: Money,
    property_value: Money,
    is_first_property: bool,
    will_reinvest: bool,
    tax_rate: Percent,
) -> Money {
    let gain = sale_price - property_value;
    let exempt = is_first_property && will_reinvest;
    if gain > Decimal::ZERO && !exempt {
        gain * pct(tax_rate)
    } else {
        Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Single pass over one input record; shared by the base case and every scenario.
pub(crate) fn compute(
    input: &FinancingInputs,
    assumptions: &MarketAssumptions,
    warnings: &mut Vec<String>,
) -> AuctionFinanceResult<FinancingResults> {
    let defaults = &assumptions.defaults;
    let documentation_costs = input.effective_documentation_costs(defaults);
    let monthly_rent = input.effective_monthly_rent(defaults);
    let sale_price = input.effective_sale_price(defaults);

    debug!(
        property_value = %input.property_value,
        down_payment = %input.down_payment,
        rate = %input.interest_rate,
        term = input.loan_term,
        %sale_price,
        "computing financing viability"
    );

    check_degenerate_inputs(input, warnings);

    // --- Financing ---
    let principal = input.principal();
    let loan = loan_payment(principal, input.interest_rate, input.loan_term)?;

    // --- Acquisition ---
    let auction_commission_value = input.auction_commission_value();
    let pending_debts = input.pending_debts();
    let total_acquisition_costs =
        input.property_value + documentation_costs + auction_commission_value + pending_debts;

    // --- Carrying costs until sale ---
    let monthly_costs = loan.monthly_payment + input.monthly_iptu + input.monthly_condominium;
    let total_cost_until_sale = total_acquisition_costs
        + monthly_costs * Decimal::from(input.time_to_sell)
        + input.maintenance_reforms;
    let present_value_costs = present_value(
        total_cost_until_sale,
        input.interest_rate,
        Decimal::from(input.time_to_sell) / dec!(12),
    )?;

    // --- Income ---
    let total_rental_income = monthly_rent * Decimal::from(input.rental_time);
    let broker_fee = sale_price * pct(input.broker_commission);
    let capital_gains_tax = capital_gains_tax(
        sale_price,
        input.property_value,
        input.is_first_property,
        input.will_reinvest,
        assumptions.capital_gains_tax_rate,
    );
    let net_sale_value = sale_price - broker_fee - capital_gains_tax;

    // --- Profitability ---
    let total_investment =
        input.down_payment + documentation_costs + auction_commission_value + pending_debts;
    let final_profit = net_sale_value + total_rental_income - total_cost_until_sale;

    let (total_return, annual_return) = if total_investment.is_zero() {
        warnings.push("Total investment is zero; return metrics reported as 0".into());
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let total_return = percent_of(final_profit, total_investment, "total return on investment")?;
        let ratio = Decimal::ONE + total_return / dec!(100);
        if ratio <= Decimal::ZERO {
            warnings.push(format!(
                "Losses of {final_profit} exceed the cash invested; annual return floored at -100%"
            ));
        }
        let annual_return = annualize(ratio, input.time_to_sell)?
            .checked_mul(dec!(100))
            .ok_or_else(|| AuctionFinanceError::NonFinite {
                context: format!("annual return over {} months", input.time_to_sell),
            })?;
        (total_return, annual_return)
    };
    let real_return = annual_return - assumptions.inflation_rate;

    let breakdown = CostBreakdown {
        property_value: input.property_value,
        documentation_costs,
        auction_commission: auction_commission_value,
        pending_debts,
        broker_fee,
        maintenance_reforms: input.maintenance_reforms,
        total_interest: loan.total_interest,
    };

    let timeline = Timeline {
        acquisition: AcquisitionEvent {
            month: 0,
            description: "Property acquisition".into(),
            cash_flow: -(input.down_payment + documentation_costs + auction_commission_value),
            accumulated: Decimal::ZERO,
        },
        rental_period: RentalPeriod {
            start_month: 1,
            end_month: input.rental_time,
            monthly_income: monthly_rent,
            monthly_costs,
            net_monthly: monthly_rent - monthly_costs,
        },
        sale: SaleEvent {
            month: input.time_to_sell,
            description: "Property sale".into(),
            gross_value: sale_price,
            net_value: net_sale_value,
            final_result: net_sale_value + total_rental_income - total_investment,
        },
    };

    Ok(FinancingResults {
        monthly_payment: loan.monthly_payment,
        total_interest: loan.total_interest,
        total_financed: principal,
        total_acquisition_costs,
        monthly_costs,
        total_cost_until_sale,
        present_value_costs,
        total_rental_income,
        net_sale_value,
        capital_gains_tax,
        final_profit,
        total_return,
        annual_return,
        real_return,
        total_investment,
        comparisons: assumptions.benchmarks.clone(),
        breakdown,
        timeline,
    })
}

fn check_degenerate_inputs(input: &FinancingInputs, warnings: &mut Vec<String>) {
    if input.property_value <= Decimal::ZERO {
        warn!(property_value = %input.property_value, "non-positive property value");
        warnings.push(format!(
            "Property value {} is not positive; results are not meaningful",
            input.property_value
        ));
    }

    let principal = input.principal();
    if principal <= Decimal::ZERO {
        warnings.push(format!(
            "Down payment covers the property value; financed principal is {principal}"
        ));
    }

    if input.rental_time > input.time_to_sell {
        warnings.push(format!(
            "Rental period of {} months exceeds the {}-month holding period",
            input.rental_time, input.time_to_sell
        ));
    }

    if input.time_to_sell > input.loan_term {
        warnings.push(format!(
            "Holding period of {} months outlasts the {}-month loan term",
            input.time_to_sell, input.loan_term
        ));
    }
}
