use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;

use crate::assumptions::MarketAssumptions;
use crate::error::AuctionFinanceError;
use crate::time_value::{level_payment, monthly_rate};
use crate::types::{cents, check_amount, check_rate, with_metadata, ComputationOutput, Money, Months, Percent};
use crate::AuctionFinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Repayment system for a mortgage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmortizationSystem {
    /// Fixed installment: constant payment, declining interest share
    #[default]
    Price,
    /// Constant amortization: constant principal share, declining payment
    Sac,
}

impl AmortizationSystem {
    pub fn label(self) -> &'static str {
        match self {
            AmortizationSystem::Price => "PRICE",
            AmortizationSystem::Sac => "SAC",
        }
    }
}

impl fmt::Display for AmortizationSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AmortizationSystem {
    type Err = AuctionFinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(AmortizationSystem::Price),
            "sac" => Ok(AmortizationSystem::Sac),
            other => Err(AuctionFinanceError::InvalidInput {
                field: "system".into(),
                reason: format!("Unknown amortization system '{other}' (expected price or sac)"),
            }),
        }
    }
}

/// Level payment and its totals over the full term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPayment {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: Months,
    pub monthly_payment: Money,
    pub interest_payment: Money,
    pub amortization: Money,
    /// Outstanding balance after this month's payment, never below zero
    pub balance: Money,
}

/// Input for the amortization table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationTableInput {
    pub property_value: Money,
    #[serde(default)]
    pub down_payment: Money,
    pub interest_rate: Percent,
    pub loan_term: Months,
    #[serde(default)]
    pub system: AmortizationSystem,
    /// Rows to return; falls back to the configured limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub principal: Money,
    pub total_payments: Money,
    pub total_interest: Money,
    pub loan_term_months: Months,
    pub interest_rate: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationTable {
    /// "PRICE" or "SAC"
    pub system: String,
    pub summary: AmortizationSummary,
    pub table: Vec<AmortizationRow>,
    pub showing_months: usize,
    pub total_months: usize,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Level monthly payment plus total interest for a fixed-installment loan.
pub fn loan_payment(principal: Money, annual_rate: Percent, term: Months) -> AuctionFinanceResult<LoanPayment> {
    let monthly_payment = level_payment(principal, monthly_rate(annual_rate), term)?;
    let total_paid = monthly_payment * Decimal::from(term);
    Ok(LoanPayment {
        monthly_payment,
        total_interest: total_paid - principal,
        total_paid,
    })
}

/// Full month-by-month schedule, rounded to cents.
pub fn build_schedule(
    principal: Money,
    annual_rate: Percent,
    term: Months,
    system: AmortizationSystem,
) -> AuctionFinanceResult<Vec<AmortizationRow>> {
    let mut rows = Vec::new();
    walk_schedule(principal, annual_rate, term, system, |r| rows.push(r))?;
    Ok(rows)
}

/// Feed each month's row to `visit` without holding the schedule in memory.
/// The payment is settled before the first row is produced.
fn walk_schedule(
    principal: Money,
    annual_rate: Percent,
    term: Months,
    system: AmortizationSystem,
    mut visit: impl FnMut(AmortizationRow),
) -> AuctionFinanceResult<()> {
    if term == 0 {
        return Err(AuctionFinanceError::DivisionByZero {
            context: "amortization schedule over zero months".into(),
        });
    }

    let rate = monthly_rate(annual_rate);
    let level = match system {
        AmortizationSystem::Price => Some(level_payment(principal, rate, term)?),
        AmortizationSystem::Sac => None,
    };
    let constant_amortization = principal / Decimal::from(term);
    let mut balance = principal;

    for month in 1..=term {
        let interest = balance * rate;
        let (payment, amortization) = match level {
            Some(payment) => (payment, payment - interest),
            None => (constant_amortization + interest, constant_amortization),
        };
        balance -= amortization;
        visit(row(month, payment, interest, amortization, balance));
    }

    Ok(())
}

/// Amortization table truncated to the configured row limit (60 by default).
pub fn amortization_table(
    input: &AmortizationTableInput,
) -> AuctionFinanceResult<ComputationOutput<AmortizationTable>> {
    amortization_table_with(input, &MarketAssumptions::default())
}

pub fn amortization_table_with(
    input: &AmortizationTableInput,
    assumptions: &MarketAssumptions,
) -> AuctionFinanceResult<ComputationOutput<AmortizationTable>> {
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

    if input.loan_term > assumptions.max_loan_term_months {
        return Err(AuctionFinanceError::InvalidInput {
            field: "loan_term".into(),
            reason: format!(
                "Loan term of {} months exceeds the {}-month maximum",
                input.loan_term, assumptions.max_loan_term_months
            ),
        });
    }

    let principal = input.property_value - input.down_payment;
    if principal <= Decimal::ZERO {
        warnings.push(format!(
            "Down payment covers the property value; principal is {principal}"
        ));
    }

    debug!(
        %principal,
        rate = %input.interest_rate,
        term = input.loan_term,
        system = %input.system,
        "building amortization schedule"
    );

    let limit = input.row_limit.unwrap_or(assumptions.amortization_row_limit);
    let mut rows = Vec::with_capacity(limit.min(input.loan_term as usize));
    let mut total_payments = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_months = 0usize;

    walk_schedule(principal, input.interest_rate, input.loan_term, input.system, |r| {
        total_payments += r.monthly_payment;
        total_interest += r.interest_payment;
        total_months += 1;
        if rows.len() < limit {
            rows.push(r);
        }
    })?;

    let output = AmortizationTable {
        system: input.system.label().to_string(),
        summary: AmortizationSummary {
            principal: cents(principal),
            total_payments: cents(total_payments),
            total_interest: cents(total_interest),
            loan_term_months: input.loan_term,
            interest_rate: input.interest_rate,
        },
        showing_months: rows.len(),
        total_months,
        table: rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!("Amortization Schedule ({})", input.system),
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn row(month: Months, payment: Money, interest: Money, amortization: Money, balance: Money) -> AmortizationRow {
    AmortizationRow {
        month,
        monthly_payment: cents(payment),
        interest_payment: cents(interest),
        amortization: cents(amortization),
        balance: cents(balance.max(Decimal::ZERO)),
    }
}
