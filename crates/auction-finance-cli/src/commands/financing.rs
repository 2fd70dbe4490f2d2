use clap::{Args, ValueEnum};
use serde_json::{json, Map, Value};

use auction_finance_core::assumptions::MarketAssumptions;
use auction_finance_core::service;

use super::into_result;
use crate::input;

/// Arguments for the full financing calculation
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON input file with the purchase parameters
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the pessimistic / optimistic / no-rental analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON input file with the base-case parameters
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a quick estimate
#[derive(Args)]
pub struct QuickEstimateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Auction price of the property
    #[arg(long)]
    pub property_value: Option<String>,

    /// Cash down payment
    #[arg(long)]
    pub down_payment: Option<String>,

    /// Annual interest rate in percent (e.g. 7.1)
    #[arg(long)]
    pub interest_rate: Option<String>,

    /// Loan term in months
    #[arg(long)]
    pub loan_term: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SystemArg {
    Price,
    Sac,
}

impl SystemArg {
    fn as_str(self) -> &'static str {
        match self {
            SystemArg::Price => "price",
            SystemArg::Sac => "sac",
        }
    }
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct AmortizationArgs {
    /// Path to JSON input file with loan parameters
    #[arg(long)]
    pub input: Option<String>,

    /// Amortization system; overrides the input body
    #[arg(long, value_enum)]
    pub system: Option<SystemArg>,

    /// Maximum rows to print; overrides the input body
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn run_calculate(
    args: CalculateArgs,
    assumptions: &MarketAssumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let body = input::request_body(args.input.as_deref(), "financing calculation")?;
    into_result(service::handle_calculate_with(&body, assumptions))
}

pub fn run_sensitivity(
    args: SensitivityArgs,
    assumptions: &MarketAssumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let body = input::request_body(args.input.as_deref(), "sensitivity analysis")?;
    into_result(service::handle_sensitivity_with(&body, assumptions))
}

pub fn run_quick_estimate(
    args: QuickEstimateArgs,
    assumptions: &MarketAssumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let body = if let Some(ref path) = args.input {
        input::file::read_json_value(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        let mut body = Map::new();
        let property_value = args
            .property_value
            .ok_or("--property-value is required (or provide --input)")?;
        body.insert("property_value".into(), json!(property_value));
        if let Some(v) = args.down_payment {
            body.insert("down_payment".into(), json!(v));
        }
        if let Some(v) = args.interest_rate {
            body.insert("interest_rate".into(), json!(v));
        }
        if let Some(v) = args.loan_term {
            body.insert("loan_term".into(), json!(v));
        }
        Value::Object(body)
    };
    into_result(service::handle_quick_estimate_with(&body, assumptions))
}

pub fn run_amortization(
    args: AmortizationArgs,
    assumptions: &MarketAssumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut body = input::request_body(args.input.as_deref(), "amortization schedule")?;
    if let Value::Object(ref mut map) = body {
        if let Some(system) = args.system {
            map.insert("system".into(), json!(system.as_str()));
        }
        if let Some(limit) = args.limit {
            map.insert("row_limit".into(), json!(limit));
        }
    }
    into_result(service::handle_amortization_table_with(&body, assumptions))
}

pub fn run_market_rates(assumptions: &MarketAssumptions) -> Result<Value, Box<dyn std::error::Error>> {
    into_result(service::handle_market_rates_with(assumptions))
}
