use clap::Args;
use serde_json::Value;

use auction_finance_core::assumptions::MarketAssumptions;
use auction_finance_core::service;

use super::into_result;
use crate::input;

/// Arguments for the rental-versus-resale viability report
#[derive(Args)]
pub struct ViabilityArgs {
    /// Path to JSON input file with bid, renovation, rent and sale estimates
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_viability(
    args: ViabilityArgs,
    assumptions: &MarketAssumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let body = input::request_body(args.input.as_deref(), "viability report")?;
    into_result(service::handle_viability_with(&body, assumptions))
}
