mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use auction_finance_core::assumptions::MarketAssumptions;
use commands::financing::{AmortizationArgs, CalculateArgs, QuickEstimateArgs, SensitivityArgs};
use commands::viability::ViabilityArgs;

/// Financing viability for auctioned real estate
#[derive(Parser)]
#[command(
    name = "afc",
    version,
    about = "Financing viability for auctioned real estate",
    long_about = "A CLI for evaluating financed auction purchases with decimal precision. \
                  Covers loan payments, acquisition and carrying costs, resale taxes, \
                  scenario sensitivity with risk scoring, amortization schedules, and \
                  rental-versus-resale viability reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// JSON or YAML file overriding market assumptions
    #[arg(long, global = true)]
    assumptions: Option<String>,

    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full financing calculation: costs, income, taxes and returns
    Calculate(CalculateArgs),
    /// Base case plus pessimistic, optimistic and no-rental scenarios with risk scoring
    Sensitivity(SensitivityArgs),
    /// Payment, upfront cash and gross yield from a handful of numbers
    QuickEstimate(QuickEstimateArgs),
    /// Month-by-month Price or SAC schedule
    Amortization(AmortizationArgs),
    /// Rental versus resale report for an auction purchase
    Viability(ViabilityArgs),
    /// Reference financing, investment and economic rates
    MarketRates,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn load_assumptions(path: Option<&str>) -> Result<MarketAssumptions, Box<dyn std::error::Error>> {
    match path {
        Some(path) => input::file::read_assumptions(path),
        None => Ok(MarketAssumptions::default()),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let assumptions = match load_assumptions(cli.assumptions.as_deref()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::financing::run_calculate(args, &assumptions),
        Commands::Sensitivity(args) => commands::financing::run_sensitivity(args, &assumptions),
        Commands::QuickEstimate(args) => commands::financing::run_quick_estimate(args, &assumptions),
        Commands::Amortization(args) => commands::financing::run_amortization(args, &assumptions),
        Commands::Viability(args) => commands::viability::run_viability(args, &assumptions),
        Commands::MarketRates => commands::financing::run_market_rates(&assumptions),
        Commands::Version => {
            println!("afc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
