#![cfg(feature = "viability")]

use auction_finance_core::assumptions::{MarketAssumptions, ViabilityRates};
use auction_finance_core::service::handle_viability;
use auction_finance_core::viability::{
    compare_strategies, investment_total, viability_report, viability_report_with, Strategy,
    ViabilityReportInput,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use std::collections::BTreeMap;

fn house_flip() -> ViabilityReportInput {
    ViabilityReportInput {
        winning_bid: dec!(200000),
        renovation_budget: dec!(30000),
        monthly_rent: dec!(1800),
        estimated_sale_price: dec!(280000),
        additional_costs: BTreeMap::from([
            ("documents".to_string(), dec!(2000)),
            ("moving".to_string(), dec!(1000)),
        ]),
        rental_horizon_years: 10,
        resale_months: 12,
        rent_variation: dec!(20),
    }
}

// ===========================================================================
// Report
// ===========================================================================

#[test]
fn test_report_known_answers() {
    let report = viability_report(&house_flip()).unwrap().result;

    assert_eq!(report.investment.total_investment, dec!(257500));
    assert_eq!(report.rental.net_annual_result, dec!(8998.5));
    assert!((report.rental.annual_roi - dec!(3.4946)).abs() < dec!(0.0001));
    assert_eq!(report.resale.net_sale_proceeds, dec!(251425));
    assert_eq!(report.resale.net_profit, dec!(-6075));
    assert!((report.resale.total_roi - dec!(-2.3592)).abs() < dec!(0.0001));
    assert_eq!(report.summary.recommended_strategy, Strategy::Rental);
}

#[test]
fn test_cheaper_renovation_rates_raise_returns() {
    let mut assumptions = MarketAssumptions::default();
    assumptions.viability.renovation_contingency = Decimal::ZERO;
    let padded = viability_report(&house_flip()).unwrap().result;
    let lean = viability_report_with(&house_flip(), &assumptions).unwrap().result;

    assert_eq!(
        padded.investment.total_investment - lean.investment.total_investment,
        dec!(7500)
    );
    assert!(lean.rental.annual_roi > padded.rental.annual_roi);
}

#[test]
fn test_tie_goes_to_resale() {
    let rates = ViabilityRates {
        vacancy: Decimal::ZERO,
        rent_default: Decimal::ZERO,
        management: Decimal::ZERO,
        maintenance: Decimal::ZERO,
        iptu: Decimal::ZERO,
        insurance: Decimal::ZERO,
        resale_broker: Decimal::ZERO,
        resale_itbi: Decimal::ZERO,
        resale_marketing: Decimal::ZERO,
        resale_capital_gains_tax: Decimal::ZERO,
        ..ViabilityRates::default()
    };
    // Rent 1,000/month on 100,000 is 12% a year; resale at 112,000 after a year is also 12%
    let c = compare_strategies(dec!(100000), dec!(1000), dec!(112000), 12, 10, &rates).unwrap();
    assert_eq!(c.rental.annual_roi, c.resale.annual_roi);
    assert_eq!(c.recommended, Strategy::Resale);
}

#[test]
fn test_additional_costs_are_summed_by_name() {
    let extras = BTreeMap::from([
        ("legal".to_string(), dec!(1500.50)),
        ("eviction".to_string(), dec!(4000)),
        ("cleaning".to_string(), dec!(499.50)),
    ]);
    let b = investment_total(dec!(100000), Decimal::ZERO, &extras, &ViabilityRates::default()).unwrap();
    assert_eq!(b.other_costs, dec!(6000));
}

// ===========================================================================
// JSON boundary
// ===========================================================================

#[test]
fn test_viability_handler_success() {
    let resp = handle_viability(&json!({
        "winning_bid": 200000,
        "renovation_budget": "30000",
        "monthly_rent": 1800,
        "estimated_sale_price": 280000,
        "additional_costs": {"documents": 2000, "moving": "1000"},
    }));
    assert!(resp.is_success());
    assert_eq!(resp.body["report"]["summary"]["recommended_strategy"], json!("rental"));
    assert!(resp.body["report"]["generated_at"].is_string());
}

#[test]
fn test_viability_handler_reports_missing_and_bad_costs() {
    let missing = handle_viability(&json!({"winning_bid": 200000}));
    assert_eq!(missing.status, 400);
    assert_eq!(
        missing.body["fields"],
        json!(["monthly_rent", "estimated_sale_price"])
    );

    let bad = handle_viability(&json!({
        "winning_bid": 200000,
        "monthly_rent": 1800,
        "estimated_sale_price": 280000,
        "additional_costs": {"moving": "lots"},
    }));
    assert_eq!(bad.body["fields"], json!(["additional_costs.moving"]));
}

#[test]
fn test_viability_handler_rejects_out_of_range_amounts() {
    let resp = handle_viability(&json!({
        "winning_bid": 200000,
        "monthly_rent": "70000000000000000000000000000",
        "estimated_sale_price": 280000,
        "additional_costs": {"legal": "-70000000000000000000000000000", "moving": 1000},
    }));
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body["fields"], json!(["additional_costs.legal", "monthly_rent"]));
}

#[test]
fn test_report_rejects_out_of_range_extra_cost() {
    let mut input = house_flip();
    input
        .additional_costs
        .insert("legal".into(), dec!(70000000000000000000000000000));
    let err = viability_report(&input).unwrap_err();
    assert_eq!(err.fields(), vec!["additional_costs.legal".to_string()]);
}
