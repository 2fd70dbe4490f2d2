//! JSON request boundary.
//!
//! Each handler takes a loosely typed JSON body, coerces it into the typed
//! input of one calculator, runs it, and wraps the outcome in a
//! `{success, ...}` envelope with a status code. Validation failures name the
//! offending fields; internal failures are logged and reported generically.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::str::FromStr;
use tracing::{error, warn};

use crate::assumptions::MarketAssumptions;
use crate::error::{AuctionFinanceError, ErrorCategory};
use crate::financing::amortization::{amortization_table_with, AmortizationSystem, AmortizationTableInput};
use crate::financing::quick_estimate::{quick_estimate_with, QuickEstimateInput};
use crate::financing::inputs::{default_interest_rate, default_loan_term};
use crate::financing::{analyze_sensitivity_with, calculate_financing_with, FinancingInputs};
use crate::types::{ComputationOutput, Money, Months, Percent, MAX_AMOUNT, MAX_RATE};
use crate::AuctionFinanceResult;

#[cfg(feature = "viability")]
use crate::viability::{viability_report_with, ViabilityReportInput};

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// A rendered response: HTTP-style status plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    fn success(key: &str, payload: Value, warnings: Vec<String>) -> Self {
        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(true));
        body.insert(key.into(), payload);
        body.insert("warnings".into(), json!(warnings));
        ApiResponse {
            status: 200,
            body: Value::Object(body),
        }
    }

    fn failure(err: &AuctionFinanceError) -> Self {
        let category = err.category();
        let status = category.status_code();
        let (kind, message) = match category {
            ErrorCategory::Validation => {
                warn!(error = %err, "rejected request");
                ("validation_error", err.to_string())
            }
            ErrorCategory::Computation => {
                warn!(error = %err, "calculation could not be completed");
                ("computation_error", err.to_string())
            }
            ErrorCategory::Internal => {
                error!(error = ?err, "internal failure while handling request");
                (
                    "internal_error",
                    "Internal error while processing the calculation".to_string(),
                )
            }
        };

        let mut body = json!({
            "success": false,
            "error": kind,
            "message": message,
            "status": status,
        });
        let fields = err.fields();
        if !fields.is_empty() {
            body["fields"] = json!(fields);
        }
        ApiResponse { status, body }
    }
}

fn respond<T: Serialize>(key: &str, outcome: AuctionFinanceResult<ComputationOutput<T>>) -> ApiResponse {
    let rendered = outcome.and_then(|out| {
        let payload = serde_json::to_value(&out.result)?;
        Ok((payload, out.warnings))
    });
    match rendered {
        Ok((payload, warnings)) => ApiResponse::success(key, payload, warnings),
        Err(e) => ApiResponse::failure(&e),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Full financing calculation: `{success, result, warnings}`.
pub fn handle_calculate(body: &Value) -> ApiResponse {
    handle_calculate_with(body, &MarketAssumptions::default())
}

pub fn handle_calculate_with(body: &Value, assumptions: &MarketAssumptions) -> ApiResponse {
    respond(
        "result",
        financing_inputs(body).and_then(|input| calculate_financing_with(&input, assumptions)),
    )
}

/// Base case plus scenarios and risk: `{success, analysis, warnings}`.
pub fn handle_sensitivity(body: &Value) -> ApiResponse {
    handle_sensitivity_with(body, &MarketAssumptions::default())
}

pub fn handle_sensitivity_with(body: &Value, assumptions: &MarketAssumptions) -> ApiResponse {
    respond(
        "analysis",
        financing_inputs(body).and_then(|input| analyze_sensitivity_with(&input, assumptions)),
    )
}

pub fn handle_quick_estimate(body: &Value) -> ApiResponse {
    handle_quick_estimate_with(body, &MarketAssumptions::default())
}

pub fn handle_quick_estimate_with(body: &Value, assumptions: &MarketAssumptions) -> ApiResponse {
    respond(
        "quick_estimate",
        quick_estimate_input(body).and_then(|input| quick_estimate_with(&input, assumptions)),
    )
}

pub fn handle_amortization_table(body: &Value) -> ApiResponse {
    handle_amortization_table_with(body, &MarketAssumptions::default())
}

pub fn handle_amortization_table_with(body: &Value, assumptions: &MarketAssumptions) -> ApiResponse {
    respond(
        "amortization",
        amortization_input(body).and_then(|input| amortization_table_with(&input, assumptions)),
    )
}

/// Reference rate table; takes no body.
pub fn handle_market_rates() -> ApiResponse {
    handle_market_rates_with(&MarketAssumptions::default())
}

pub fn handle_market_rates_with(assumptions: &MarketAssumptions) -> ApiResponse {
    match serde_json::to_value(&assumptions.market_rates) {
        Ok(rates) => ApiResponse::success("market_rates", rates, Vec::new()),
        Err(e) => ApiResponse::failure(&e.into()),
    }
}

#[cfg(feature = "viability")]
pub fn handle_viability(body: &Value) -> ApiResponse {
    handle_viability_with(body, &MarketAssumptions::default())
}

#[cfg(feature = "viability")]
pub fn handle_viability_with(body: &Value, assumptions: &MarketAssumptions) -> ApiResponse {
    respond(
        "report",
        viability_input(body).and_then(|input| viability_report_with(&input, assumptions)),
    )
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Reads optional fields off a JSON object, remembering every key that was
/// present but could not be coerced.
struct FieldReader<'a> {
    obj: &'a Map<String, Value>,
    invalid: Vec<String>,
}

impl<'a> FieldReader<'a> {
    fn new(body: &'a Value) -> AuctionFinanceResult<Self> {
        match body {
            Value::Object(obj) => Ok(FieldReader {
                obj,
                invalid: Vec::new(),
            }),
            _ => Err(AuctionFinanceError::InvalidInput {
                field: "body".into(),
                reason: "Request body must be a JSON object".into(),
            }),
        }
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        match self.obj.get(key) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    fn require(&self, keys: &[&str]) -> AuctionFinanceResult<()> {
        let missing: Vec<String> = keys
            .iter()
            .filter(|k| self.present(k).is_none())
            .map(|k| k.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuctionFinanceError::MissingFields(missing))
        }
    }

    fn coerce<T>(&mut self, key: &str, parse: impl Fn(&Value) -> Option<T>) -> Option<T> {
        let value = self.present(key)?;
        let parsed = parse(value);
        if parsed.is_none() {
            self.invalid.push(key.to_string());
        }
        parsed
    }

    fn money(&mut self, key: &str) -> Option<Money> {
        self.coerce(key, parse_amount)
    }

    fn rate(&mut self, key: &str) -> Option<Percent> {
        self.coerce(key, |v| parse_decimal(v).filter(|d| d.abs() <= MAX_RATE))
    }

    fn months(&mut self, key: &str) -> Option<Months> {
        self.coerce(key, parse_months)
    }

    fn flag(&mut self, key: &str) -> Option<bool> {
        self.coerce(key, parse_bool)
    }

    fn finish<T>(self, value: T) -> AuctionFinanceResult<T> {
        if self.invalid.is_empty() {
            Ok(value)
        } else {
            Err(AuctionFinanceError::InvalidFields(self.invalid))
        }
    }
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)).ok()
        }
        _ => None,
    }
}

fn parse_amount(value: &Value) -> Option<Money> {
    parse_decimal(value).filter(|d| d.abs() <= MAX_AMOUNT)
}

fn parse_months(value: &Value) -> Option<Months> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Months::try_from(u).ok();
            }
            // 360.0 is fine, 12.5 or -1 is not
            let f = n.as_f64()?;
            if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(Months::MAX) {
                Some(f as Months)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<Months>().ok(),
        _ => None,
    }
}

fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_row_limit(value: &Value) -> Option<usize> {
    parse_months(value).map(|m| m as usize)
}

fn parse_system(value: &Value) -> Option<AmortizationSystem> {
    value.as_str().and_then(|s| AmortizationSystem::from_str(s).ok())
}

/// Coerce a request body into `FinancingInputs`. Absent keys keep their
/// defaults; `documentation_costs`, `sale_price` and `monthly_rent` stay unset.
pub fn financing_inputs(body: &Value) -> AuctionFinanceResult<FinancingInputs> {
    let mut r = FieldReader::new(body)?;
    r.require(&["property_value"])?;

    let mut input = FinancingInputs::new(Decimal::ZERO);

    macro_rules! set {
        ($reader:ident . $kind:ident, $($field:ident),+ $(,)?) => {
            $(
                if let Some(v) = $reader.$kind(stringify!($field)) {
                    input.$field = v;
                }
            )+
        };
    }

    set!(r.money, property_value, declared_value, down_payment);
    set!(r.rate, interest_rate, auction_commission, broker_commission);
    set!(r.months, loan_term);
    set!(r.money, water_bill, electricity_bill, condominium_fees, iptu_arrears, other_debts);
    set!(r.months, time_to_sell, rental_time);
    set!(r.money, monthly_iptu, monthly_condominium, maintenance_reforms);
    set!(r.flag, is_first_property, will_reinvest);

    input.documentation_costs = r.money("documentation_costs");
    input.sale_price = r.money("sale_price");
    input.monthly_rent = r.money("monthly_rent");

    r.finish(input)
}

fn quick_estimate_input(body: &Value) -> AuctionFinanceResult<QuickEstimateInput> {
    let mut r = FieldReader::new(body)?;
    r.require(&["property_value"])?;

    let input = QuickEstimateInput {
        property_value: r.money("property_value").unwrap_or_default(),
        down_payment: r.money("down_payment").unwrap_or_default(),
        interest_rate: r.rate("interest_rate").unwrap_or_else(default_interest_rate),
        loan_term: r.months("loan_term").unwrap_or_else(default_loan_term),
    };
    r.finish(input)
}

fn amortization_input(body: &Value) -> AuctionFinanceResult<AmortizationTableInput> {
    let mut r = FieldReader::new(body)?;
    r.require(&["property_value"])?;

    let input = AmortizationTableInput {
        property_value: r.money("property_value").unwrap_or_default(),
        down_payment: r.money("down_payment").unwrap_or_default(),
        interest_rate: r.rate("interest_rate").unwrap_or_else(default_interest_rate),
        loan_term: r.months("loan_term").unwrap_or_else(default_loan_term),
        system: r.coerce("system", parse_system).unwrap_or_default(),
        row_limit: r.coerce("row_limit", parse_row_limit),
    };
    r.finish(input)
}

#[cfg(feature = "viability")]
fn viability_input(body: &Value) -> AuctionFinanceResult<ViabilityReportInput> {
    use std::collections::BTreeMap;

    let mut r = FieldReader::new(body)?;
    r.require(&["winning_bid", "monthly_rent", "estimated_sale_price"])?;

    let mut additional_costs = BTreeMap::new();
    match r.present("additional_costs") {
        None => {}
        Some(Value::Object(costs)) => {
            for (name, amount) in costs {
                match parse_amount(amount) {
                    Some(v) => {
                        additional_costs.insert(name.clone(), v);
                    }
                    None => r.invalid.push(format!("additional_costs.{name}")),
                }
            }
        }
        Some(_) => r.invalid.push("additional_costs".into()),
    }

    let input = ViabilityReportInput {
        winning_bid: r.money("winning_bid").unwrap_or_default(),
        renovation_budget: r.money("renovation_budget").unwrap_or_default(),
        monthly_rent: r.money("monthly_rent").unwrap_or_default(),
        estimated_sale_price: r.money("estimated_sale_price").unwrap_or_default(),
        additional_costs,
        rental_horizon_years: r.months("rental_horizon_years").unwrap_or(10),
        resale_months: r.months("resale_months").unwrap_or(12),
        rent_variation: r.rate("rent_variation").unwrap_or(Decimal::from(20)),
    };
    r.finish(input)
}
