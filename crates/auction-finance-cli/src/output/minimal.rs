use serde_json::Value;

use super::{payload, scalar_text};

/// The headline number for each request type, as JSON pointers into the payload.
const PRIORITY_PATHS: [&str; 6] = [
    "/annual_return",
    "/risk_analysis/risk_score",
    "/monthly_payment",
    "/summary/total_interest",
    "/summary/recommended_strategy",
    "/last_updated",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let body = payload(value).unwrap_or(value);

    for path in &PRIORITY_PATHS {
        if let Some(val) = body.pointer(path) {
            if !val.is_null() {
                println!("{}", scalar_text(val));
                return;
            }
        }
    }

    if let Some((key, val)) = body.as_object().and_then(|m| m.iter().next()) {
        println!("{}: {}", key, scalar_text(val));
        return;
    }

    println!("{}", scalar_text(body));
}
