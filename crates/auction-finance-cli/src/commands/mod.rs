pub mod financing;
pub mod viability;

use auction_finance_core::service::ApiResponse;
use serde_json::Value;
use std::fmt;

/// A `{success: false, ...}` envelope surfaced as an error.
#[derive(Debug)]
pub struct FailedRequest(pub Value);

impl fmt::Display for FailedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self.0) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

impl std::error::Error for FailedRequest {}

pub fn into_result(resp: ApiResponse) -> Result<Value, Box<dyn std::error::Error>> {
    if resp.is_success() {
        Ok(resp.body)
    } else {
        Err(Box::new(FailedRequest(resp.body)))
    }
}
