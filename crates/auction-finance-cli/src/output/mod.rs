pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Envelope keys that carry the computed payload, one per request type.
const PAYLOAD_KEYS: [&str; 6] = [
    "result",
    "analysis",
    "quick_estimate",
    "amortization",
    "report",
    "market_rates",
];

/// The payload inside a `{success, <key>: ..., warnings}` envelope.
pub fn payload(value: &Value) -> Option<&Value> {
    let map = value.as_object()?;
    PAYLOAD_KEYS.iter().find_map(|k| map.get(*k))
}

/// Envelope warnings as plain strings.
pub fn warnings(value: &Value) -> Vec<&str> {
    value
        .get("warnings")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Flatten nested objects into dotted keys; arrays of objects are left to the caller.
pub fn flatten<'a>(prefix: &str, value: &'a Value, out: &mut Vec<(String, &'a Value)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, val, out);
            }
        }
        _ => out.push((prefix.to_string(), value)),
    }
}

pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(scalar_text).collect::<Vec<_>>().join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_finds_envelope_key() {
        let v = json!({"success": true, "analysis": {"base": {}}, "warnings": []});
        assert_eq!(payload(&v), Some(&json!({"base": {}})));
        assert_eq!(payload(&json!({"success": true})), None);
    }

    #[test]
    fn test_flatten_uses_dotted_paths() {
        let v = json!({"summary": {"principal": "1000", "months": 12}, "system": "SAC"});
        let mut out = Vec::new();
        flatten("", &v, &mut out);
        let keys: Vec<&str> = out.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["summary.months", "summary.principal", "system"]);
    }
}
