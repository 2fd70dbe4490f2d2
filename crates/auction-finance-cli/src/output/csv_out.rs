use serde_json::Value;
use std::io;

use super::{flatten, payload, scalar_text};

/// Write output as CSV to stdout.
///
/// An amortization schedule prints one row per month; everything else prints
/// as two-column `field,value` pairs with dotted paths for nested values.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let body = payload(value).unwrap_or(value);

    if let Some(Value::Array(rows)) = body.get("table") {
        write_rows(&mut wtr, rows);
    } else {
        let mut fields = Vec::new();
        flatten("", body, &mut fields);
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in fields {
            let _ = wtr.write_record([key.as_str(), &scalar_text(val)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(*h).map(scalar_text).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
