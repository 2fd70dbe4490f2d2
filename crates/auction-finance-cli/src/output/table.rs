use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, payload, scalar_text, warnings};

/// Field/value table for the payload, plus one table per list of records
/// (amortization rows, risk factors).
pub fn print_table(value: &Value) {
    let body = payload(value).unwrap_or(value);

    let mut fields = Vec::new();
    flatten("", body, &mut fields);

    let (lists, scalars): (Vec<_>, Vec<_>) = fields
        .into_iter()
        .partition(|(_, v)| is_record_list(v));

    if !scalars.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &scalars {
            builder.push_record([key.as_str(), &scalar_text(val)]);
        }
        println!("{}", Table::from(builder));
    }

    for (key, val) in lists {
        if let Value::Array(items) = val {
            println!("\n{}:", key);
            print_records(items);
        }
    }

    let ws = warnings(value);
    if !ws.is_empty() {
        println!("\nWarnings:");
        for w in ws {
            println!("  - {}", w);
        }
    }
}

fn is_record_list(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.first().is_some_and(Value::is_object))
}

fn print_records(items: &[Value]) {
    let Some(Value::Object(first)) = items.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for item in items.iter().filter_map(Value::as_object) {
        builder.push_record(row(&headers, item));
    }
    println!("{}", Table::from(builder));
}

fn row(headers: &[String], item: &Map<String, Value>) -> Vec<String> {
    headers
        .iter()
        .map(|h| item.get(h).map(scalar_text).unwrap_or_default())
        .collect()
}
