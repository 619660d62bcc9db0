use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten_object, format_scalar, nested_tables};

/// Render output as one or more tables.
///
/// Analysis envelopes print the flattened result, then any per-year rows,
/// then warnings and methodology. Calculator output prints its result rows.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                print_result(result, map);
            } else if let Some(Value::Array(rows)) = map.get("results") {
                print_rows(rows);
            } else {
                print_key_values(&flatten_object(map));
                for (name, rows) in nested_tables(map) {
                    println!("\n{name}:");
                    print_rows(rows);
                }
            }
        }
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", format_scalar(value)),
    }
}

fn print_result(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    print_key_values(&flatten_object(result));

    for (name, rows) in nested_tables(result) {
        println!("\n{name}:");
        print_rows(rows);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_key_values(pairs: &[(String, Value)]) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in pairs {
        builder.push_record([key.clone(), format_scalar(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            println!("{}", format_scalar(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in rows {
        if let Value::Object(map) = item {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| map.get(h).map(format_scalar).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}
