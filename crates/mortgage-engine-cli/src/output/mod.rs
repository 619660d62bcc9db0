pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Nested objects become dotted keys (`payment.total`); arrays are left to
/// the caller so schedules and yearly rows can be rendered as their own
/// tables.
pub(crate) fn flatten_object(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(&mut out, None, map);
    out
}

fn flatten_into(out: &mut Vec<(String, Value)>, prefix: Option<&str>, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(inner) => flatten_into(out, Some(&name), inner),
            Value::Array(arr) if arr.iter().any(Value::is_object) => {}
            _ => out.push((name, val.clone())),
        }
    }
}

/// Arrays of objects found directly under `map`, by key.
pub(crate) fn nested_tables(map: &Map<String, Value>) -> Vec<(&str, &[Value])> {
    map.iter()
        .filter_map(|(key, val)| match val {
            Value::Array(arr) if arr.iter().any(Value::is_object) => {
                Some((key.as_str(), arr.as_slice()))
            }
            _ => None,
        })
        .collect()
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
