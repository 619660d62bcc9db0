use serde_json::Value;

use super::format_scalar;

/// Headline figure of each analysis, as JSON pointers into the result.
const HEADLINE_POINTERS: [&str; 6] = [
    "/payment/total",
    "/monthly_savings",
    "/recommendation",
    "/dscr_ratio",
    "/max_home_price",
    "/monthly_payment",
];

/// Print just the key answer.
///
/// Calculator output prints its first row; analysis envelopes print the
/// first headline field present, else the first field of the result.
pub fn print_minimal(value: &Value) {
    if let Some(Value::Array(rows)) = value.get("results") {
        if let Some(first) = rows.first() {
            let label = first.get("label").map(format_scalar).unwrap_or_default();
            let val = first.get("value").map(format_scalar).unwrap_or_default();
            println!("{label}: {val}");
        }
        return;
    }

    let result = value.get("result").unwrap_or(value);

    if let Some(headline) = HEADLINE_POINTERS
        .iter()
        .filter_map(|p| result.pointer(p))
        .find(|v| !v.is_null())
    {
        println!("{}", format_scalar(headline));
        return;
    }

    match result {
        Value::Object(map) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_scalar(val));
            }
        }
        Value::Array(arr) => {
            if let Some(last) = arr.last() {
                println!("{}", format_scalar(last));
            }
        }
        _ => println!("{}", format_scalar(result)),
    }
}
