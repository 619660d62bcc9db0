use serde_json::Value;
use std::io;

use super::{flatten_object, format_scalar};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Row-shaped output (calculator results, schedules, field lists) becomes
/// one CSV record per row; analysis envelopes become `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let written = match value {
        Value::Object(map) => match (map.get("result"), map.get("results")) {
            (Some(Value::Object(result)), _) => write_pairs(&mut wtr, &flatten_object(result)),
            (_, Some(Value::Array(rows))) => write_rows(&mut wtr, rows),
            _ => write_pairs(&mut wtr, &flatten_object(map)),
        },
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => wtr.write_record([format_scalar(value)]),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("failed to write CSV output: {e}");
    }
}

fn write_pairs(wtr: &mut StdoutWriter<'_>, pairs: &[(String, Value)]) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in pairs {
        wtr.write_record([key.as_str(), &format_scalar(val)])?;
    }
    Ok(())
}

fn write_rows(wtr: &mut StdoutWriter<'_>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([format_scalar(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for item in rows {
        if let Value::Object(map) = item {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            wtr.write_record(&record)?;
        }
    }
    Ok(())
}
