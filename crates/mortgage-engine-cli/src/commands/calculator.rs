use clap::Args;
use serde_json::{json, Value};

use mortgage_engine_core::calculators::{self, CalculatorKind, Inputs};

use crate::input;

#[derive(Args)]
pub struct FieldsArgs {
    /// Calculator id (purchase, refinance, rent-vs-buy, dscr, va-purchase,
    /// va-refinance, affordability)
    pub calculator: String,
}

#[derive(Args)]
pub struct CalculateArgs {
    /// Calculator id
    pub calculator: String,

    /// Path to a JSON or YAML map of field name to number
    #[arg(long)]
    pub input: Option<String>,

    /// Also return chart slices
    #[arg(long)]
    pub chart: bool,
}

pub fn run_fields(args: FieldsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let kind: CalculatorKind = args.calculator.parse()?;
    Ok(serde_json::to_value(kind.fields())?)
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let kind: CalculatorKind = args.calculator.parse()?;
    let inputs: Inputs = input::read_typed(args.input.as_deref())?
        .ok_or("--input <file> or stdin required for calculate")?;

    let results = calculators::calculate(kind, &inputs)?;
    let mut output = json!({
        "calculator": kind.id(),
        "results": results,
    });
    if args.chart {
        output["chart"] = serde_json::to_value(calculators::chart_data(kind, &inputs)?)?;
    }
    Ok(output)
}
