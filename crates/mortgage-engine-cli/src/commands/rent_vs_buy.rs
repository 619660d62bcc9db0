use clap::Args;
use serde_json::Value;

use mortgage_engine_core::rent_vs_buy::{self, RentVsBuyInput};

use crate::input;

#[derive(Args)]
pub struct RentVsBuyArgs {
    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rent_vs_buy(args: RentVsBuyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rvb_input: RentVsBuyInput = input::read_typed(args.input.as_deref())?
        .ok_or("--input <file> or stdin required for rent-vs-buy comparison")?;
    let result = rent_vs_buy::compare_rent_vs_buy(&rvb_input)?;
    Ok(serde_json::to_value(result)?)
}
