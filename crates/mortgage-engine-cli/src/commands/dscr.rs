use clap::Args;
use serde_json::Value;

use mortgage_engine_core::dscr::{self, DscrInput};

use crate::input;

#[derive(Args)]
pub struct DscrArgs {
    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_dscr(args: DscrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dscr_input: DscrInput = input::read_typed(args.input.as_deref())?
        .ok_or("--input <file> or stdin required for DSCR analysis")?;
    let result = dscr::analyze_dscr(&dscr_input)?;
    Ok(serde_json::to_value(result)?)
}
