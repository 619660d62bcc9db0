use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::payment::RecurringCosts;
use mortgage_engine_core::program_fees::ProgramFeeSpec;
use mortgage_engine_core::refinance::{self, RefinanceInput};

use super::purchase::VaTierArg;
use super::{percent_rate, required, years_to_months};
use crate::input;

/// Arguments for a refinance comparison
#[derive(Args)]
pub struct RefinanceArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding balance on the current loan
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Current annual rate in percent
    #[arg(long)]
    pub current_rate: Option<Decimal>,

    /// Months remaining on the current loan
    #[arg(long)]
    pub remaining_months: Option<u32>,

    /// Monthly mortgage insurance on the current loan
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub current_premium: Decimal,

    /// New annual rate in percent
    #[arg(long)]
    pub new_rate: Option<Decimal>,

    /// New loan term in years
    #[arg(long, default_value_t = 30)]
    pub new_term_years: u32,

    /// Closing costs on the new loan
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub closing_costs: Decimal,

    /// Roll closing costs into the new loan
    #[arg(long)]
    pub finance_closing_costs: bool,

    /// Cash taken out at closing
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub cash_out: Decimal,

    /// Refinance into a VA loan with this funding fee tier
    #[arg(long, value_enum)]
    pub va_tier: Option<VaTierArg>,

    /// Roll the VA funding fee into the new loan
    #[arg(long)]
    pub finance_funding_fee: bool,
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let refi_input: RefinanceInput = match input::read_typed(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => RefinanceInput {
            current_balance: required(args.balance, "balance")?,
            current_rate: percent_rate(required(args.current_rate, "current-rate")?),
            current_remaining_months: required(args.remaining_months, "remaining-months")?,
            current_monthly_fee: args.current_premium,
            new_rate: percent_rate(required(args.new_rate, "new-rate")?),
            new_term_months: years_to_months(args.new_term_years),
            closing_costs: args.closing_costs,
            finance_closing_costs: args.finance_closing_costs,
            cash_out: args.cash_out,
            new_program: args.va_tier.map(|tier| ProgramFeeSpec::va(tier.into())),
            finance_program_fee: args.finance_funding_fee,
            recurring_costs: RecurringCosts::default(),
        },
    };
    let result = refinance::analyze_refinance(&refi_input)?;
    Ok(serde_json::to_value(result)?)
}
