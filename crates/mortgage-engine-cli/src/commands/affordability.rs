use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use mortgage_engine_core::affordability::{self, AffordabilityInput};

use super::{percent_rate, required, years_to_months};
use crate::input;

/// Arguments for an affordability estimate
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross annual income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Existing monthly debt payments
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub debts: Decimal,

    /// Cash available for the down payment
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub down_payment: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    pub term_years: u32,

    /// Annual property tax as a percent of price
    #[arg(long, default_value_t = dec!(1.2))]
    pub tax_rate: Decimal,

    /// Annual homeowners insurance as a percent of price
    #[arg(long, default_value_t = dec!(0.35))]
    pub insurance_rate: Decimal,

    /// Annual mortgage insurance as a percent of the loan
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub mortgage_insurance_rate: Decimal,

    /// Monthly HOA dues
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub hoa: Decimal,

    /// Front-end debt-to-income limit in percent
    #[arg(long, default_value_t = dec!(28))]
    pub front_end: Decimal,

    /// Back-end debt-to-income limit in percent
    #[arg(long, default_value_t = dec!(36))]
    pub back_end: Decimal,
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input: AffordabilityInput = match input::read_typed(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => AffordabilityInput {
            annual_income: required(args.income, "income")?,
            monthly_debts: args.debts,
            down_payment: args.down_payment,
            annual_rate: percent_rate(required(args.rate, "rate")?),
            term_months: years_to_months(args.term_years),
            property_tax_rate: percent_rate(args.tax_rate),
            insurance_rate: percent_rate(args.insurance_rate),
            mortgage_insurance_rate: percent_rate(args.mortgage_insurance_rate),
            monthly_hoa: args.hoa,
            front_end_ratio: percent_rate(args.front_end),
            back_end_ratio: percent_rate(args.back_end),
        },
    };
    let result = affordability::estimate_affordability(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}
