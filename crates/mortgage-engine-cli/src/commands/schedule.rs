use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use mortgage_engine_core::amortization::{self, LoanTerms};

use super::{percent_rate, required};
use crate::input;

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to a JSON or YAML file holding loan terms (decimal rate)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long, default_value_t = 360)]
    pub term_months: u32,

    /// Extra principal paid every month
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub extra_payment: Decimal,

    /// Roll the schedule up by loan year
    #[arg(long)]
    pub yearly: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = match input::read_typed(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => LoanTerms::new(
            required(args.principal, "principal")?,
            percent_rate(required(args.rate, "rate")?),
            args.term_months,
        )
        .with_extra_payment(args.extra_payment),
    };

    let payoff = amortization::simulate_payoff(&terms);
    let schedule = amortization::amortization_schedule(&terms);
    let rows = if args.yearly {
        serde_json::to_value(amortization::yearly_summary(&schedule))?
    } else {
        serde_json::to_value(&schedule)?
    };

    Ok(json!({
        "monthly_payment": payoff.monthly_payment,
        "total_interest": payoff.total_interest,
        "actual_term_months": payoff.actual_term_months,
        "hit_iteration_cap": payoff.hit_iteration_cap,
        "schedule": rows,
    }))
}
