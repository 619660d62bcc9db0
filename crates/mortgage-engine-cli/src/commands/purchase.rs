use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::program_fees::{LoanProgram, ProgramFeeSpec, VaTier};
use mortgage_engine_core::purchase::{self, PurchaseInput};
use mortgage_engine_core::units::RelativeAmount;

use super::{percent_rate, required, years_to_months};
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgramArg {
    Conventional,
    Fha,
    Va,
    Usda,
    Jumbo,
}

impl From<ProgramArg> for LoanProgram {
    fn from(arg: ProgramArg) -> Self {
        match arg {
            ProgramArg::Conventional => LoanProgram::Conventional,
            ProgramArg::Fha => LoanProgram::Fha,
            ProgramArg::Va => LoanProgram::Va,
            ProgramArg::Usda => LoanProgram::Usda,
            ProgramArg::Jumbo => LoanProgram::Jumbo,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VaTierArg {
    FirstTime,
    Subsequent,
    Exempt,
}

impl From<VaTierArg> for VaTier {
    fn from(arg: VaTierArg) -> Self {
        match arg {
            VaTierArg::FirstTime => VaTier::FirstTime,
            VaTierArg::Subsequent => VaTier::Subsequent,
            VaTierArg::Exempt => VaTier::Exempt,
        }
    }
}

/// Arguments for a purchase payment analysis
#[derive(Args)]
pub struct PurchaseArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Home price
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment in dollars
    #[arg(long, conflicts_with = "down_payment_percent")]
    pub down_payment: Option<Decimal>,

    /// Down payment as a percentage of price
    #[arg(long)]
    pub down_payment_percent: Option<Decimal>,

    /// Annual interest rate in percent (7 = 7%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    pub term_years: u32,

    /// Loan program
    #[arg(long, value_enum, default_value = "conventional")]
    pub program: ProgramArg,

    /// VA funding fee tier (VA only)
    #[arg(long, value_enum)]
    pub va_tier: Option<VaTierArg>,

    /// Charge FHA upfront MIP / USDA upfront guarantee fee
    #[arg(long)]
    pub upfront_premium: bool,

    /// Roll the upfront fee into the loan
    #[arg(long)]
    pub finance_fee: bool,

    /// Lender-quoted monthly mortgage insurance (jumbo)
    #[arg(long)]
    pub monthly_premium: Option<Decimal>,

    /// Annual property tax in dollars
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub annual_tax: Decimal,

    /// Annual homeowners insurance in dollars
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub annual_insurance: Decimal,

    /// Monthly HOA dues
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub hoa: Decimal,

    /// Extra principal paid every month
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub extra_payment: Decimal,
}

pub fn run_purchase(args: PurchaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let purchase_input: PurchaseInput = match input::read_typed(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => from_flags(&args)?,
    };
    let result = purchase::analyze_purchase(&purchase_input)?;
    Ok(serde_json::to_value(result)?)
}

fn from_flags(args: &PurchaseArgs) -> Result<PurchaseInput, Box<dyn std::error::Error>> {
    let down_payment = match (args.down_payment, args.down_payment_percent) {
        (_, Some(percent)) => RelativeAmount::percent(percent),
        (Some(dollars), None) => RelativeAmount::dollars(dollars),
        (None, None) => return Err("--down-payment or --down-payment-percent is required".into()),
    };

    let program = ProgramFeeSpec {
        program: args.program.into(),
        va_tier: args.va_tier.map(VaTier::from),
        down_payment_percent: None,
        manual_monthly_premium: args.monthly_premium,
        include_upfront_premium: args.upfront_premium,
    };

    Ok(PurchaseInput {
        home_price: required(args.home_price, "home-price")?,
        down_payment,
        annual_rate: percent_rate(required(args.rate, "rate")?),
        term_months: years_to_months(args.term_years),
        program,
        finance_upfront_fee: args.finance_fee,
        annual_property_tax: RelativeAmount::dollars(args.annual_tax),
        annual_insurance: RelativeAmount::dollars(args.annual_insurance),
        monthly_hoa: args.hoa,
        extra_payment: args.extra_payment,
    })
}
