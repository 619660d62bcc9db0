use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent, Rate};

/// VA funding fee, first use
const VA_FIRST_TIME_RATE: Rate = dec!(0.0215);
/// VA funding fee, subsequent use
const VA_SUBSEQUENT_RATE: Rate = dec!(0.033);
/// FHA annual mortgage insurance premium (life of loan)
const FHA_ANNUAL_MIP_RATE: Rate = dec!(0.0085);
/// FHA upfront mortgage insurance premium
const FHA_UPFRONT_MIP_RATE: Rate = dec!(0.0175);
/// USDA annual guarantee fee
const USDA_ANNUAL_FEE_RATE: Rate = dec!(0.0035);
/// USDA upfront guarantee fee
const USDA_UPFRONT_FEE_RATE: Rate = dec!(0.01);
/// Conventional PMI estimate, charged only above the LTV threshold
const CONVENTIONAL_PMI_RATE: Rate = dec!(0.005);
/// Conventional loans above this LTV (in percent) carry PMI
const PMI_LTV_THRESHOLD: Percent = dec!(80);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan program, which determines the fee formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanProgram {
    #[default]
    Conventional,
    Fha,
    Va,
    Usda,
    Jumbo,
}

/// VA funding fee tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VaTier {
    #[default]
    FirstTime,
    Subsequent,
    /// Veterans with a service-connected disability pay no funding fee
    Exempt,
}

/// Everything the fee schedule needs to know about the loan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramFeeSpec {
    pub program: LoanProgram,
    /// VA funding fee tier (VA only; first-time if absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub va_tier: Option<VaTier>,
    /// Down payment as a percentage of price (conventional PMI test)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment_percent: Option<Percent>,
    /// Lender-quoted monthly mortgage insurance (jumbo only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_monthly_premium: Option<Money>,
    /// Also charge FHA upfront MIP / USDA upfront guarantee fee
    #[serde(default)]
    pub include_upfront_premium: bool,
}

impl ProgramFeeSpec {
    pub fn new(program: LoanProgram) -> Self {
        Self {
            program,
            ..Self::default()
        }
    }

    pub fn va(tier: VaTier) -> Self {
        Self {
            program: LoanProgram::Va,
            va_tier: Some(tier),
            ..Self::default()
        }
    }
}

/// Program fee split into its one-time and recurring parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramFee {
    /// One-time fee due at closing (or financed into the loan)
    pub upfront: Money,
    /// Monthly insurance premium / guarantee fee
    pub monthly_recurring: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Program fee on `base_loan_amount`. Pure and total: every program maps to
/// a fee, and unknown details fall back to the most common case.
pub fn compute_fee(base_loan_amount: Money, spec: &ProgramFeeSpec) -> ProgramFee {
    match spec.program {
        LoanProgram::Va => {
            let rate = match spec.va_tier.unwrap_or_default() {
                VaTier::FirstTime => VA_FIRST_TIME_RATE,
                VaTier::Subsequent => VA_SUBSEQUENT_RATE,
                VaTier::Exempt => Decimal::ZERO,
            };
            ProgramFee {
                upfront: base_loan_amount * rate,
                monthly_recurring: Decimal::ZERO,
            }
        }
        LoanProgram::Fha => ProgramFee {
            upfront: upfront_if(spec, base_loan_amount, FHA_UPFRONT_MIP_RATE),
            monthly_recurring: annual_rate_monthly(base_loan_amount, FHA_ANNUAL_MIP_RATE),
        },
        LoanProgram::Usda => ProgramFee {
            upfront: upfront_if(spec, base_loan_amount, USDA_UPFRONT_FEE_RATE),
            monthly_recurring: annual_rate_monthly(base_loan_amount, USDA_ANNUAL_FEE_RATE),
        },
        LoanProgram::Conventional => {
            let down = spec.down_payment_percent.unwrap_or(Decimal::ZERO);
            let ltv = dec!(100) - down;
            let monthly_recurring = if ltv > PMI_LTV_THRESHOLD {
                annual_rate_monthly(base_loan_amount, CONVENTIONAL_PMI_RATE)
            } else {
                Decimal::ZERO
            };
            ProgramFee {
                upfront: Decimal::ZERO,
                monthly_recurring,
            }
        }
        LoanProgram::Jumbo => ProgramFee {
            upfront: Decimal::ZERO,
            monthly_recurring: spec.manual_monthly_premium.unwrap_or(Decimal::ZERO),
        },
    }
}

/// Loan amount once the upfront fee is rolled into the loan.
pub fn financed_loan_amount(base_loan_amount: Money, fee: &ProgramFee) -> Money {
    base_loan_amount + fee.upfront
}

/// Loan-to-value as a percentage. A zero or negative value yields 0.
pub fn loan_to_value(loan_amount: Money, property_value: Money) -> Percent {
    crate::units::dollar_to_percent(loan_amount, property_value)
}

fn annual_rate_monthly(base: Money, annual_rate: Rate) -> Money {
    base * annual_rate / dec!(12)
}

fn upfront_if(spec: &ProgramFeeSpec, base: Money, rate: Rate) -> Money {
    if spec.include_upfront_premium {
        base * rate
    } else {
        Decimal::ZERO
    }
}
