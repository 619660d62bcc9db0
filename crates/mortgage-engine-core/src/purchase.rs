use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{self, AmortizationResult, LoanTerms};
use crate::error::MortgageError;
use crate::payment::{self, MonthlyPaymentBreakdown, RecurringCosts};
use crate::program_fees::{self, LoanProgram, ProgramFee, ProgramFeeSpec};
use crate::types::{require_non_negative, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::units::RelativeAmount;
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a home purchase payment analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseInput {
    /// Purchase price of the home
    pub home_price: Money,
    /// Down payment, in dollars or as a percentage of price
    pub down_payment: RelativeAmount,
    /// Annual note rate (e.g. 0.07 = 7%)
    pub annual_rate: Rate,
    /// Loan term in months
    pub term_months: u32,
    /// Loan program and its fee options
    #[serde(default)]
    pub program: ProgramFeeSpec,
    /// Roll the upfront program fee into the loan balance
    #[serde(default)]
    pub finance_upfront_fee: bool,
    /// Annual property tax, in dollars or as a percentage of price
    pub annual_property_tax: RelativeAmount,
    /// Annual homeowners insurance, in dollars or as a percentage of price
    pub annual_insurance: RelativeAmount,
    /// Monthly HOA dues
    #[serde(default)]
    pub monthly_hoa: Money,
    /// Additional principal paid every month
    #[serde(default)]
    pub extra_payment: Money,
}

/// Complete purchase analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOutput {
    pub down_payment: Money,
    pub down_payment_percent: Percent,
    /// Price less down payment, before any financed fee
    pub base_loan_amount: Money,
    /// Loan actually amortised (base plus financed upfront fee)
    pub loan_amount: Money,
    /// Loan-to-value of the base loan, in percent
    pub loan_to_value: Percent,
    pub program_fee: ProgramFee,
    pub payment: MonthlyPaymentBreakdown,
    /// Payoff on the contractual schedule
    pub amortization: AmortizationResult,
    /// Payoff with the extra principal payment, when one is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accelerated: Option<AmortizationResult>,
    pub interest_saved: Money,
    pub months_saved: u32,
    /// Down payment plus any upfront fee not financed
    pub cash_to_close: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly payment, program fee and payoff analysis for a home purchase.
pub fn analyze_purchase(
    input: &PurchaseInput,
) -> MortgageResult<ComputationOutput<PurchaseOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    // --- Normalise mode-dependent inputs to dollars ---
    let down_payment = input.down_payment.to_dollars(input.home_price);
    let down_payment_percent = input.down_payment.to_percent(input.home_price);
    let monthly_tax = input.annual_property_tax.to_dollars(input.home_price) / dec!(12);
    let monthly_insurance = input.annual_insurance.to_dollars(input.home_price) / dec!(12);

    if down_payment > input.home_price {
        return Err(MortgageError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot exceed the home price".into(),
        });
    }

    // --- Program fee on the base loan ---
    let base_loan_amount = input.home_price - down_payment;
    let mut fee_spec = input.program.clone();
    if fee_spec.down_payment_percent.is_none() {
        fee_spec.down_payment_percent = Some(down_payment_percent);
    }
    let program_fee = program_fees::compute_fee(base_loan_amount, &fee_spec);

    let loan_amount = if input.finance_upfront_fee {
        program_fees::financed_loan_amount(base_loan_amount, &program_fee)
    } else {
        base_loan_amount
    };
    let cash_to_close = if input.finance_upfront_fee {
        down_payment
    } else {
        down_payment + program_fee.upfront
    };

    // --- Amortisation with and without extra principal ---
    let terms = LoanTerms::new(loan_amount, input.annual_rate, input.term_months);
    let amortization = amortization::simulate_payoff(&terms);

    let accelerated = if input.extra_payment > Decimal::ZERO {
        Some(amortization::simulate_payoff(
            &terms.clone().with_extra_payment(input.extra_payment),
        ))
    } else {
        None
    };

    let (interest_saved, months_saved) = match &accelerated {
        Some(acc) => (
            amortization.total_interest - acc.total_interest,
            amortization
                .actual_term_months
                .saturating_sub(acc.actual_term_months),
        ),
        None => (Decimal::ZERO, 0),
    };

    // --- Compose the monthly payment ---
    let costs = RecurringCosts {
        monthly_tax,
        monthly_insurance,
        monthly_hoa: input.monthly_hoa,
    };
    let payment = payment::compose(
        amortization.monthly_payment,
        &program_fee,
        &costs,
        input.extra_payment,
    );

    let loan_to_value = program_fees::loan_to_value(base_loan_amount, input.home_price);
    collect_warnings(
        input,
        &fee_spec,
        loan_to_value,
        &amortization,
        accelerated.as_ref(),
        &mut warnings,
    );

    let output = PurchaseOutput {
        down_payment,
        down_payment_percent,
        base_loan_amount,
        loan_amount,
        loan_to_value,
        program_fee,
        payment,
        amortization,
        accelerated,
        interest_saved,
        months_saved,
        cash_to_close,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Fixed-Rate Purchase Payment Analysis",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &PurchaseInput) -> MortgageResult<()> {
    require_non_negative("home_price", input.home_price)?;
    require_non_negative("down_payment", input.down_payment.value)?;
    require_non_negative("annual_rate", input.annual_rate)?;
    require_non_negative("annual_property_tax", input.annual_property_tax.value)?;
    require_non_negative("annual_insurance", input.annual_insurance.value)?;
    require_non_negative("monthly_hoa", input.monthly_hoa)?;
    require_non_negative("extra_payment", input.extra_payment)?;
    Ok(())
}

fn collect_warnings(
    input: &PurchaseInput,
    fee_spec: &ProgramFeeSpec,
    loan_to_value: Percent,
    amortization: &AmortizationResult,
    accelerated: Option<&AmortizationResult>,
    warnings: &mut Vec<String>,
) {
    if input.term_months == 0 {
        warnings.push("Loan term is zero months — payment reported as 0".into());
    }

    if amortization.hit_iteration_cap || accelerated.is_some_and(|a| a.hit_iteration_cap) {
        warnings.push("Payoff simulation did not converge — check rate and term".into());
    }

    match fee_spec.program {
        LoanProgram::Conventional if loan_to_value > dec!(80) => warnings.push(format!(
            "LTV of {:.1}% exceeds 80% — PMI estimated at 0.5% per year",
            loan_to_value
        )),
        LoanProgram::Jumbo if fee_spec.manual_monthly_premium.is_none() => warnings
            .push("Jumbo loan without a quoted mortgage insurance premium — assumed 0".into()),
        LoanProgram::Fha if !fee_spec.include_upfront_premium => warnings
            .push("FHA upfront MIP not modelled — only the annual premium is included".into()),
        _ => {}
    }
}
