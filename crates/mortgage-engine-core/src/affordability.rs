use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization;
use crate::error::MortgageError;
use crate::types::{require_non_negative, with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a home affordability estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    /// Gross annual household income
    pub annual_income: Money,
    /// Car, student loan, card and other monthly debt payments
    #[serde(default)]
    pub monthly_debts: Money,
    /// Cash available for the down payment
    pub down_payment: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    /// Annual property tax as a fraction of price (e.g. 0.012)
    #[serde(default)]
    pub property_tax_rate: Rate,
    /// Annual homeowners insurance as a fraction of price
    #[serde(default)]
    pub insurance_rate: Rate,
    /// Annual mortgage insurance as a fraction of the loan
    #[serde(default)]
    pub mortgage_insurance_rate: Rate,
    #[serde(default)]
    pub monthly_hoa: Money,
    /// Housing payment / gross income limit
    #[serde(default = "default_front_end")]
    pub front_end_ratio: Rate,
    /// Housing + debts / gross income limit
    #[serde(default = "default_back_end")]
    pub back_end_ratio: Rate,
}

fn default_front_end() -> Rate {
    dec!(0.28)
}

fn default_back_end() -> Rate {
    dec!(0.36)
}

/// Which debt-to-income limit bound the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitingRatio {
    FrontEnd,
    BackEnd,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub max_home_price: Money,
    pub max_loan_amount: Money,
    /// Total housing payment at the maximum price
    pub max_monthly_payment: Money,
    pub principal_interest: Money,
    pub monthly_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_mortgage_insurance: Money,
    pub monthly_hoa: Money,
    pub limiting_ratio: LimitingRatio,
    /// Housing payment / monthly income at the maximum price
    pub front_end_dti: Rate,
    /// (Housing + debts) / monthly income at the maximum price
    pub back_end_dti: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Largest purchase price the income supports under front-end and back-end
/// debt-to-income limits.
///
/// Solves `budget - hoa = (price - down) * (k + mi/12) + price * (tax + ins) / 12`
/// where `k` is the payment per dollar borrowed.
pub fn estimate_affordability(
    input: &AffordabilityInput,
) -> MortgageResult<ComputationOutput<AffordabilityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let monthly_income = input.annual_income / dec!(12);
    let front_limit = monthly_income * input.front_end_ratio;
    let back_limit = monthly_income * input.back_end_ratio - input.monthly_debts;
    let (budget, limiting_ratio) = if back_limit < front_limit {
        (back_limit, LimitingRatio::BackEnd)
    } else {
        (front_limit, LimitingRatio::FrontEnd)
    };

    let available = budget - input.monthly_hoa;
    let per_dollar_borrowed = amortization::monthly_payment(
        Decimal::ONE,
        input.annual_rate,
        input.term_months,
    ) + input.mortgage_insurance_rate / dec!(12);
    let per_dollar_of_price = (input.property_tax_rate + input.insurance_rate) / dec!(12);

    let max_home_price = if available <= Decimal::ZERO {
        warnings.push("Debts and HOA consume the entire housing budget".into());
        Decimal::ZERO
    } else if input.term_months == 0 || per_dollar_borrowed.is_zero() {
        warnings.push("Loan term is zero months — only the down payment is available".into());
        cash_only_price(input.down_payment, available, per_dollar_of_price)
    } else {
        let financed = (available + input.down_payment * per_dollar_borrowed)
            / (per_dollar_borrowed + per_dollar_of_price);
        if financed < input.down_payment {
            cash_only_price(input.down_payment, available, per_dollar_of_price)
        } else {
            financed
        }
    };

    let max_loan_amount = (max_home_price - input.down_payment).max(Decimal::ZERO);
    let principal_interest =
        amortization::monthly_payment(max_loan_amount, input.annual_rate, input.term_months);
    let monthly_tax = max_home_price * input.property_tax_rate / dec!(12);
    let monthly_insurance = max_home_price * input.insurance_rate / dec!(12);
    let monthly_mortgage_insurance = max_loan_amount * input.mortgage_insurance_rate / dec!(12);
    let max_monthly_payment = principal_interest
        + monthly_tax
        + monthly_insurance
        + monthly_mortgage_insurance
        + input.monthly_hoa;

    let (front_end_dti, back_end_dti) = if monthly_income.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            max_monthly_payment / monthly_income,
            (max_monthly_payment + input.monthly_debts) / monthly_income,
        )
    };

    if limiting_ratio == LimitingRatio::BackEnd {
        warnings.push(format!(
            "Existing debts of {:.2}/month limit the budget below the {:.0}% front-end ratio",
            input.monthly_debts,
            input.front_end_ratio * dec!(100)
        ));
    }

    let output = AffordabilityResult {
        max_home_price,
        max_loan_amount,
        max_monthly_payment,
        principal_interest,
        monthly_tax,
        monthly_insurance,
        monthly_mortgage_insurance,
        monthly_hoa: input.monthly_hoa,
        limiting_ratio,
        front_end_dti,
        back_end_dti,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Home Affordability (Front-End / Back-End DTI)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Price payable without a loan: capped by cash on hand and by what the
/// budget covers in tax and insurance.
fn cash_only_price(down_payment: Money, available: Money, per_dollar_of_price: Rate) -> Money {
    if per_dollar_of_price.is_zero() {
        return down_payment;
    }
    down_payment.min(available / per_dollar_of_price)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &AffordabilityInput) -> MortgageResult<()> {
    require_non_negative("annual_income", input.annual_income)?;
    require_non_negative("monthly_debts", input.monthly_debts)?;
    require_non_negative("down_payment", input.down_payment)?;
    require_non_negative("annual_rate", input.annual_rate)?;
    require_non_negative("property_tax_rate", input.property_tax_rate)?;
    require_non_negative("insurance_rate", input.insurance_rate)?;
    require_non_negative("mortgage_insurance_rate", input.mortgage_insurance_rate)?;
    require_non_negative("monthly_hoa", input.monthly_hoa)?;

    for (field, ratio) in [
        ("front_end_ratio", input.front_end_ratio),
        ("back_end_ratio", input.back_end_ratio),
    ] {
        if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
            return Err(MortgageError::InvalidInput {
                field: field.into(),
                reason: "Debt-to-income ratio must be between 0 and 1".into(),
            });
        }
    }

    Ok(())
}
