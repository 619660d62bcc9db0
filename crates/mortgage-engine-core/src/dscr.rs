use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::LoanTerms;
use crate::error::MortgageError;
use crate::program_fees;
use crate::types::{require_non_negative, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageResult;

/// DSCR at or above this level is what most DSCR lenders require.
const STRONG_DSCR: Decimal = dec!(1.25);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for an investment property debt-service analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DscrInput {
    pub property_price: Money,
    pub down_payment: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    /// Market rent per unit
    pub monthly_rent: Money,
    #[serde(default = "default_units")]
    pub units: u32,
    /// Vacancy and collection loss (e.g. 0.05 = 5%)
    #[serde(default)]
    pub vacancy_rate: Rate,
    #[serde(default)]
    pub monthly_tax: Money,
    #[serde(default)]
    pub monthly_insurance: Money,
    #[serde(default)]
    pub monthly_repairs: Money,
    #[serde(default)]
    pub monthly_utilities: Money,
    #[serde(default)]
    pub monthly_hoa: Money,
}

fn default_units() -> u32 {
    1
}

/// Coverage band of the DSCR ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DscrRating {
    /// 1.25x or better
    Strong,
    /// Covers debt service, below 1.25x
    Adequate,
    /// NOI does not cover principal & interest
    Insufficient,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DscrResult {
    /// Monthly NOI after vacancy and operating costs
    pub net_operating_income: Money,
    /// NOI / monthly principal & interest
    pub dscr_ratio: Decimal,
    pub rating: DscrRating,
    /// Annual NOI / price, in percent
    pub cap_rate: Percent,
    /// Annual cash flow / down payment, in percent
    pub cash_on_cash_return: Percent,
    /// NOI - principal & interest
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    pub gross_monthly_rent: Money,
    pub vacancy_loss: Money,
    pub monthly_principal_interest: Money,
    pub loan_amount: Money,
    pub loan_to_value: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Debt service coverage, cap rate and cash-on-cash return for a rental.
///
/// The DSCR denominator is principal & interest only, never the all-in
/// payment; the rating bands use the same ratio.
pub fn analyze_dscr(input: &DscrInput) -> MortgageResult<ComputationOutput<DscrResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    // --- Net operating income ---
    let gross_monthly_rent = input.monthly_rent * Decimal::from(input.units);
    let vacancy_loss = gross_monthly_rent * input.vacancy_rate;
    let net_operating_income = gross_monthly_rent
        - vacancy_loss
        - input.monthly_tax
        - input.monthly_insurance
        - input.monthly_repairs
        - input.monthly_utilities
        - input.monthly_hoa;

    // --- Debt service ---
    let loan_amount = input.property_price - input.down_payment;
    let monthly_principal_interest =
        LoanTerms::new(loan_amount, input.annual_rate, input.term_months).monthly_payment();

    let dscr_ratio = if monthly_principal_interest.is_zero() {
        tracing::debug!("no debt service; DSCR reported as 0");
        warnings.push("No principal & interest payment — DSCR reported as 0".into());
        Decimal::ZERO
    } else {
        net_operating_income / monthly_principal_interest
    };

    let cap_rate = if input.property_price.is_zero() {
        warnings.push("Property price is zero — cap rate reported as 0".into());
        Decimal::ZERO
    } else {
        net_operating_income * dec!(12) / input.property_price * dec!(100)
    };

    let monthly_cash_flow = net_operating_income - monthly_principal_interest;
    let annual_cash_flow = monthly_cash_flow * dec!(12);

    let cash_on_cash_return = if input.down_payment.is_zero() {
        warnings.push("No cash invested — cash-on-cash return reported as 0".into());
        Decimal::ZERO
    } else {
        annual_cash_flow / input.down_payment * dec!(100)
    };

    // No debt service to cover
    let rating = if monthly_principal_interest.is_zero() {
        DscrRating::Strong
    } else {
        rate_dscr(dscr_ratio)
    };
    if !monthly_principal_interest.is_zero() && rating == DscrRating::Insufficient {
        warnings.push(format!(
            "DSCR of {dscr_ratio:.2} is below 1.00x — rent does not cover debt service"
        ));
    }
    if input.vacancy_rate > dec!(0.15) {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15% — above typical market norms",
            input.vacancy_rate * dec!(100)
        ));
    }

    let output = DscrResult {
        net_operating_income,
        dscr_ratio,
        rating,
        cap_rate,
        cash_on_cash_return,
        monthly_cash_flow,
        annual_cash_flow,
        gross_monthly_rent,
        vacancy_loss,
        monthly_principal_interest,
        loan_amount,
        loan_to_value: program_fees::loan_to_value(loan_amount, input.property_price),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Investment Property Debt Service Coverage (P&I basis)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

pub fn rate_dscr(dscr_ratio: Decimal) -> DscrRating {
    if dscr_ratio >= STRONG_DSCR {
        DscrRating::Strong
    } else if dscr_ratio >= Decimal::ONE {
        DscrRating::Adequate
    } else {
        DscrRating::Insufficient
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &DscrInput) -> MortgageResult<()> {
    require_non_negative("property_price", input.property_price)?;
    require_non_negative("down_payment", input.down_payment)?;
    require_non_negative("annual_rate", input.annual_rate)?;
    require_non_negative("monthly_rent", input.monthly_rent)?;
    require_non_negative("monthly_tax", input.monthly_tax)?;
    require_non_negative("monthly_insurance", input.monthly_insurance)?;
    require_non_negative("monthly_repairs", input.monthly_repairs)?;
    require_non_negative("monthly_utilities", input.monthly_utilities)?;
    require_non_negative("monthly_hoa", input.monthly_hoa)?;

    if input.down_payment > input.property_price {
        return Err(MortgageError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot exceed the property price".into(),
        });
    }

    if input.vacancy_rate < Decimal::ZERO || input.vacancy_rate >= Decimal::ONE {
        return Err(MortgageError::InvalidInput {
            field: "vacancy_rate".into(),
            reason: "Vacancy rate must be between 0 and 1 (exclusive upper)".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Duplex: $400k, 25% down, 7%, 30 years
    fn sample_input() -> DscrInput {
        DscrInput {
            property_price: dec!(400000),
            down_payment: dec!(100000),
            annual_rate: dec!(0.07),
            term_months: 360,
            monthly_rent: dec!(2000),
            units: 2,
            vacancy_rate: dec!(0.05),
            monthly_tax: dec!(400),
            monthly_insurance: dec!(150),
            monthly_repairs: dec!(200),
            monthly_utilities: Decimal::ZERO,
            monthly_hoa: Decimal::ZERO,
        }
    }

    #[test]
    fn test_noi_calculation() {
        let out = analyze_dscr(&sample_input()).unwrap().result;

        // 4000 - 200 vacancy - 400 - 150 - 200 = 3050
        assert_eq!(out.gross_monthly_rent, dec!(4000));
        assert_eq!(out.vacancy_loss, dec!(200));
        assert_eq!(out.net_operating_income, dec!(3050));
    }

    #[test]
    fn test_dscr_uses_principal_interest_only() {
        let out = analyze_dscr(&sample_input()).unwrap().result;

        // 300k at 7% ≈ 1995.91
        assert!((out.monthly_principal_interest - dec!(1995.91)).abs() < dec!(0.01));
        assert_eq!(
            out.dscr_ratio,
            out.net_operating_income / out.monthly_principal_interest
        );
        assert_eq!(out.rating, DscrRating::Strong);
    }

    #[test]
    fn test_cap_rate_and_cash_on_cash() {
        let out = analyze_dscr(&sample_input()).unwrap().result;

        // 3050 * 12 / 400000 * 100 = 9.15
        assert_eq!(out.cap_rate, dec!(9.15));
        assert_eq!(
            out.monthly_cash_flow,
            out.net_operating_income - out.monthly_principal_interest
        );
        let expected_coc = out.monthly_cash_flow * dec!(12) / dec!(100000) * dec!(100);
        assert_eq!(out.cash_on_cash_return, expected_coc);
    }

    #[test]
    fn test_zero_down_payment_sentinel() {
        let mut input = sample_input();
        input.down_payment = Decimal::ZERO;
        let result = analyze_dscr(&input).unwrap();

        assert_eq!(result.result.cash_on_cash_return, Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("cash-on-cash")));
    }

    #[test]
    fn test_all_cash_purchase_has_no_dscr() {
        let mut input = sample_input();
        input.down_payment = dec!(400000);
        let out = analyze_dscr(&input).unwrap().result;

        assert_eq!(out.monthly_principal_interest, Decimal::ZERO);
        assert_eq!(out.dscr_ratio, Decimal::ZERO);
        assert_eq!(out.monthly_cash_flow, out.net_operating_income);
        assert_eq!(out.rating, DscrRating::Strong);
    }

    #[test]
    fn test_all_cash_property_rated_strong() {
        let mut input = sample_input();
        input.down_payment = input.property_price;
        let result = analyze_dscr(&input).unwrap();

        assert_eq!(result.result.rating, DscrRating::Strong);
        assert!(!result.warnings.iter().any(|w| w.contains("below 1.00x")));
    }

    #[test]
    fn test_low_rent_is_insufficient() {
        let mut input = sample_input();
        input.monthly_rent = dec!(1000);
        let result = analyze_dscr(&input).unwrap();

        assert_eq!(result.result.rating, DscrRating::Insufficient);
        assert!(result.result.monthly_cash_flow < Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("below 1.00x")));
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(rate_dscr(dec!(1.25)), DscrRating::Strong);
        assert_eq!(rate_dscr(dec!(1.1)), DscrRating::Adequate);
        assert_eq!(rate_dscr(dec!(0.99)), DscrRating::Insufficient);
    }

    #[test]
    fn test_vacancy_rate_bounds() {
        let mut input = sample_input();
        input.vacancy_rate = dec!(1);
        assert!(analyze_dscr(&input).is_err());
    }
}
