use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{self, AmortizationResult, LoanTerms};
use crate::payment::{self, RecurringCosts};
use crate::program_fees::{self, ProgramFee, ProgramFeeSpec};
use crate::types::{require_non_negative, with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a refinance comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceInput {
    /// Outstanding balance on the current loan
    pub current_balance: Money,
    /// Current note rate
    pub current_rate: Rate,
    /// Months remaining on the current loan
    pub current_remaining_months: u32,
    /// Monthly mortgage insurance on the current loan, if any
    #[serde(default)]
    pub current_monthly_fee: Money,
    /// Proposed note rate
    pub new_rate: Rate,
    /// Proposed term in months
    pub new_term_months: u32,
    /// Lender and third-party closing costs
    pub closing_costs: Money,
    /// Roll closing costs into the new loan instead of paying them at closing
    #[serde(default)]
    pub finance_closing_costs: bool,
    /// Equity withdrawn at closing
    #[serde(default)]
    pub cash_out: Money,
    /// Program of the new loan (e.g. a VA refinance with funding fee)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_program: Option<ProgramFeeSpec>,
    /// Roll the new loan's upfront program fee into its balance
    #[serde(default)]
    pub finance_program_fee: bool,
    /// Tax / insurance / HOA, identical before and after
    #[serde(default)]
    pub recurring_costs: RecurringCosts,
}

/// When the monthly savings pay back the closing costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEven {
    /// Closing costs are recouped after this many months
    Months(Decimal),
    /// The new loan does not lower the payment, so costs are never recouped
    Never,
}

impl BreakEven {
    pub fn months(&self) -> Option<Decimal> {
        match self {
            BreakEven::Months(m) => Some(*m),
            BreakEven::Never => None,
        }
    }
}

/// Current vs. proposed loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceComparison {
    /// Composed monthly payment on the current loan
    pub current_payment: Money,
    /// Composed monthly payment on the new loan
    pub new_payment: Money,
    /// current_payment - new_payment; negative when the payment rises
    pub monthly_savings: Money,
    pub break_even: BreakEven,
    /// new_total_interest - current_remaining_interest
    pub lifetime_interest_delta: Money,
    pub current_remaining_interest: Money,
    pub new_total_interest: Money,
    /// Principal of the new loan after cash-out and financed costs
    pub new_loan_amount: Money,
    pub new_program_fee: ProgramFee,
    /// Closing costs plus upfront program fee
    pub total_closing_costs: Money,
    /// Costs paid in cash at closing
    pub out_of_pocket_costs: Money,
    /// Remaining payments on the current loan minus all payments and cash
    /// costs on the new loan, plus cash received
    pub net_lifetime_savings: Money,
    pub current_loan: AmortizationResult,
    pub new_loan: AmortizationResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare the remaining life of a current loan against a proposed refinance.
pub fn analyze_refinance(
    input: &RefinanceInput,
) -> MortgageResult<ComputationOutput<RefinanceComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    // --- Current loan over its own remaining term ---
    let current_terms = LoanTerms::new(
        input.current_balance,
        input.current_rate,
        input.current_remaining_months,
    );
    let current_loan = amortization::simulate_payoff(&current_terms);
    let current_fee = ProgramFee {
        upfront: Decimal::ZERO,
        monthly_recurring: input.current_monthly_fee,
    };
    let current_payment = payment::compose(
        current_loan.monthly_payment,
        &current_fee,
        &input.recurring_costs,
        Decimal::ZERO,
    );

    // --- New loan sizing ---
    let base_new_amount = input.current_balance
        + input.cash_out
        + if input.finance_closing_costs {
            input.closing_costs
        } else {
            Decimal::ZERO
        };
    let new_program_fee = input
        .new_program
        .as_ref()
        .map(|spec| program_fees::compute_fee(base_new_amount, spec))
        .unwrap_or_default();
    let new_loan_amount = if input.finance_program_fee {
        program_fees::financed_loan_amount(base_new_amount, &new_program_fee)
    } else {
        base_new_amount
    };

    let new_terms = LoanTerms::new(new_loan_amount, input.new_rate, input.new_term_months);
    let new_loan = amortization::simulate_payoff(&new_terms);
    let new_payment = payment::compose(
        new_loan.monthly_payment,
        &new_program_fee,
        &input.recurring_costs,
        Decimal::ZERO,
    );

    // --- Savings and break-even ---
    let monthly_savings = current_payment.total - new_payment.total;
    let total_closing_costs = input.closing_costs + new_program_fee.upfront;
    let break_even = break_even(total_closing_costs, monthly_savings);

    let lifetime_interest_delta = new_loan.total_interest - current_loan.total_interest;

    let mut out_of_pocket_costs = Decimal::ZERO;
    if !input.finance_closing_costs {
        out_of_pocket_costs += input.closing_costs;
    }
    if !input.finance_program_fee {
        out_of_pocket_costs += new_program_fee.upfront;
    }

    let current_remaining_paid = current_loan.total_paid
        + input.current_monthly_fee * Decimal::from(current_loan.actual_term_months);
    let new_total_paid = new_loan.total_paid
        + new_program_fee.monthly_recurring * Decimal::from(new_loan.actual_term_months);
    let net_lifetime_savings =
        current_remaining_paid - new_total_paid - out_of_pocket_costs + input.cash_out;

    // --- Warnings ---
    if monthly_savings <= Decimal::ZERO {
        warnings.push(format!(
            "New payment is not lower (savings {monthly_savings:.2}) — closing costs are never recouped"
        ));
    }
    if input.new_term_months > input.current_remaining_months {
        warnings.push(format!(
            "New term of {} months extends payoff beyond the {} months remaining",
            input.new_term_months, input.current_remaining_months
        ));
    }
    if let BreakEven::Months(m) = break_even {
        if m > Decimal::from(input.new_term_months) {
            warnings.push("Break-even falls after the new loan is paid off".into());
        }
    }
    if current_loan.hit_iteration_cap || new_loan.hit_iteration_cap {
        warnings.push("Payoff simulation did not converge — check rates and terms".into());
    }

    let output = RefinanceComparison {
        current_payment: current_payment.total,
        new_payment: new_payment.total,
        monthly_savings,
        break_even,
        lifetime_interest_delta,
        current_remaining_interest: current_loan.total_interest,
        new_total_interest: new_loan.total_interest,
        new_loan_amount,
        new_program_fee,
        total_closing_costs,
        out_of_pocket_costs,
        net_lifetime_savings,
        current_loan,
        new_loan,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Refinance Break-Even and Lifetime Interest Comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Months of savings needed to recover `closing_costs`. Non-positive savings
/// never recoup anything.
pub fn break_even(closing_costs: Money, monthly_savings: Money) -> BreakEven {
    if monthly_savings <= Decimal::ZERO {
        return BreakEven::Never;
    }
    BreakEven::Months(closing_costs / monthly_savings)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &RefinanceInput) -> MortgageResult<()> {
    require_non_negative("current_balance", input.current_balance)?;
    require_non_negative("current_rate", input.current_rate)?;
    require_non_negative("current_monthly_fee", input.current_monthly_fee)?;
    require_non_negative("new_rate", input.new_rate)?;
    require_non_negative("closing_costs", input.closing_costs)?;
    require_non_negative("cash_out", input.cash_out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program_fees::VaTier;
    use rust_decimal_macros::dec;

    fn sample_input() -> RefinanceInput {
        RefinanceInput {
            current_balance: dec!(250000),
            current_rate: dec!(0.075),
            current_remaining_months: 300,
            current_monthly_fee: Decimal::ZERO,
            new_rate: dec!(0.06),
            new_term_months: 300,
            closing_costs: dec!(5000),
            finance_closing_costs: false,
            cash_out: Decimal::ZERO,
            new_program: None,
            finance_program_fee: false,
            recurring_costs: RecurringCosts::default(),
        }
    }

    #[test]
    fn test_rate_drop_saves_money() {
        let out = analyze_refinance(&sample_input()).unwrap().result;

        assert_eq!(out.monthly_savings, out.current_payment - out.new_payment);
        assert!(out.monthly_savings > dec!(200), "savings {}", out.monthly_savings);
        assert!(out.lifetime_interest_delta < Decimal::ZERO);
        assert!(out.net_lifetime_savings > Decimal::ZERO);
    }

    #[test]
    fn test_break_even_months() {
        let out = analyze_refinance(&sample_input()).unwrap().result;
        let months = out.break_even.months().unwrap();

        assert_eq!(months, dec!(5000) / out.monthly_savings);
        assert!(months > dec!(10) && months < dec!(30), "break-even {months}");
    }

    #[test]
    fn test_rate_increase_never_recoups() {
        let mut input = sample_input();
        input.new_rate = dec!(0.09);
        let result = analyze_refinance(&input).unwrap();

        assert!(result.result.monthly_savings < Decimal::ZERO);
        assert_eq!(result.result.break_even, BreakEven::Never);
        assert!(result.warnings.iter().any(|w| w.contains("never recouped")));
    }

    #[test]
    fn test_break_even_helper() {
        assert_eq!(break_even(dec!(3000), dec!(150)), BreakEven::Months(dec!(20)));
        assert_eq!(break_even(dec!(3000), Decimal::ZERO), BreakEven::Never);
        assert_eq!(break_even(dec!(3000), dec!(-25)), BreakEven::Never);
    }

    #[test]
    fn test_longer_term_extends_interest() {
        let mut input = sample_input();
        input.current_rate = dec!(0.065);
        input.current_remaining_months = 180;
        input.new_term_months = 360;
        let result = analyze_refinance(&input).unwrap();

        // Lower payment but more interest overall
        assert!(result.result.monthly_savings > Decimal::ZERO);
        assert!(result.result.lifetime_interest_delta > Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("extends payoff")));
    }

    #[test]
    fn test_financed_costs_grow_loan() {
        let mut input = sample_input();
        input.finance_closing_costs = true;
        input.cash_out = dec!(20000);
        let out = analyze_refinance(&input).unwrap().result;

        assert_eq!(out.new_loan_amount, dec!(275000));
        assert_eq!(out.out_of_pocket_costs, Decimal::ZERO);
    }

    #[test]
    fn test_va_refinance_funding_fee() {
        let mut input = sample_input();
        input.new_program = Some(ProgramFeeSpec::va(VaTier::Subsequent));
        input.finance_program_fee = true;
        let out = analyze_refinance(&input).unwrap().result;

        // 250000 * 0.033 = 8250
        assert_eq!(out.new_program_fee.upfront, dec!(8250));
        assert_eq!(out.new_loan_amount, dec!(258250));
        assert_eq!(out.total_closing_costs, dec!(13250));
        assert_eq!(out.out_of_pocket_costs, dec!(5000));
    }

    #[test]
    fn test_negative_closing_costs_rejected() {
        let mut input = sample_input();
        input.closing_costs = dec!(-1);
        assert!(analyze_refinance(&input).is_err());
    }
}
