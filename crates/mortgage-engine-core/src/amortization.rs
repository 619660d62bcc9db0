use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Residual balance below half a cent is treated as paid off, so a loan with
/// no extra payment retires exactly at term.
const PAYOFF_TOLERANCE: Decimal = dec!(0.005);

/// Payoff simulation aborts after this many multiples of the contractual term.
const ITERATION_CAP_MULTIPLE: u32 = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Terms of a fixed-rate, fully amortising loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed (or remaining balance for an existing loan)
    pub principal: Money,
    /// Annual note rate as a decimal (0.07 = 7%)
    pub annual_rate: Rate,
    /// Contractual term in months
    pub term_months: u32,
    /// Constant additional principal paid every month
    #[serde(default)]
    pub extra_payment: Money,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate: Rate, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            extra_payment: Decimal::ZERO,
        }
    }

    pub fn with_extra_payment(mut self, extra_payment: Money) -> Self {
        self.extra_payment = extra_payment;
        self
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate / dec!(12)
    }

    /// Scheduled principal & interest, excluding any extra payment.
    pub fn monthly_payment(&self) -> Money {
        monthly_payment(self.principal, self.annual_rate, self.term_months)
    }
}

/// Outcome of simulating a loan to payoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Scheduled principal & interest (excludes extra payment)
    pub monthly_payment: Money,
    /// Interest paid over the life of the loan
    pub total_interest: Money,
    /// Principal + interest actually paid
    pub total_paid: Money,
    /// Months until the balance reached zero
    pub actual_term_months: u32,
    /// The simulation stopped at the iteration cap with a balance still
    /// outstanding. The other fields are not a valid amortization.
    pub hit_iteration_cap: bool,
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub month: u32,
    /// Total paid this month (interest + principal, including extra)
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub balance: Money,
    pub cumulative_interest: Money,
}

/// Schedule entries rolled up by loan year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub principal: Money,
    pub interest: Money,
    pub ending_balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Standard fixed-rate mortgage payment: P * r / (1 - (1+r)^-n)
///
/// Evaluated in discount-factor form so no intermediate exceeds `P * r`.
/// A zero rate degrades to straight-line `principal / term_months`. A zero
/// term has no defined payment and yields 0. When `(1+r)^-n` vanishes below
/// decimal precision the payment is its interest-only limit `P * r`.
pub fn monthly_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Money {
    if term_months == 0 {
        tracing::debug!("monthly payment requested for a zero-month term");
        return Decimal::ZERO;
    }

    let monthly_rate = annual_rate / dec!(12);
    if monthly_rate.is_zero() {
        return principal / Decimal::from(term_months);
    }

    let denominator = Decimal::ONE - discount_factor(monthly_rate, term_months);
    if denominator <= Decimal::ZERO {
        return principal / Decimal::from(term_months);
    }

    principal * monthly_rate / denominator
}

/// (1 + r)^-n via iterative multiplication of the one-period discount.
fn discount_factor(monthly_rate: Rate, periods: u32) -> Decimal {
    let step = Decimal::ONE / (Decimal::ONE + monthly_rate);
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor *= step;
        if factor.is_zero() {
            break;
        }
    }
    factor
}

/// Simulate the loan month by month, applying `extra_payment` to principal
/// every period, until the balance is retired.
///
/// The loop is capped at twice the contractual term; hitting the cap is
/// reported through `hit_iteration_cap` and must be treated as invalid input.
pub fn simulate_payoff(terms: &LoanTerms) -> AmortizationResult {
    run_schedule(terms, |_| {})
}

/// Full month-by-month schedule, following the same rules as
/// [`simulate_payoff`].
pub fn amortization_schedule(terms: &LoanTerms) -> Vec<ScheduleEntry> {
    let mut entries = Vec::with_capacity(terms.term_months as usize);
    run_schedule(terms, |entry| entries.push(entry.clone()));
    entries
}

/// Roll a monthly schedule up into loan years (months 1-12 are year 1).
pub fn yearly_summary(schedule: &[ScheduleEntry]) -> Vec<YearSummary> {
    let mut years: Vec<YearSummary> = Vec::new();

    for entry in schedule {
        let year = (entry.month - 1) / 12 + 1;
        match years.last_mut() {
            Some(current) if current.year == year => {
                current.principal += entry.principal;
                current.interest += entry.interest;
                current.ending_balance = entry.balance;
            }
            _ => years.push(YearSummary {
                year,
                principal: entry.principal,
                interest: entry.interest,
                ending_balance: entry.balance,
            }),
        }
    }

    years
}

/// Principal retired during the first `months` payments.
pub fn principal_paid_within(terms: &LoanTerms, months: u32) -> Money {
    terms.principal - remaining_balance_after(terms, months)
}

/// Outstanding balance after `months` payments (0 once paid off).
pub fn remaining_balance_after(terms: &LoanTerms, months: u32) -> Money {
    if months == 0 {
        return terms.principal;
    }

    let mut balance = terms.principal;
    run_schedule(terms, |entry| {
        if entry.month <= months {
            balance = entry.balance;
        }
    });
    balance
}

// ---------------------------------------------------------------------------
// Schedule loop
// ---------------------------------------------------------------------------

fn run_schedule(terms: &LoanTerms, mut visit: impl FnMut(&ScheduleEntry)) -> AmortizationResult {
    let scheduled = terms.monthly_payment();
    let monthly_rate = terms.monthly_rate();
    let cap = terms.term_months.saturating_mul(ITERATION_CAP_MULTIPLE);

    let mut balance = terms.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut month = 0u32;

    while balance > Decimal::ZERO && month < cap {
        month += 1;

        let interest = balance * monthly_rate;
        let mut principal_paid = (scheduled - interest + terms.extra_payment).min(balance);
        if balance - principal_paid < PAYOFF_TOLERANCE {
            principal_paid = balance;
        }

        balance -= principal_paid;
        total_interest += interest;
        total_paid += interest + principal_paid;

        visit(&ScheduleEntry {
            month,
            payment: interest + principal_paid,
            principal: principal_paid,
            interest,
            balance,
            cumulative_interest: total_interest,
        });
    }

    let hit_iteration_cap = balance > Decimal::ZERO;
    if hit_iteration_cap {
        tracing::warn!(
            principal = %terms.principal,
            annual_rate = %terms.annual_rate,
            term_months = terms.term_months,
            remaining = %balance,
            "payoff simulation hit iteration cap"
        );
    }

    AmortizationResult {
        monthly_payment: scheduled,
        total_interest,
        total_paid,
        actual_term_months: month,
        hit_iteration_cap,
    }
}
