use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{self, LoanTerms};
use crate::error::MortgageError;
use crate::payment::{self, RecurringCosts};
use crate::program_fees::{self, ProgramFee, ProgramFeeSpec};
use crate::types::{require_non_negative, with_metadata, ComputationOutput, Money, Rate};
use crate::units::RelativeAmount;
use crate::MortgageResult;

/// Longest holding period compared
const MAX_HOLDING_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a rent-vs-buy comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuyInput {
    pub home_price: Money,
    /// Down payment, in dollars or as a percentage of price
    pub down_payment: RelativeAmount,
    pub annual_rate: Rate,
    pub term_months: u32,
    /// How long the home is held before selling
    pub years: u32,
    /// Rent today
    pub monthly_rent: Money,
    /// Yearly rent escalation (may be negative)
    pub rent_increase: Rate,
    /// Yearly home appreciation (may be negative)
    pub appreciation_rate: Rate,
    /// Buyer closing costs, in dollars or as a percentage of price
    pub closing_costs_buy: RelativeAmount,
    /// Selling costs, in dollars or as a percentage of the sale price
    pub closing_costs_sell: RelativeAmount,
    /// Tax / insurance / HOA while owning
    #[serde(default)]
    pub recurring_costs: RecurringCosts,
    /// Loan program, for mortgage insurance on the buy side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<ProgramFeeSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Rent,
    Buy,
}

/// Cumulative position at the end of one holding year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuyYear {
    pub year: u32,
    pub cumulative_rent: Money,
    /// Buy cost if the home were sold at the end of this year
    pub cumulative_buy_cost: Money,
    pub home_value: Money,
    pub equity_built: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuyResult {
    pub total_rent_cost: Money,
    pub total_buy_cost: Money,
    /// total_rent_cost - total_buy_cost; positive favours buying
    pub net_difference: Money,
    pub recommendation: Recommendation,
    pub home_value_after: Money,
    /// Appreciation plus principal retired over the holding period
    pub equity_built: Money,
    pub principal_paid: Money,
    /// Composed monthly ownership payment
    pub monthly_payment: Money,
    pub loan_amount: Money,
    pub down_payment: Money,
    pub closing_costs_buy: Money,
    pub closing_costs_sell: Money,
    pub yearly: Vec<RentVsBuyYear>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Total cost of renting vs. buying over a holding period.
pub fn compare_rent_vs_buy(
    input: &RentVsBuyInput,
) -> MortgageResult<ComputationOutput<RentVsBuyResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let down_payment = input.down_payment.to_dollars(input.home_price);
    if down_payment > input.home_price {
        return Err(MortgageError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot exceed the home price".into(),
        });
    }
    let closing_costs_buy = input.closing_costs_buy.to_dollars(input.home_price);

    // --- Ownership payment ---
    let loan_amount = input.home_price - down_payment;
    let terms = LoanTerms::new(loan_amount, input.annual_rate, input.term_months);
    let program_fee = match &input.program {
        Some(spec) => {
            let mut spec = spec.clone();
            if spec.down_payment_percent.is_none() {
                spec.down_payment_percent = Some(input.down_payment.to_percent(input.home_price));
            }
            program_fees::compute_fee(loan_amount, &spec)
        }
        None => ProgramFee::default(),
    };
    let monthly = payment::compose(
        terms.monthly_payment(),
        &program_fee,
        &input.recurring_costs,
        Decimal::ZERO,
    );
    let monthly_payment = monthly.total;

    // --- Walk the holding period a year at a time ---
    let mut yearly = Vec::with_capacity(input.years as usize);
    let mut cumulative_rent = Decimal::ZERO;
    let mut rent = input.monthly_rent;
    let mut home_value = input.home_price;
    let mut closing_costs_sell = input.closing_costs_sell.to_dollars(home_value);
    let mut principal_paid = Decimal::ZERO;
    let mut equity_built = Decimal::ZERO;
    let mut buy_cost = down_payment + closing_costs_buy + closing_costs_sell;

    let schedule = amortization::amortization_schedule(&terms);
    let mut scheduled = schedule.iter().peekable();

    for year in 1..=input.years {
        if year > 1 {
            rent = grow(rent, input.rent_increase, "rent_increase")?;
        }
        cumulative_rent += rent * dec!(12);
        home_value = grow(home_value, input.appreciation_rate, "appreciation_rate")?;

        let year_end = year * 12;
        while let Some(entry) = scheduled.next_if(|e| e.month <= year_end) {
            principal_paid += entry.principal;
        }
        equity_built = (home_value - input.home_price) + principal_paid;
        closing_costs_sell = input.closing_costs_sell.to_dollars(home_value);
        buy_cost = down_payment
            + closing_costs_buy
            + monthly_payment * dec!(12) * Decimal::from(year)
            - equity_built
            + closing_costs_sell;

        yearly.push(RentVsBuyYear {
            year,
            cumulative_rent,
            cumulative_buy_cost: buy_cost,
            home_value,
            equity_built,
        });
    }

    let total_rent_cost = cumulative_rent;
    let total_buy_cost = buy_cost;
    let net_difference = total_rent_cost - total_buy_cost;
    let recommendation = if total_rent_cost > total_buy_cost {
        Recommendation::Buy
    } else {
        Recommendation::Rent
    };

    // --- Warnings ---
    if input.appreciation_rate < Decimal::ZERO {
        warnings.push(format!(
            "Home value declines {:.1}% per year — equity relies on principal paydown",
            -input.appreciation_rate * dec!(100)
        ));
    }
    if input.years.saturating_mul(12) > input.term_months {
        warnings.push(
            "Holding period outlasts the loan term — payments are still counted every year".into(),
        );
    }
    if let Some(break_year) = yearly
        .iter()
        .find(|y| y.cumulative_rent > y.cumulative_buy_cost)
        .map(|y| y.year)
    {
        if recommendation == Recommendation::Buy && break_year > 1 {
            warnings.push(format!("Buying overtakes renting in year {break_year}"));
        }
    }

    let output = RentVsBuyResult {
        total_rent_cost,
        total_buy_cost,
        net_difference,
        recommendation,
        home_value_after: home_value,
        equity_built,
        principal_paid,
        monthly_payment,
        loan_amount,
        down_payment,
        closing_costs_buy,
        closing_costs_sell,
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rent vs. Buy Total Cost Comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// One year of growth, rejecting values that leave the decimal range.
fn grow(value: Money, rate: Rate, field: &str) -> MortgageResult<Money> {
    value
        .checked_mul(Decimal::ONE + rate)
        .ok_or_else(|| MortgageError::InvalidInput {
            field: field.into(),
            reason: "Growth over the holding period exceeds the representable range".into(),
        })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &RentVsBuyInput) -> MortgageResult<()> {
    if input.years < 1 || input.years > MAX_HOLDING_YEARS {
        return Err(MortgageError::InvalidInput {
            field: "years".into(),
            reason: format!("Holding period must be between 1 and {MAX_HOLDING_YEARS} years"),
        });
    }

    require_non_negative("home_price", input.home_price)?;
    require_non_negative("down_payment", input.down_payment.value)?;
    require_non_negative("annual_rate", input.annual_rate)?;
    require_non_negative("monthly_rent", input.monthly_rent)?;
    require_non_negative("closing_costs_buy", input.closing_costs_buy.value)?;
    require_non_negative("closing_costs_sell", input.closing_costs_sell.value)?;
    require_non_negative("monthly_tax", input.recurring_costs.monthly_tax)?;
    require_non_negative("monthly_insurance", input.recurring_costs.monthly_insurance)?;
    require_non_negative("monthly_hoa", input.recurring_costs.monthly_hoa)?;

    // Growth rates may be negative, but not a total loss per year
    for (field, rate) in [
        ("rent_increase", input.rent_increase),
        ("appreciation_rate", input.appreciation_rate),
    ] {
        if rate <= dec!(-1) {
            return Err(MortgageError::InvalidInput {
                field: field.into(),
                reason: "Must be greater than -100% per year".into(),
            });
        }
    }

    Ok(())
}
