pub mod affordability;
pub mod calculator;
pub mod dscr;
pub mod purchase;
pub mod refinance;
pub mod rent_vs_buy;
pub mod schedule;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Flag value, or an error naming the flag to pass.
pub(crate) fn required<T>(value: Option<T>, flag: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("--{flag} is required (or provide --input)"))
}

/// Annual percent flag (7 = 7%) as a decimal rate.
pub(crate) fn percent_rate(percent: Decimal) -> Decimal {
    percent / dec!(100)
}

/// Term in whole years as months.
pub(crate) fn years_to_months(years: u32) -> u32 {
    years.saturating_mul(12)
}
