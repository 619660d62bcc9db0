pub mod amortization;
pub mod error;
pub mod payment;
pub mod program_fees;
pub mod purchase;
pub mod types;
pub mod units;

#[cfg(feature = "refinance")]
pub mod refinance;

#[cfg(feature = "rent_vs_buy")]
pub mod rent_vs_buy;

#[cfg(feature = "investment")]
pub mod dscr;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "calculators")]
pub mod calculators;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage-engine operations
pub type MortgageResult<T> = Result<T, MortgageError>;
