use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How an amount relative to a base value was entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountMode {
    /// Absolute dollar amount
    #[default]
    Dollar,
    /// Percentage of the base value (20 = 20%)
    Percent,
}

/// An amount that may be expressed either in dollars or as a percentage of
/// some base value (down payment vs. home price, insurance vs. home value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeAmount {
    pub mode: AmountMode,
    pub value: Decimal,
}

impl RelativeAmount {
    pub fn dollars(value: Money) -> Self {
        Self {
            mode: AmountMode::Dollar,
            value,
        }
    }

    pub fn percent(value: Percent) -> Self {
        Self {
            mode: AmountMode::Percent,
            value,
        }
    }

    /// Canonical dollar amount against `base`.
    pub fn to_dollars(&self, base: Money) -> Money {
        match self.mode {
            AmountMode::Dollar => self.value,
            AmountMode::Percent => percent_to_dollar(self.value, base),
        }
    }

    /// Percentage of `base`; 0 when `base` is not positive.
    pub fn to_percent(&self, base: Money) -> Percent {
        match self.mode {
            AmountMode::Dollar => dollar_to_percent(self.value, base),
            AmountMode::Percent => self.value,
        }
    }

    /// Re-express this amount in another mode without changing what it means.
    pub fn convert(&self, mode: AmountMode, base: Money) -> Self {
        match mode {
            AmountMode::Dollar => Self::dollars(self.to_dollars(base)),
            AmountMode::Percent => Self::percent(self.to_percent(base)),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Dollar amount as a percentage of `base`. A zero or negative base yields 0.
pub fn dollar_to_percent(dollar_amount: Money, base: Money) -> Percent {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    dollar_amount / base * dec!(100)
}

/// Percentage of `base` as a dollar amount.
pub fn percent_to_dollar(percent: Percent, base: Money) -> Money {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    base * percent / dec!(100)
}
