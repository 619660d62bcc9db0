use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::program_fees::ProgramFee;
use crate::types::{ChartSlice, Money};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Recurring non-loan housing costs, per month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurringCosts {
    pub monthly_tax: Money,
    pub monthly_insurance: Money,
    #[serde(default)]
    pub monthly_hoa: Money,
}

/// Which part of the monthly payment a component represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentComponent {
    PrincipalInterest,
    ProgramFee,
    Tax,
    Insurance,
    Hoa,
    ExtraPayment,
}

impl PaymentComponent {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentComponent::PrincipalInterest => "Principal & Interest",
            PaymentComponent::ProgramFee => "Mortgage Insurance / Program Fee",
            PaymentComponent::Tax => "Property Tax",
            PaymentComponent::Insurance => "Homeowners Insurance",
            PaymentComponent::Hoa => "HOA Dues",
            PaymentComponent::ExtraPayment => "Extra Principal",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            PaymentComponent::PrincipalInterest => "#2563eb",
            PaymentComponent::ProgramFee => "#f59e0b",
            PaymentComponent::Tax => "#10b981",
            PaymentComponent::Insurance => "#8b5cf6",
            PaymentComponent::Hoa => "#ec4899",
            PaymentComponent::ExtraPayment => "#64748b",
        }
    }
}

/// A full monthly payment, broken into its parts.
///
/// `total` is always the sum of the six components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPaymentBreakdown {
    pub principal_interest: Money,
    pub program_fee: Money,
    pub tax: Money,
    pub insurance: Money,
    pub hoa: Money,
    pub extra_payment: Money,
    pub total: Money,
}

impl MonthlyPaymentBreakdown {
    /// Components in display order.
    pub fn components(&self) -> [(PaymentComponent, Money); 6] {
        [
            (PaymentComponent::PrincipalInterest, self.principal_interest),
            (PaymentComponent::ProgramFee, self.program_fee),
            (PaymentComponent::Tax, self.tax),
            (PaymentComponent::Insurance, self.insurance),
            (PaymentComponent::Hoa, self.hoa),
            (PaymentComponent::ExtraPayment, self.extra_payment),
        ]
    }

    /// Housing payment without the voluntary extra principal.
    pub fn required_total(&self) -> Money {
        self.total - self.extra_payment
    }

    /// Non-zero components as chart slices.
    pub fn chart_data(&self) -> Vec<ChartSlice> {
        self.components()
            .iter()
            .filter(|(_, value)| !value.is_zero())
            .map(|(component, value)| ChartSlice {
                label: component.label().to_string(),
                value: *value,
                color: component.color().to_string(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Combine P&I, the recurring program fee, recurring costs and an optional
/// extra principal payment into one monthly figure.
pub fn compose(
    principal_interest: Money,
    fee: &ProgramFee,
    costs: &RecurringCosts,
    extra_payment: Money,
) -> MonthlyPaymentBreakdown {
    let mut breakdown = MonthlyPaymentBreakdown {
        principal_interest,
        program_fee: fee.monthly_recurring,
        tax: costs.monthly_tax,
        insurance: costs.monthly_insurance,
        hoa: costs.monthly_hoa,
        extra_payment,
        total: Decimal::ZERO,
    };
    breakdown.total = sum_components(&breakdown.components());
    breakdown
}

/// Sum of any set of components, independent of order.
pub fn sum_components(components: &[(PaymentComponent, Money)]) -> Money {
    components.iter().map(|(_, value)| *value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_costs() -> RecurringCosts {
        RecurringCosts {
            monthly_tax: dec!(312.50),
            monthly_insurance: dec!(125),
            monthly_hoa: dec!(45),
        }
    }

    #[test]
    fn test_compose_totals_components() {
        let fee = ProgramFee {
            upfront: dec!(4200),
            monthly_recurring: dec!(170),
        };
        let b = compose(dec!(1596.73), &fee, &sample_costs(), Decimal::ZERO);

        assert_eq!(b.total, dec!(2249.23));
        assert_eq!(b.program_fee, dec!(170));
        assert_eq!(b.required_total(), b.total);
    }

    #[test]
    fn test_extra_payment_adds_exactly() {
        let fee = ProgramFee::default();
        let without = compose(dec!(1596.73), &fee, &sample_costs(), Decimal::ZERO);
        let with = compose(dec!(1596.73), &fee, &sample_costs(), dec!(200));

        assert_eq!(with.total - without.total, dec!(200));
        assert_eq!(with.required_total(), without.total);
    }

    #[test]
    fn test_upfront_fee_not_in_monthly_total() {
        let fee = ProgramFee {
            upfront: dec!(4300),
            monthly_recurring: Decimal::ZERO,
        };
        let b = compose(dec!(1000), &fee, &RecurringCosts::default(), Decimal::ZERO);
        assert_eq!(b.total, dec!(1000));
    }

    #[test]
    fn test_chart_data_skips_zero_components() {
        let b = compose(
            dec!(1500),
            &ProgramFee::default(),
            &sample_costs(),
            Decimal::ZERO,
        );
        let slices = b.chart_data();

        assert_eq!(slices.len(), 4);
        assert_eq!(slices[0].label, "Principal & Interest");
        assert!(slices.iter().all(|s| s.color.starts_with('#')));
    }
}
