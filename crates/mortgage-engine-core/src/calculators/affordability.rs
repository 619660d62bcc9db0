use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{interest_rate_field, loan_term_field, Form, InputField, ResultRow};
use crate::affordability::{self, AffordabilityInput, AffordabilityResult};
use crate::types::ChartSlice;
use crate::MortgageResult;

pub fn fields() -> Vec<InputField> {
    vec![
        InputField::currency("annualIncome", "Gross Annual Income")
            .range(Decimal::ZERO, dec!(100000000))
            .step(dec!(1000))
            .required()
            .placeholder("120000"),
        InputField::currency("monthlyDebts", "Monthly Debt Payments")
            .range(Decimal::ZERO, dec!(1000000))
            .placeholder("500"),
        InputField::currency("downPayment", "Down Payment Available")
            .step(dec!(1000))
            .required()
            .placeholder("60000"),
        interest_rate_field("interestRate", "Interest Rate"),
        loan_term_field(),
        InputField::percentage("propertyTaxRate", "Property Tax Rate (annual)")
            .range(Decimal::ZERO, dec!(10))
            .placeholder("1.2")
            .default_value(dec!(1.2)),
        InputField::percentage("insuranceRate", "Insurance Rate (annual)")
            .range(Decimal::ZERO, dec!(10))
            .placeholder("0.35")
            .default_value(dec!(0.35)),
        InputField::percentage("mortgageInsuranceRate", "Mortgage Insurance Rate (annual)")
            .range(Decimal::ZERO, dec!(5))
            .placeholder("0"),
        InputField::currency("hoaFees", "Monthly HOA Dues")
            .range(Decimal::ZERO, dec!(100000))
            .placeholder("0"),
        InputField::percentage("frontEndRatio", "Front-End DTI Limit")
            .range(Decimal::ONE, dec!(100))
            .placeholder("28")
            .default_value(dec!(28)),
        InputField::percentage("backEndRatio", "Back-End DTI Limit")
            .range(Decimal::ONE, dec!(100))
            .placeholder("36")
            .default_value(dec!(36)),
    ]
}

pub(crate) fn calculate(form: &Form) -> MortgageResult<Vec<ResultRow>> {
    let out = analyze(form)?;

    Ok(vec![
        ResultRow::currency("Maximum Home Price", out.max_home_price),
        ResultRow::currency("Maximum Loan Amount", out.max_loan_amount),
        ResultRow::currency("Maximum Monthly Payment", out.max_monthly_payment),
        ResultRow::currency("Principal & Interest", out.principal_interest),
        ResultRow::currency("Property Tax", out.monthly_tax),
        ResultRow::currency("Homeowners Insurance", out.monthly_insurance),
        ResultRow::currency("Mortgage Insurance", out.monthly_mortgage_insurance),
        ResultRow::percentage("Front-End DTI", out.front_end_dti * dec!(100)),
        ResultRow::percentage("Back-End DTI", out.back_end_dti * dec!(100)),
    ])
}

pub(crate) fn chart(form: &Form) -> MortgageResult<Vec<ChartSlice>> {
    let out = analyze(form)?;
    let parts = [
        ("Principal & Interest", out.principal_interest, "#2563eb"),
        ("Property Tax", out.monthly_tax, "#10b981"),
        ("Homeowners Insurance", out.monthly_insurance, "#8b5cf6"),
        ("Mortgage Insurance", out.monthly_mortgage_insurance, "#f59e0b"),
        ("HOA Dues", out.monthly_hoa, "#ec4899"),
    ];
    Ok(parts
        .into_iter()
        .filter(|(_, value, _)| !value.is_zero())
        .map(|(label, value, color)| ChartSlice {
            label: label.into(),
            value,
            color: color.into(),
        })
        .collect())
}

fn analyze(form: &Form) -> MortgageResult<AffordabilityResult> {
    let input = AffordabilityInput {
        annual_income: form.value("annualIncome"),
        monthly_debts: form.value("monthlyDebts"),
        down_payment: form.value("downPayment"),
        annual_rate: form.rate("interestRate"),
        term_months: form.months_from_years("loanTerm"),
        property_tax_rate: form.rate("propertyTaxRate"),
        insurance_rate: form.rate("insuranceRate"),
        mortgage_insurance_rate: form.rate("mortgageInsuranceRate"),
        monthly_hoa: form.value("hoaFees"),
        front_end_ratio: form.rate("frontEndRatio"),
        back_end_ratio: form.rate("backEndRatio"),
    };

    Ok(affordability::estimate_affordability(&input)?.result)
}
