use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{interest_rate_field, loan_term_field, Form, InputField, ResultRow};
use crate::dscr::{self, DscrInput, DscrResult};
use crate::types::ChartSlice;
use crate::MortgageResult;

pub fn fields() -> Vec<InputField> {
    vec![
        InputField::currency("propertyPrice", "Property Price")
            .range(dec!(10000), dec!(100000000))
            .step(dec!(1000))
            .required()
            .placeholder("400000"),
        InputField::currency("downPayment", "Down Payment")
            .step(dec!(1000))
            .required()
            .placeholder("100000"),
        interest_rate_field("interestRate", "Interest Rate"),
        loan_term_field(),
        InputField::currency("monthlyRent", "Monthly Rent per Unit")
            .range(Decimal::ZERO, dec!(1000000))
            .required()
            .placeholder("2000"),
        InputField::number("units", "Number of Units")
            .range(Decimal::ONE, dec!(100))
            .placeholder("1")
            .default_value(Decimal::ONE),
        InputField::percentage("vacancyRate", "Vacancy Rate")
            .range(Decimal::ZERO, dec!(99))
            .placeholder("5")
            .default_value(dec!(5)),
        InputField::currency("propertyTax", "Monthly Property Tax")
            .range(Decimal::ZERO, dec!(100000))
            .placeholder("400"),
        InputField::currency("insurance", "Monthly Insurance")
            .range(Decimal::ZERO, dec!(100000))
            .placeholder("150"),
        InputField::currency("repairs", "Monthly Repairs & Maintenance")
            .range(Decimal::ZERO, dec!(100000))
            .placeholder("200"),
        InputField::currency("utilities", "Monthly Utilities")
            .range(Decimal::ZERO, dec!(100000))
            .placeholder("0"),
        InputField::currency("hoaFees", "Monthly HOA Dues")
            .range(Decimal::ZERO, dec!(100000))
            .placeholder("0"),
    ]
}

pub(crate) fn calculate(form: &Form) -> MortgageResult<Vec<ResultRow>> {
    let out = analyze(form)?;

    let dscr_row = if out.monthly_principal_interest.is_zero() {
        ResultRow::number("DSCR", out.dscr_ratio).with_note("no debt service")
    } else {
        ResultRow::number("DSCR", out.dscr_ratio)
    };
    let coc_row = if form.value("downPayment").is_zero() {
        ResultRow::percentage("Cash-on-Cash Return", out.cash_on_cash_return)
            .with_note("no cash invested")
    } else {
        ResultRow::percentage("Cash-on-Cash Return", out.cash_on_cash_return)
    };

    Ok(vec![
        ResultRow::currency("Net Operating Income (monthly)", out.net_operating_income),
        ResultRow::currency("Principal & Interest", out.monthly_principal_interest),
        dscr_row,
        ResultRow::percentage("Cap Rate", out.cap_rate),
        coc_row,
        ResultRow::currency("Monthly Cash Flow", out.monthly_cash_flow),
        ResultRow::currency("Annual Cash Flow", out.annual_cash_flow),
        ResultRow::currency("Loan Amount", out.loan_amount),
    ])
}

pub(crate) fn chart(form: &Form) -> MortgageResult<Vec<ChartSlice>> {
    let out = analyze(form)?;
    let mut slices = vec![
        ChartSlice {
            label: "Principal & Interest".into(),
            value: out.monthly_principal_interest,
            color: "#2563eb".into(),
        },
        ChartSlice {
            label: "Vacancy & Operating Costs".into(),
            value: out.gross_monthly_rent - out.net_operating_income,
            color: "#f59e0b".into(),
        },
    ];
    if out.monthly_cash_flow > Decimal::ZERO {
        slices.push(ChartSlice {
            label: "Cash Flow".into(),
            value: out.monthly_cash_flow,
            color: "#22c55e".into(),
        });
    }
    Ok(slices)
}

fn analyze(form: &Form) -> MortgageResult<DscrResult> {
    let input = DscrInput {
        property_price: form.value("propertyPrice"),
        down_payment: form.value("downPayment"),
        annual_rate: form.rate("interestRate"),
        term_months: form.months_from_years("loanTerm"),
        monthly_rent: form.value("monthlyRent"),
        units: form.whole("units")?,
        vacancy_rate: form.rate("vacancyRate"),
        monthly_tax: form.value("propertyTax"),
        monthly_insurance: form.value("insurance"),
        monthly_repairs: form.value("repairs"),
        monthly_utilities: form.value("utilities"),
        monthly_hoa: form.value("hoaFees"),
    };

    Ok(dscr::analyze_dscr(&input)?.result)
}
