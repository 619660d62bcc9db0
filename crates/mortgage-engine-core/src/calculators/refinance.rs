use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{interest_rate_field, CalculatorKind, Form, InputField, ResultRow};
use crate::payment::RecurringCosts;
use crate::program_fees::ProgramFeeSpec;
use crate::refinance::{self, BreakEven, RefinanceComparison, RefinanceInput};
use crate::types::ChartSlice;
use crate::MortgageResult;

pub fn fields() -> Vec<InputField> {
    common_fields()
}

pub fn va_fields() -> Vec<InputField> {
    let mut fields = common_fields();
    fields.extend([
        InputField::number("vaTier", "VA Funding Fee Tier")
            .range(Decimal::ZERO, dec!(2))
            .required()
            .placeholder("0 = First use, 1 = Subsequent, 2 = Exempt")
            .default_value(dec!(1)),
        InputField::number("financeFundingFee", "Finance Funding Fee")
            .range(Decimal::ZERO, Decimal::ONE)
            .default_value(Decimal::ONE),
    ]);
    fields
}

fn common_fields() -> Vec<InputField> {
    vec![
        InputField::currency("currentBalance", "Current Loan Balance")
            .range(dec!(1000), dec!(100000000))
            .step(dec!(1000))
            .required()
            .placeholder("250000"),
        interest_rate_field("currentRate", "Current Interest Rate"),
        InputField::number("remainingMonths", "Months Remaining")
            .range(Decimal::ONE, dec!(480))
            .required()
            .placeholder("300"),
        interest_rate_field("newRate", "New Interest Rate"),
        InputField::number("newTerm", "New Loan Term (years)")
            .range(Decimal::ONE, dec!(40))
            .required()
            .placeholder("30")
            .default_value(dec!(30)),
        InputField::currency("closingCosts", "Closing Costs")
            .range(Decimal::ZERO, dec!(1000000))
            .placeholder("5000")
            .default_value(Decimal::ZERO),
        InputField::number("financeClosingCosts", "Roll Closing Costs into Loan")
            .range(Decimal::ZERO, Decimal::ONE)
            .default_value(Decimal::ZERO),
        InputField::currency("cashOut", "Cash Out")
            .range(Decimal::ZERO, dec!(10000000))
            .placeholder("0"),
        InputField::currency("currentMortgageInsurance", "Current Monthly Mortgage Insurance")
            .range(Decimal::ZERO, dec!(10000))
            .placeholder("0"),
    ]
}

pub(crate) fn calculate(kind: CalculatorKind, form: &Form) -> MortgageResult<Vec<ResultRow>> {
    let out = analyze(kind, form)?;

    let break_even = match out.break_even {
        BreakEven::Months(months) => ResultRow::number("Break-Even Point (months)", months),
        BreakEven::Never => ResultRow::number("Break-Even Point (months)", Decimal::ZERO)
            .with_note("never recoups closing costs"),
    };

    let mut rows = vec![
        ResultRow::currency("Current Monthly Payment", out.current_payment),
        ResultRow::currency("New Monthly Payment", out.new_payment),
        ResultRow::currency("Monthly Savings", out.monthly_savings),
        break_even,
        ResultRow::currency("Lifetime Interest Change", out.lifetime_interest_delta),
        ResultRow::currency("Net Lifetime Savings", out.net_lifetime_savings),
        ResultRow::currency("New Loan Amount", out.new_loan_amount),
        ResultRow::currency("Total Closing Costs", out.total_closing_costs),
    ];
    if kind == CalculatorKind::VaRefinance {
        rows.push(ResultRow::currency(
            "VA Funding Fee",
            out.new_program_fee.upfront,
        ));
    }
    Ok(rows)
}

pub(crate) fn chart(kind: CalculatorKind, form: &Form) -> MortgageResult<Vec<ChartSlice>> {
    let out = analyze(kind, form)?;
    Ok(vec![
        ChartSlice {
            label: "Current Payment".into(),
            value: out.current_payment,
            color: "#ef4444".into(),
        },
        ChartSlice {
            label: "New Payment".into(),
            value: out.new_payment,
            color: "#22c55e".into(),
        },
    ])
}

fn analyze(kind: CalculatorKind, form: &Form) -> MortgageResult<RefinanceComparison> {
    let (new_program, finance_program_fee) = if kind == CalculatorKind::VaRefinance {
        (
            Some(ProgramFeeSpec::va(form.va_tier("vaTier")?)),
            form.flag("financeFundingFee"),
        )
    } else {
        (None, false)
    };

    let input = RefinanceInput {
        current_balance: form.value("currentBalance"),
        current_rate: form.rate("currentRate"),
        current_remaining_months: form.whole("remainingMonths")?,
        current_monthly_fee: form.value("currentMortgageInsurance"),
        new_rate: form.rate("newRate"),
        new_term_months: form.months_from_years("newTerm"),
        closing_costs: form.value("closingCosts"),
        finance_closing_costs: form.flag("financeClosingCosts"),
        cash_out: form.value("cashOut"),
        new_program,
        finance_program_fee,
        recurring_costs: RecurringCosts::default(),
    };

    Ok(refinance::analyze_refinance(&input)?.result)
}
