use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{interest_rate_field, loan_term_field, CalculatorKind, Form, InputField, ResultRow};
use crate::program_fees::{LoanProgram, ProgramFeeSpec};
use crate::purchase::{self, PurchaseInput, PurchaseOutput};
use crate::types::ChartSlice;
use crate::units::RelativeAmount;
use crate::MortgageResult;

pub fn fields() -> Vec<InputField> {
    let mut fields = common_fields();
    fields.splice(
        3..3,
        [
            InputField::number("loanType", "Loan Program")
                .range(Decimal::ZERO, dec!(4))
                .placeholder("0 = Conventional, 1 = FHA, 2 = VA, 3 = USDA, 4 = Jumbo")
                .default_value(Decimal::ZERO),
            InputField::number("vaTier", "VA Funding Fee Tier")
                .range(Decimal::ZERO, dec!(2))
                .placeholder("0 = First use, 1 = Subsequent, 2 = Exempt")
                .default_value(Decimal::ZERO),
            InputField::currency("pmiOverride", "Monthly Mortgage Insurance (jumbo)")
                .range(Decimal::ZERO, dec!(10000))
                .placeholder("0"),
            InputField::number("includeUpfrontPremium", "Include Upfront MIP / Guarantee Fee")
                .range(Decimal::ZERO, Decimal::ONE)
                .default_value(Decimal::ZERO),
            InputField::number("financeUpfrontFee", "Finance Upfront Fee")
                .range(Decimal::ZERO, Decimal::ONE)
                .default_value(Decimal::ZERO),
        ],
    );
    fields
}

pub fn va_fields() -> Vec<InputField> {
    let mut fields = common_fields();
    fields.splice(
        3..3,
        [
            InputField::number("vaTier", "VA Funding Fee Tier")
                .range(Decimal::ZERO, dec!(2))
                .required()
                .placeholder("0 = First use, 1 = Subsequent, 2 = Exempt")
                .default_value(Decimal::ZERO),
            InputField::number("financeUpfrontFee", "Finance Funding Fee")
                .range(Decimal::ZERO, Decimal::ONE)
                .default_value(Decimal::ONE),
        ],
    );
    fields
}

fn common_fields() -> Vec<InputField> {
    vec![
        InputField::currency("homePrice", "Home Price")
            .range(dec!(10000), dec!(100000000))
            .step(dec!(1000))
            .required()
            .placeholder("300000"),
        InputField::currency("downPayment", "Down Payment")
            .step(dec!(1000))
            .placeholder("60000"),
        InputField::percentage("downPaymentPercent", "Down Payment (%)").placeholder("20"),
        interest_rate_field("interestRate", "Interest Rate"),
        loan_term_field(),
        InputField::currency("propertyTax", "Annual Property Tax")
            .range(Decimal::ZERO, dec!(1000000))
            .placeholder("3600"),
        InputField::currency("homeInsurance", "Annual Homeowners Insurance")
            .range(Decimal::ZERO, dec!(1000000))
            .placeholder("1500"),
        InputField::percentage("homeInsurancePercent", "Homeowners Insurance (% of price)")
            .range(Decimal::ZERO, dec!(10))
            .placeholder("0.5"),
        InputField::currency("hoaFees", "Monthly HOA Dues")
            .range(Decimal::ZERO, dec!(100000))
            .placeholder("0"),
        InputField::currency("extraPayment", "Extra Monthly Principal")
            .range(Decimal::ZERO, dec!(1000000))
            .placeholder("0"),
    ]
}

pub(crate) fn calculate(kind: CalculatorKind, form: &Form) -> MortgageResult<Vec<ResultRow>> {
    let out = analyze(kind, form)?;
    let payment = &out.payment;

    let mut rows = vec![
        ResultRow::currency("Loan Amount", out.loan_amount),
        ResultRow::currency("Down Payment", out.down_payment),
        ResultRow::percentage("Loan-to-Value", out.loan_to_value),
    ];
    rows.extend(
        payment
            .components()
            .iter()
            .map(|(component, value)| ResultRow::currency(component.label(), *value)),
    );
    rows.push(ResultRow::currency("Total Monthly Payment", payment.total));

    let fee_label = if kind == CalculatorKind::VaPurchase {
        "VA Funding Fee"
    } else {
        "Upfront Program Fee"
    };
    rows.push(ResultRow::currency(fee_label, out.program_fee.upfront));
    rows.push(ResultRow::currency("Cash to Close", out.cash_to_close));
    rows.push(ResultRow::currency(
        "Total Interest",
        out.amortization.total_interest,
    ));

    if let Some(acc) = &out.accelerated {
        rows.push(ResultRow::currency(
            "Total Interest with Extra Payments",
            acc.total_interest,
        ));
        rows.push(ResultRow::currency("Interest Saved", out.interest_saved));
        rows.push(ResultRow::number(
            "Payoff Time (months)",
            Decimal::from(acc.actual_term_months),
        ));
        rows.push(ResultRow::number(
            "Months Saved",
            Decimal::from(out.months_saved),
        ));
    } else {
        rows.push(ResultRow::number(
            "Payoff Time (months)",
            Decimal::from(out.amortization.actual_term_months),
        ));
    }

    Ok(rows)
}

pub(crate) fn chart(kind: CalculatorKind, form: &Form) -> MortgageResult<Vec<ChartSlice>> {
    Ok(analyze(kind, form)?.payment.chart_data())
}

fn analyze(kind: CalculatorKind, form: &Form) -> MortgageResult<PurchaseOutput> {
    let home_price = form.value("homePrice");

    let down_payment = if form.has("downPaymentPercent") {
        RelativeAmount::percent(form.value("downPaymentPercent"))
    } else {
        RelativeAmount::dollars(form.value("downPayment"))
    };
    let annual_insurance = if form.has("homeInsurancePercent") {
        RelativeAmount::percent(form.value("homeInsurancePercent"))
    } else {
        RelativeAmount::dollars(form.value("homeInsurance"))
    };

    let program = if kind == CalculatorKind::VaPurchase {
        ProgramFeeSpec::va(form.va_tier("vaTier")?)
    } else {
        let program = form.loan_program("loanType")?;
        ProgramFeeSpec {
            program,
            va_tier: match program {
                LoanProgram::Va => Some(form.va_tier("vaTier")?),
                _ => None,
            },
            down_payment_percent: None,
            manual_monthly_premium: form
                .has("pmiOverride")
                .then(|| form.value("pmiOverride")),
            include_upfront_premium: form.flag("includeUpfrontPremium"),
        }
    };

    let input = PurchaseInput {
        home_price,
        down_payment,
        annual_rate: form.rate("interestRate"),
        term_months: form.months_from_years("loanTerm"),
        program,
        finance_upfront_fee: form.flag("financeUpfrontFee"),
        annual_property_tax: RelativeAmount::dollars(form.value("propertyTax")),
        annual_insurance,
        monthly_hoa: form.value("hoaFees"),
        extra_payment: form.value("extraPayment"),
    };

    Ok(purchase::analyze_purchase(&input)?.result)
}
