use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{interest_rate_field, loan_term_field, Form, InputField, ResultRow};
use crate::payment::RecurringCosts;
use crate::rent_vs_buy::{self, Recommendation, RentVsBuyInput, RentVsBuyResult};
use crate::types::ChartSlice;
use crate::units::RelativeAmount;
use crate::MortgageResult;

pub fn fields() -> Vec<InputField> {
    vec![
        InputField::currency("homePrice", "Home Price")
            .range(dec!(10000), dec!(100000000))
            .step(dec!(1000))
            .required()
            .placeholder("400000"),
        InputField::percentage("downPaymentPercent", "Down Payment (%)")
            .placeholder("20")
            .default_value(dec!(20)),
        interest_rate_field("interestRate", "Interest Rate"),
        loan_term_field(),
        InputField::number("years", "Years in Home")
            .range(Decimal::ONE, dec!(30))
            .required()
            .placeholder("7")
            .default_value(dec!(7)),
        InputField::currency("monthlyRent", "Monthly Rent")
            .range(Decimal::ZERO, dec!(1000000))
            .required()
            .placeholder("2200"),
        InputField::percentage("rentIncrease", "Annual Rent Increase")
            .range(dec!(-20), dec!(20))
            .placeholder("3")
            .default_value(dec!(3)),
        InputField::percentage("appreciationRate", "Annual Home Appreciation")
            .range(dec!(-20), dec!(20))
            .placeholder("3")
            .default_value(dec!(3)),
        InputField::percentage("closingCostsBuy", "Buying Closing Costs (%)")
            .range(Decimal::ZERO, dec!(10))
            .placeholder("3")
            .default_value(dec!(3)),
        InputField::percentage("closingCostsSell", "Selling Costs (%)")
            .range(Decimal::ZERO, dec!(15))
            .placeholder("6")
            .default_value(dec!(6)),
        InputField::currency("propertyTax", "Annual Property Tax")
            .range(Decimal::ZERO, dec!(1000000))
            .placeholder("4800"),
        InputField::currency("homeInsurance", "Annual Homeowners Insurance")
            .range(Decimal::ZERO, dec!(1000000))
            .placeholder("1800"),
        InputField::currency("hoaFees", "Monthly HOA Dues")
            .range(Decimal::ZERO, dec!(100000))
            .placeholder("0"),
    ]
}

pub(crate) fn calculate(form: &Form) -> MortgageResult<Vec<ResultRow>> {
    let out = analyze(form)?;

    let recommendation = match out.recommendation {
        Recommendation::Buy => ResultRow::number("Recommendation", Decimal::ONE).with_note("buy"),
        Recommendation::Rent => {
            ResultRow::number("Recommendation", Decimal::ZERO).with_note("rent")
        }
    };

    Ok(vec![
        ResultRow::currency("Total Cost of Renting", out.total_rent_cost),
        ResultRow::currency("Total Cost of Buying", out.total_buy_cost),
        ResultRow::currency("Net Difference", out.net_difference),
        recommendation,
        ResultRow::currency("Home Value at Sale", out.home_value_after),
        ResultRow::currency("Equity Built", out.equity_built),
        ResultRow::currency("Monthly Cost of Owning", out.monthly_payment),
        ResultRow::currency("Loan Amount", out.loan_amount),
    ])
}

pub(crate) fn chart(form: &Form) -> MortgageResult<Vec<ChartSlice>> {
    let out = analyze(form)?;
    Ok(vec![
        ChartSlice {
            label: "Renting".into(),
            value: out.total_rent_cost,
            color: "#f97316".into(),
        },
        ChartSlice {
            label: "Buying".into(),
            value: out.total_buy_cost,
            color: "#2563eb".into(),
        },
    ])
}

fn analyze(form: &Form) -> MortgageResult<RentVsBuyResult> {
    let input = RentVsBuyInput {
        home_price: form.value("homePrice"),
        down_payment: RelativeAmount::percent(form.value("downPaymentPercent")),
        annual_rate: form.rate("interestRate"),
        term_months: form.months_from_years("loanTerm"),
        years: form.whole("years")?,
        monthly_rent: form.value("monthlyRent"),
        rent_increase: form.rate("rentIncrease"),
        appreciation_rate: form.rate("appreciationRate"),
        closing_costs_buy: RelativeAmount::percent(form.value("closingCostsBuy")),
        closing_costs_sell: RelativeAmount::percent(form.value("closingCostsSell")),
        recurring_costs: RecurringCosts {
            monthly_tax: form.value("propertyTax") / dec!(12),
            monthly_insurance: form.value("homeInsurance") / dec!(12),
            monthly_hoa: form.value("hoaFees"),
        },
        program: None,
    };

    Ok(rent_vs_buy::compare_rent_vs_buy(&input)?.result)
}
