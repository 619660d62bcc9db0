use mortgage_engine_core::calculators::{self, CalculatorKind, Inputs, ResultRow, ValueFormat};
use mortgage_engine_core::MortgageError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn inputs(pairs: &[(&str, Decimal)]) -> Inputs {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn row<'a>(rows: &'a [ResultRow], label: &str) -> &'a ResultRow {
    rows.iter()
        .find(|r| r.label == label)
        .unwrap_or_else(|| panic!("no row labelled {label:?}"))
}

fn purchase_inputs() -> Inputs {
    inputs(&[
        ("homePrice", dec!(300000)),
        ("downPayment", dec!(60000)),
        ("interestRate", dec!(7)),
        ("loanTerm", dec!(30)),
        ("propertyTax", dec!(3600)),
        ("homeInsurance", dec!(1500)),
    ])
}

fn refinance_inputs() -> Inputs {
    inputs(&[
        ("currentBalance", dec!(250000)),
        ("currentRate", dec!(7.5)),
        ("remainingMonths", dec!(300)),
        ("newRate", dec!(6)),
        ("newTerm", dec!(25)),
        ("closingCosts", dec!(5000)),
    ])
}

fn rent_vs_buy_inputs() -> Inputs {
    inputs(&[
        ("homePrice", dec!(400000)),
        ("interestRate", dec!(6.5)),
        ("monthlyRent", dec!(2200)),
        ("propertyTax", dec!(4800)),
        ("homeInsurance", dec!(1800)),
    ])
}

fn dscr_inputs() -> Inputs {
    inputs(&[
        ("propertyPrice", dec!(400000)),
        ("downPayment", dec!(100000)),
        ("interestRate", dec!(7)),
        ("monthlyRent", dec!(3200)),
        ("propertyTax", dec!(400)),
        ("insurance", dec!(150)),
        ("repairs", dec!(200)),
    ])
}

fn affordability_inputs() -> Inputs {
    inputs(&[
        ("annualIncome", dec!(120000)),
        ("monthlyDebts", dec!(500)),
        ("downPayment", dec!(60000)),
        ("interestRate", dec!(7)),
    ])
}

fn sample_inputs(kind: CalculatorKind) -> Inputs {
    match kind {
        CalculatorKind::Purchase => purchase_inputs(),
        CalculatorKind::VaPurchase => {
            let mut i = purchase_inputs();
            i.insert("downPayment".into(), Decimal::ZERO);
            i
        }
        CalculatorKind::Refinance => refinance_inputs(),
        CalculatorKind::VaRefinance => refinance_inputs(),
        CalculatorKind::RentVsBuy => rent_vs_buy_inputs(),
        CalculatorKind::Dscr => dscr_inputs(),
        CalculatorKind::Affordability => affordability_inputs(),
    }
}

// ===========================================================================
// Contract-level behaviour
// ===========================================================================

#[test]
fn test_every_calculator_runs_on_sample_inputs() {
    for kind in CalculatorKind::ALL {
        let rows = calculators::calculate(kind, &sample_inputs(kind))
            .unwrap_or_else(|e| panic!("{kind} failed: {e}"));
        assert!(!rows.is_empty(), "{kind} produced no rows");

        let chart = calculators::chart_data(kind, &sample_inputs(kind)).unwrap();
        assert!(!chart.is_empty(), "{kind} produced no chart");
    }
}

#[test]
fn test_calculators_are_deterministic() {
    for kind in CalculatorKind::ALL {
        let i = sample_inputs(kind);
        let first = calculators::calculate(kind, &i).unwrap();
        let second = calculators::calculate(kind, &i).unwrap();
        let third = calculators::calculate(kind, &i).unwrap();
        assert_eq!(first, second);
        assert_eq!(second, third);
    }
}

#[test]
fn test_missing_required_field_is_rejected() {
    let mut i = purchase_inputs();
    i.remove("homePrice");
    match calculators::calculate(CalculatorKind::Purchase, &i) {
        Err(MortgageError::MissingInput(field)) => assert_eq!(field, "homePrice"),
        other => panic!("expected MissingInput, got {other:?}"),
    }
}

#[test]
fn test_out_of_range_field_is_rejected() {
    let mut i = purchase_inputs();
    i.insert("interestRate".into(), dec!(45));
    let result = calculators::calculate(CalculatorKind::Purchase, &i);
    assert!(matches!(result, Err(MortgageError::OutOfRange { .. })));
}

#[test]
fn test_validate_accepts_sample_inputs() {
    for kind in CalculatorKind::ALL {
        assert!(calculators::validate(&kind.fields(), &sample_inputs(kind)).is_ok());
    }
}

// ===========================================================================
// Purchase
// ===========================================================================

#[test]
fn test_purchase_rows() {
    let rows = calculators::calculate(CalculatorKind::Purchase, &purchase_inputs()).unwrap();

    assert_eq!(row(&rows, "Loan Amount").value, dec!(240000));
    assert_eq!(row(&rows, "Principal & Interest").value, dec!(1596.73));
    assert_eq!(row(&rows, "Property Tax").value, dec!(300));
    assert_eq!(row(&rows, "Homeowners Insurance").value, dec!(125));
    assert_eq!(row(&rows, "Loan-to-Value").format, ValueFormat::Percentage);
    assert_eq!(row(&rows, "Payoff Time (months)").value, dec!(360));
}

#[test]
fn test_purchase_extra_payment_rows() {
    let mut i = purchase_inputs();
    i.insert("extraPayment".into(), dec!(200));
    let rows = calculators::calculate(CalculatorKind::Purchase, &i).unwrap();

    assert!(row(&rows, "Interest Saved").value > Decimal::ZERO);
    assert!(row(&rows, "Payoff Time (months)").value < dec!(360));
    assert!(row(&rows, "Months Saved").value > Decimal::ZERO);
}

#[test]
fn test_purchase_percent_down_payment_matches_dollars() {
    let mut by_percent = purchase_inputs();
    by_percent.remove("downPayment");
    by_percent.insert("downPaymentPercent".into(), dec!(20));

    let a = calculators::calculate(CalculatorKind::Purchase, &purchase_inputs()).unwrap();
    let b = calculators::calculate(CalculatorKind::Purchase, &by_percent).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_va_purchase_funding_fee() {
    let mut i = purchase_inputs();
    i.insert("homePrice".into(), dec!(200000));
    i.insert("downPayment".into(), Decimal::ZERO);
    i.insert("vaTier".into(), Decimal::ZERO);
    i.insert("financeUpfrontFee".into(), Decimal::ZERO);

    let rows = calculators::calculate(CalculatorKind::VaPurchase, &i).unwrap();
    assert_eq!(row(&rows, "VA Funding Fee").value, dec!(4300.00));
    assert_eq!(row(&rows, "Loan Amount").value, dec!(200000));
}

#[test]
fn test_va_purchase_financed_fee_grows_loan() {
    let mut i = purchase_inputs();
    i.insert("homePrice".into(), dec!(200000));
    i.insert("downPayment".into(), Decimal::ZERO);

    let rows = calculators::calculate(CalculatorKind::VaPurchase, &i).unwrap();
    assert_eq!(row(&rows, "Loan Amount").value, dec!(204300));
}

#[test]
fn test_purchase_chart_matches_components() {
    let chart = calculators::chart_data(CalculatorKind::Purchase, &purchase_inputs()).unwrap();
    let total: Decimal = chart.iter().map(|s| s.value).sum();
    let rows = calculators::calculate(CalculatorKind::Purchase, &purchase_inputs()).unwrap();
    assert!((total - row(&rows, "Total Monthly Payment").value).abs() < dec!(0.01));
}

// ===========================================================================
// Refinance
// ===========================================================================

#[test]
fn test_refinance_lower_rate_saves_money() {
    let rows = calculators::calculate(CalculatorKind::Refinance, &refinance_inputs()).unwrap();

    let savings = row(&rows, "Monthly Savings");
    assert!(savings.value > Decimal::ZERO);
    let break_even = row(&rows, "Break-Even Point (months)");
    assert!(break_even.value > Decimal::ZERO);
    assert!(break_even.note.is_none());
}

#[test]
fn test_refinance_rate_increase_never_breaks_even() {
    let mut i = refinance_inputs();
    i.insert("newRate".into(), dec!(9));
    let rows = calculators::calculate(CalculatorKind::Refinance, &i).unwrap();

    assert!(row(&rows, "Monthly Savings").value < Decimal::ZERO);
    let break_even = row(&rows, "Break-Even Point (months)");
    assert_eq!(break_even.value, Decimal::ZERO);
    assert!(break_even.note.is_some());
}

#[test]
fn test_va_refinance_reports_funding_fee() {
    let rows = calculators::calculate(CalculatorKind::VaRefinance, &refinance_inputs()).unwrap();
    // Default tier is subsequent use: 3.3% of the new base loan
    assert_eq!(row(&rows, "VA Funding Fee").value, dec!(8250));
}

// ===========================================================================
// Rent vs. buy
// ===========================================================================

#[test]
fn test_rent_vs_buy_recommendation_follows_costs() {
    let rows = calculators::calculate(CalculatorKind::RentVsBuy, &rent_vs_buy_inputs()).unwrap();

    let rent = row(&rows, "Total Cost of Renting").value;
    let buy = row(&rows, "Total Cost of Buying").value;
    let recommendation = row(&rows, "Recommendation");
    if buy < rent {
        assert_eq!(recommendation.value, Decimal::ONE);
    } else {
        assert_eq!(recommendation.value, Decimal::ZERO);
    }
}

#[test]
fn test_rent_vs_buy_cheap_rent_favours_renting() {
    let mut i = rent_vs_buy_inputs();
    i.insert("monthlyRent".into(), dec!(500));
    i.insert("appreciationRate".into(), Decimal::ZERO);
    let rows = calculators::calculate(CalculatorKind::RentVsBuy, &i).unwrap();
    assert_eq!(row(&rows, "Recommendation").value, Decimal::ZERO);
}

// ===========================================================================
// DSCR
// ===========================================================================

#[test]
fn test_dscr_rows() {
    let rows = calculators::calculate(CalculatorKind::Dscr, &dscr_inputs()).unwrap();

    // 3200 rent, 5% vacancy, 750 expenses => NOI 2290
    assert_eq!(row(&rows, "Net Operating Income (monthly)").value, dec!(2290));
    let dscr = row(&rows, "DSCR").value;
    let pi = row(&rows, "Principal & Interest").value;
    assert!((dscr - (dec!(2290) / pi).round_dp(2)).abs() <= dec!(0.01));
}

#[test]
fn test_dscr_zero_down_payment_sentinel() {
    let mut i = dscr_inputs();
    i.insert("downPayment".into(), Decimal::ZERO);
    let rows = calculators::calculate(CalculatorKind::Dscr, &i).unwrap();

    let coc = row(&rows, "Cash-on-Cash Return");
    assert_eq!(coc.value, Decimal::ZERO);
    assert!(coc.note.is_some());
}

// ===========================================================================
// Affordability
// ===========================================================================

#[test]
fn test_affordability_respects_ratios() {
    let rows =
        calculators::calculate(CalculatorKind::Affordability, &affordability_inputs()).unwrap();

    assert!(row(&rows, "Maximum Home Price").value > dec!(60000));
    assert!(row(&rows, "Front-End DTI").value <= dec!(28.01));
    assert!(row(&rows, "Back-End DTI").value <= dec!(36.01));
}

#[test]
fn test_affordability_more_income_buys_more_house() {
    let mut richer = affordability_inputs();
    richer.insert("annualIncome".into(), dec!(180000));

    let base = calculators::calculate(CalculatorKind::Affordability, &affordability_inputs())
        .unwrap();
    let more = calculators::calculate(CalculatorKind::Affordability, &richer).unwrap();
    assert!(
        row(&more, "Maximum Home Price").value > row(&base, "Maximum Home Price").value
    );
}
