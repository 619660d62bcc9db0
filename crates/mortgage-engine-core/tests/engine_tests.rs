use mortgage_engine_core::amortization::{self, LoanTerms};
use mortgage_engine_core::payment::{self, PaymentComponent, RecurringCosts};
use mortgage_engine_core::program_fees::{self, LoanProgram, ProgramFeeSpec, VaTier};
use mortgage_engine_core::purchase::{self, PurchaseInput};
use mortgage_engine_core::units::{self, RelativeAmount};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Amortization
// ===========================================================================

fn reference_loan() -> LoanTerms {
    // 300,000 home, 60,000 down, 7% for 30 years
    LoanTerms::new(dec!(240000), dec!(0.07), 360)
}

#[test]
fn test_reference_payment() {
    let payment = reference_loan().monthly_payment();
    assert_eq!(payment.round_dp(2), dec!(1596.73));
}

#[test]
fn test_extra_payment_shortens_loan_and_saves_interest() {
    let base = amortization::simulate_payoff(&reference_loan());
    let accelerated =
        amortization::simulate_payoff(&reference_loan().with_extra_payment(dec!(200)));

    assert!(!base.hit_iteration_cap);
    assert!(!accelerated.hit_iteration_cap);
    assert_eq!(base.actual_term_months, 360);
    assert!(accelerated.actual_term_months < 360);
    assert!(accelerated.total_interest < base.total_interest);
    // Scheduled P&I is unaffected by the extra principal
    assert_eq!(accelerated.monthly_payment, base.monthly_payment);
}

#[test]
fn test_more_extra_never_costs_more() {
    let extras = [
        dec!(0),
        dec!(50),
        dec!(100),
        dec!(250),
        dec!(500),
        dec!(1000),
        dec!(5000),
    ];
    let results: Vec<_> = extras
        .iter()
        .map(|extra| amortization::simulate_payoff(&reference_loan().with_extra_payment(*extra)))
        .collect();

    for pair in results.windows(2) {
        assert!(
            pair[1].total_interest <= pair[0].total_interest,
            "interest rose from {} to {}",
            pair[0].total_interest,
            pair[1].total_interest
        );
        assert!(pair[1].actual_term_months <= pair[0].actual_term_months);
    }
}

#[test]
fn test_monotonic_across_rates_and_terms() {
    for (rate, term) in [(dec!(0.03), 180), (dec!(0.055), 240), (dec!(0.09), 360)] {
        let terms = LoanTerms::new(dec!(150000), rate, term);
        let plain = amortization::simulate_payoff(&terms);
        let extra = amortization::simulate_payoff(&terms.clone().with_extra_payment(dec!(150)));
        assert!(extra.total_interest <= plain.total_interest);
        assert!(extra.actual_term_months <= plain.actual_term_months);
    }
}

#[test]
fn test_schedule_agrees_with_payoff() {
    let terms = reference_loan().with_extra_payment(dec!(200));
    let summary = amortization::simulate_payoff(&terms);
    let schedule = amortization::amortization_schedule(&terms);

    assert_eq!(schedule.len() as u32, summary.actual_term_months);
    let last = schedule.last().unwrap();
    assert_eq!(last.balance, Decimal::ZERO);
    assert_eq!(last.cumulative_interest, summary.total_interest);

    let principal: Decimal = schedule.iter().map(|e| e.principal).sum();
    assert!((principal - dec!(240000)).abs() < dec!(0.01));
}

#[test]
fn test_yearly_summary_covers_schedule() {
    let schedule = amortization::amortization_schedule(&reference_loan());
    let years = amortization::yearly_summary(&schedule);

    assert_eq!(years.len(), 30);
    assert_eq!(years[0].year, 1);
    let interest: Decimal = years.iter().map(|y| y.interest).sum();
    let scheduled: Decimal = schedule.iter().map(|e| e.interest).sum();
    assert_eq!(interest, scheduled);
}

#[test]
fn test_balance_after_partial_term() {
    let terms = reference_loan();
    let after_five_years = amortization::remaining_balance_after(&terms, 60);
    let paid = amortization::principal_paid_within(&terms, 60);

    assert!(after_five_years < dec!(240000));
    assert!(after_five_years > dec!(200000));
    assert_eq!(paid + after_five_years, dec!(240000));
}

#[test]
fn test_zero_rate_is_straight_line() {
    let result = amortization::simulate_payoff(&LoanTerms::new(dec!(36000), Decimal::ZERO, 36));
    assert_eq!(result.monthly_payment, dec!(1000));
    assert_eq!(result.total_interest, Decimal::ZERO);
    assert_eq!(result.actual_term_months, 36);
}

#[test]
fn test_payoff_is_deterministic() {
    let terms = reference_loan().with_extra_payment(dec!(125));
    let first = amortization::simulate_payoff(&terms);
    let second = amortization::simulate_payoff(&terms);
    let third = amortization::simulate_payoff(&terms);
    assert_eq!(first, second);
    assert_eq!(second, third);
}

// ===========================================================================
// Program fees
// ===========================================================================

#[test]
fn test_va_first_time_fee_is_exact() {
    let fee = program_fees::compute_fee(dec!(200000), &ProgramFeeSpec::va(VaTier::FirstTime));
    assert_eq!(fee.upfront, dec!(4300.00));
    assert_eq!(fee.monthly_recurring, Decimal::ZERO);
}

#[test]
fn test_every_program_yields_a_fee() {
    let programs = [
        LoanProgram::Conventional,
        LoanProgram::Fha,
        LoanProgram::Va,
        LoanProgram::Usda,
        LoanProgram::Jumbo,
    ];
    for program in programs {
        let fee = program_fees::compute_fee(dec!(300000), &ProgramFeeSpec::new(program));
        assert!(fee.upfront >= Decimal::ZERO, "{program:?}");
        assert!(fee.monthly_recurring >= Decimal::ZERO, "{program:?}");
    }
}

// ===========================================================================
// Payment composition
// ===========================================================================

#[test]
fn test_total_is_sum_of_components_in_any_order() {
    let fee = program_fees::compute_fee(dec!(285000), &ProgramFeeSpec::new(LoanProgram::Fha));
    let costs = RecurringCosts {
        monthly_tax: dec!(287.5),
        monthly_insurance: dec!(104.17),
        monthly_hoa: dec!(45),
    };
    let breakdown = payment::compose(dec!(1896.12), &fee, &costs, dec!(75));

    let mut parts = breakdown.components().to_vec();
    let forward = payment::sum_components(&parts);
    parts.reverse();
    let backward = payment::sum_components(&parts);
    parts.rotate_left(2);
    let rotated = payment::sum_components(&parts);

    assert_eq!(forward, breakdown.total);
    assert_eq!(backward, breakdown.total);
    assert_eq!(rotated, breakdown.total);
    assert!(parts
        .iter()
        .any(|(c, v)| *c == PaymentComponent::ExtraPayment && *v == dec!(75)));
}

// ===========================================================================
// Unit conversion
// ===========================================================================

#[test]
fn test_mode_equivalence_across_bases() {
    let cases = [
        (dec!(60000), dec!(300000)),
        (dec!(1234.56), dec!(417000)),
        (dec!(0), dec!(150000)),
        (dec!(999999), dec!(1000000)),
        (dec!(1), dec!(3)),
    ];
    for (amount, base) in cases {
        let percent = units::dollar_to_percent(amount, base);
        let back = units::percent_to_dollar(percent, base);
        assert!((back - amount).abs() < dec!(0.000001), "{amount} of {base}");
    }
}

#[test]
fn test_zero_home_value_gives_zero_percent() {
    assert_eq!(units::dollar_to_percent(dec!(1500), Decimal::ZERO), Decimal::ZERO);
    let insurance = RelativeAmount::dollars(dec!(1500));
    assert_eq!(insurance.to_percent(Decimal::ZERO), Decimal::ZERO);
}

// ===========================================================================
// Purchase pipeline
// ===========================================================================

fn reference_purchase() -> PurchaseInput {
    PurchaseInput {
        home_price: dec!(300000),
        down_payment: RelativeAmount::dollars(dec!(60000)),
        annual_rate: dec!(0.07),
        term_months: 360,
        program: ProgramFeeSpec::new(LoanProgram::Conventional),
        finance_upfront_fee: false,
        annual_property_tax: RelativeAmount::dollars(dec!(3600)),
        annual_insurance: RelativeAmount::dollars(dec!(1500)),
        monthly_hoa: Decimal::ZERO,
        extra_payment: Decimal::ZERO,
    }
}

#[test]
fn test_purchase_reference_scenario() {
    let out = purchase::analyze_purchase(&reference_purchase()).unwrap();
    let r = &out.result;

    assert_eq!(r.loan_amount, dec!(240000));
    assert_eq!(r.down_payment_percent, dec!(20));
    assert_eq!(r.payment.principal_interest.round_dp(2), dec!(1596.73));
    // 20% down: no PMI
    assert_eq!(r.payment.program_fee, Decimal::ZERO);
    assert_eq!(r.payment.tax, dec!(300));
    assert_eq!(r.payment.insurance, dec!(125));
    assert!(r.accelerated.is_none());
}

#[test]
fn test_purchase_percent_and_dollar_down_payment_agree() {
    let by_dollars = purchase::analyze_purchase(&reference_purchase()).unwrap();
    let by_percent = purchase::analyze_purchase(&PurchaseInput {
        down_payment: RelativeAmount::percent(dec!(20)),
        ..reference_purchase()
    })
    .unwrap();

    assert_eq!(by_dollars.result.loan_amount, by_percent.result.loan_amount);
    assert_eq!(by_dollars.result.payment, by_percent.result.payment);
}

#[test]
fn test_purchase_with_extra_payment() {
    let out = purchase::analyze_purchase(&PurchaseInput {
        extra_payment: dec!(200),
        ..reference_purchase()
    })
    .unwrap();
    let r = &out.result;

    let acc = r.accelerated.as_ref().unwrap();
    assert!(acc.actual_term_months < 360);
    assert!(r.interest_saved > Decimal::ZERO);
    assert_eq!(r.months_saved, 360 - acc.actual_term_months);
    assert_eq!(r.payment.extra_payment, dec!(200));
    let components_total = payment::sum_components(&r.payment.components());
    assert!((r.payment.total - components_total).abs() < dec!(0.01));
}

#[test]
fn test_purchase_low_down_payment_warns_about_pmi() {
    let out = purchase::analyze_purchase(&PurchaseInput {
        down_payment: RelativeAmount::percent(dec!(5)),
        ..reference_purchase()
    })
    .unwrap();

    assert!(out.result.payment.program_fee > Decimal::ZERO);
    assert!(out.warnings.iter().any(|w| w.contains("PMI")));
}
