use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use mortgage_engine_core::calculators::{self, CalculatorKind, Inputs};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Scenario analyses
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_purchase(input_json: String) -> NapiResult<String> {
    let input: mortgage_engine_core::purchase::PurchaseInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_engine_core::purchase::analyze_purchase(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_refinance(input_json: String) -> NapiResult<String> {
    let input: mortgage_engine_core::refinance::RefinanceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_engine_core::refinance::analyze_refinance(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_rent_vs_buy(input_json: String) -> NapiResult<String> {
    let input: mortgage_engine_core::rent_vs_buy::RentVsBuyInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_engine_core::rent_vs_buy::compare_rent_vs_buy(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_dscr(input_json: String) -> NapiResult<String> {
    let input: mortgage_engine_core::dscr::DscrInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_engine_core::dscr::analyze_dscr(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn estimate_affordability(input_json: String) -> NapiResult<String> {
    let input: mortgage_engine_core::affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_engine_core::affordability::estimate_affordability(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Scheduled P&I as a decimal string. The rate is annual, as a decimal.
#[napi]
pub fn monthly_payment(
    principal: String,
    annual_rate: String,
    term_months: u32,
) -> NapiResult<String> {
    let principal = Decimal::from_str(&principal).map_err(to_napi_error)?;
    let annual_rate = Decimal::from_str(&annual_rate).map_err(to_napi_error)?;
    Ok(
        mortgage_engine_core::amortization::monthly_payment(principal, annual_rate, term_months)
            .to_string(),
    )
}

#[napi]
pub fn amortization_schedule(terms_json: String) -> NapiResult<String> {
    let terms: mortgage_engine_core::amortization::LoanTerms =
        serde_json::from_str(&terms_json).map_err(to_napi_error)?;
    let schedule = mortgage_engine_core::amortization::amortization_schedule(&terms);
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Flat calculator contract
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CalculatorRequest {
    calculator: CalculatorKind,
    inputs: Inputs,
}

/// Field configuration for one calculator id.
#[napi]
pub fn calculator_fields(calculator: String) -> NapiResult<String> {
    let kind: CalculatorKind = calculator.parse().map_err(to_napi_error)?;
    serde_json::to_string(&kind.fields()).map_err(to_napi_error)
}

/// `{"calculator": "purchase", "inputs": {...}}` to ordered result rows.
#[napi]
pub fn calculate(request_json: String) -> NapiResult<String> {
    let request: CalculatorRequest =
        serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let rows =
        calculators::calculate(request.calculator, &request.inputs).map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}

/// Same request shape as [`calculate`], returning chart slices.
#[napi]
pub fn chart_data(request_json: String) -> NapiResult<String> {
    let request: CalculatorRequest =
        serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let slices =
        calculators::chart_data(request.calculator, &request.inputs).map_err(to_napi_error)?;
    serde_json::to_string(&slices).map_err(to_napi_error)
}
