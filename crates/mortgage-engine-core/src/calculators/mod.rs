//! Flat calculator contract shared by the web forms, the PDF exporter and
//! the CLI.
//!
//! Each [`CalculatorKind`] publishes its input fields (with ranges used for
//! validation) and turns a `name -> number` map into an ordered list of
//! labelled results. Percent inputs arrive as the user typed them (7 = 7%)
//! and are converted to decimal rates before reaching the engine.

pub mod affordability;
pub mod dscr;
pub mod purchase;
pub mod refinance;
pub mod rent_vs_buy;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::MortgageError;
use crate::program_fees::{LoanProgram, VaTier};
use crate::types::{ChartSlice, Rate};
use crate::MortgageResult;

/// Raw numeric form input keyed by field name.
pub type Inputs = BTreeMap<String, Decimal>;

// ---------------------------------------------------------------------------
// Field configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Currency,
    Percentage,
}

/// One form input a calculator accepts.
#[derive(Debug, Clone, Serialize)]
pub struct InputField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
    pub required: bool,
    pub placeholder: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Decimal>,
}

impl InputField {
    fn new(name: &'static str, label: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            label,
            field_type,
            min: Decimal::ZERO,
            max: dec!(100000000),
            step: Decimal::ONE,
            required: false,
            placeholder: "",
            default: None,
        }
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldType::Number)
    }

    pub fn currency(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldType::Currency)
    }

    pub fn percentage(name: &'static str, label: &'static str) -> Self {
        Self {
            max: dec!(100),
            step: dec!(0.01),
            ..Self::new(name, label, FieldType::Percentage)
        }
    }

    pub fn range(mut self, min: Decimal, max: Decimal) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn step(mut self, step: Decimal) -> Self {
        self.step = step;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn default_value(mut self, value: Decimal) -> Self {
        self.default = Some(value);
        self
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    Currency,
    Percentage,
    Number,
}

/// One labelled output value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub label: String,
    pub value: Decimal,
    pub format: ValueFormat,
    /// Qualifies a sentinel value (e.g. a break-even that never happens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ResultRow {
    pub fn currency(label: &str, value: Decimal) -> Self {
        Self::new(label, value, ValueFormat::Currency)
    }

    pub fn percentage(label: &str, value: Decimal) -> Self {
        Self::new(label, value, ValueFormat::Percentage)
    }

    pub fn number(label: &str, value: Decimal) -> Self {
        Self::new(label, value, ValueFormat::Number)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    fn new(label: &str, value: Decimal, format: ValueFormat) -> Self {
        Self {
            label: label.to_string(),
            value: value.round_dp(2),
            format,
            note: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculatorKind {
    Purchase,
    Refinance,
    RentVsBuy,
    Dscr,
    VaPurchase,
    VaRefinance,
    Affordability,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 7] = [
        CalculatorKind::Purchase,
        CalculatorKind::Refinance,
        CalculatorKind::RentVsBuy,
        CalculatorKind::Dscr,
        CalculatorKind::VaPurchase,
        CalculatorKind::VaRefinance,
        CalculatorKind::Affordability,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            CalculatorKind::Purchase => "purchase",
            CalculatorKind::Refinance => "refinance",
            CalculatorKind::RentVsBuy => "rent-vs-buy",
            CalculatorKind::Dscr => "dscr",
            CalculatorKind::VaPurchase => "va-purchase",
            CalculatorKind::VaRefinance => "va-refinance",
            CalculatorKind::Affordability => "affordability",
        }
    }

    /// Input fields in form order.
    pub fn fields(&self) -> Vec<InputField> {
        match self {
            CalculatorKind::Purchase => purchase::fields(),
            CalculatorKind::VaPurchase => purchase::va_fields(),
            CalculatorKind::Refinance => refinance::fields(),
            CalculatorKind::VaRefinance => refinance::va_fields(),
            CalculatorKind::RentVsBuy => rent_vs_buy::fields(),
            CalculatorKind::Dscr => dscr::fields(),
            CalculatorKind::Affordability => affordability::fields(),
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CalculatorKind {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalculatorKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| MortgageError::UnknownCalculator(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reject missing required fields and out-of-range values. A required
/// field with a default is satisfied by the default.
pub fn validate(fields: &[InputField], inputs: &Inputs) -> MortgageResult<()> {
    for field in fields {
        match inputs.get(field.name) {
            None if field.required && field.default.is_none() => {
                return Err(MortgageError::MissingInput(field.name.into()))
            }
            None => {}
            Some(value) => {
                if *value < field.min || *value > field.max {
                    return Err(MortgageError::OutOfRange {
                        field: field.name.into(),
                        value: *value,
                        min: field.min,
                        max: field.max,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Validate `inputs` and run the calculator.
pub fn calculate(kind: CalculatorKind, inputs: &Inputs) -> MortgageResult<Vec<ResultRow>> {
    let form = prepare(kind, inputs)?;
    tracing::debug!(calculator = %kind, fields = inputs.len(), "calculate");
    match kind {
        CalculatorKind::Purchase | CalculatorKind::VaPurchase => purchase::calculate(kind, &form),
        CalculatorKind::Refinance | CalculatorKind::VaRefinance => {
            refinance::calculate(kind, &form)
        }
        CalculatorKind::RentVsBuy => rent_vs_buy::calculate(&form),
        CalculatorKind::Dscr => dscr::calculate(&form),
        CalculatorKind::Affordability => affordability::calculate(&form),
    }
}

/// Chart summary for report renderers, from the same inputs as [`calculate`].
pub fn chart_data(kind: CalculatorKind, inputs: &Inputs) -> MortgageResult<Vec<ChartSlice>> {
    let form = prepare(kind, inputs)?;
    match kind {
        CalculatorKind::Purchase | CalculatorKind::VaPurchase => purchase::chart(kind, &form),
        CalculatorKind::Refinance | CalculatorKind::VaRefinance => refinance::chart(kind, &form),
        CalculatorKind::RentVsBuy => rent_vs_buy::chart(&form),
        CalculatorKind::Dscr => dscr::chart(&form),
        CalculatorKind::Affordability => affordability::chart(&form),
    }
}

fn prepare(kind: CalculatorKind, inputs: &Inputs) -> MortgageResult<Form> {
    let fields = kind.fields();
    validate(&fields, inputs)?;

    let mut values = inputs.clone();
    for field in &fields {
        if let Some(default) = field.default {
            values.entry(field.name.to_string()).or_insert(default);
        }
    }
    Ok(Form { values })
}

// ---------------------------------------------------------------------------
// Validated form values
// ---------------------------------------------------------------------------

/// Inputs after validation, with field defaults filled in.
pub(crate) struct Form {
    values: Inputs,
}

impl Form {
    /// Raw value; absent optional fields read as 0.
    pub(crate) fn value(&self, name: &str) -> Decimal {
        self.values.get(name).copied().unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Percentage field as a decimal rate (7 → 0.07).
    pub(crate) fn rate(&self, name: &str) -> Rate {
        self.value(name) / dec!(100)
    }

    /// Term entered in years, as whole months.
    pub(crate) fn months_from_years(&self, name: &str) -> u32 {
        (self.value(name) * dec!(12))
            .round()
            .to_u32()
            .unwrap_or_default()
    }

    pub(crate) fn whole(&self, name: &str) -> MortgageResult<u32> {
        let value = self.value(name);
        if !value.fract().is_zero() {
            return Err(MortgageError::InvalidInput {
                field: name.into(),
                reason: "Must be a whole number".into(),
            });
        }
        value.to_u32().ok_or_else(|| MortgageError::InvalidInput {
            field: name.into(),
            reason: "Must be a non-negative whole number".into(),
        })
    }

    pub(crate) fn flag(&self, name: &str) -> bool {
        !self.value(name).is_zero()
    }

    /// `loanType`: 0 conventional, 1 FHA, 2 VA, 3 USDA, 4 jumbo.
    pub(crate) fn loan_program(&self, name: &str) -> MortgageResult<LoanProgram> {
        match self.whole(name)? {
            0 => Ok(LoanProgram::Conventional),
            1 => Ok(LoanProgram::Fha),
            2 => Ok(LoanProgram::Va),
            3 => Ok(LoanProgram::Usda),
            4 => Ok(LoanProgram::Jumbo),
            _ => Err(MortgageError::InvalidInput {
                field: name.into(),
                reason: "Unknown loan program code".into(),
            }),
        }
    }

    /// `vaTier`: 0 first-time, 1 subsequent, 2 exempt.
    pub(crate) fn va_tier(&self, name: &str) -> MortgageResult<VaTier> {
        match self.whole(name)? {
            0 => Ok(VaTier::FirstTime),
            1 => Ok(VaTier::Subsequent),
            2 => Ok(VaTier::Exempt),
            _ => Err(MortgageError::InvalidInput {
                field: name.into(),
                reason: "Unknown VA funding fee tier code".into(),
            }),
        }
    }
}

/// Shared term field: years, 1-40.
pub(crate) fn loan_term_field() -> InputField {
    InputField::number("loanTerm", "Loan Term (years)")
        .range(Decimal::ONE, dec!(40))
        .required()
        .placeholder("30")
        .default_value(dec!(30))
}

/// Shared rate field: percent, 0-30.
pub(crate) fn interest_rate_field(name: &'static str, label: &'static str) -> InputField {
    InputField::percentage(name, label)
        .range(Decimal::ZERO, dec!(30))
        .step(dec!(0.125))
        .required()
        .placeholder("7.0")
}
