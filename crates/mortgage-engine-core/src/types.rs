use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.07 = 7%). Never as percentages.
pub type Rate = Decimal;

/// Percentages as entered by a user (7 = 7%). Only used at unit-conversion
/// and calculator boundaries.
pub type Percent = Decimal;

/// One slice of a chart summary handed to report renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: Decimal,
    /// CSS hex colour
    pub color: String,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Fail with `InvalidInput` when a cost-like input is negative.
pub(crate) fn require_non_negative(field: &str, value: Decimal) -> crate::MortgageResult<()> {
    if value < Decimal::ZERO {
        return Err(crate::MortgageError::InvalidInput {
            field: field.into(),
            reason: "Must be zero or positive".into(),
        });
    }
    Ok(())
}
