use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a [`CostTemplate`](super::CostTemplate) or
/// [`CostScenario`](super::CostScenario) is rejected by the input layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputValidationError {
    /// A cost, price or capacity field is below zero.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    /// A percentage field lies outside 0..=100.
    #[error("{field} must be between 0 and 100, got {value}")]
    OutOfRange { field: &'static str, value: Decimal },

    /// A scenario multiplier is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveMultiplier { field: &'static str, value: Decimal },

    /// Direct, wholesale and retail shares do not add up to 100.
    #[error("channel mix must sum to 100, got {0}")]
    ChannelMix(Decimal),
}

pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), InputValidationError> {
    if value < Decimal::ZERO {
        return Err(InputValidationError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn ensure_percent_range(
    field: &'static str,
    value: Decimal,
) -> Result<(), InputValidationError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(InputValidationError::OutOfRange { field, value });
    }
    Ok(())
}

pub(crate) fn ensure_positive(
    field: &'static str,
    value: Decimal,
) -> Result<(), InputValidationError> {
    if value <= Decimal::ZERO {
        return Err(InputValidationError::NonPositiveMultiplier { field, value });
    }
    Ok(())
}
