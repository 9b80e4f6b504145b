//! Common decimal helpers for the projection calculations.
//!
//! Every ratio in the engine goes through [`div_or_zero`], so a zero (or
//! negative) denominator resolves to `0` instead of panicking. Products and
//! sums saturate at [`Decimal::MAX`] / [`Decimal::MIN`].

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cider_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    round_dp_half_up(value, 2)
}

/// Rounds to `dp` decimal places, midpoints away from zero.
pub fn round_dp_half_up(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides `numerator` by `denominator`, returning zero unless the
/// denominator is strictly positive. A quotient too large for `Decimal`
/// saturates.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use rust_decimal::Decimal;
/// use cider_core::calculations::common::div_or_zero;
///
/// assert_eq!(div_or_zero(dec!(10), dec!(4)), dec!(2.5));
/// assert_eq!(div_or_zero(dec!(10), dec!(0)), dec!(0));
/// assert_eq!(div_or_zero(dec!(10), dec!(-2)), dec!(0));
/// assert_eq!(div_or_zero(Decimal::MAX, dec!(0.5)), Decimal::MAX);
/// ```
pub fn div_or_zero(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .unwrap_or(if numerator.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

/// `value × percent / 100`, saturating.
pub fn percent_of(
    value: Decimal,
    percent: Decimal,
) -> Decimal {
    value.saturating_mul(percent / Decimal::ONE_HUNDRED)
}

/// `value × (1 − percent / 100)`, saturating. Used for channel discounts.
pub fn discounted(
    value: Decimal,
    percent: Decimal,
) -> Decimal {
    value.saturating_mul(Decimal::ONE.saturating_sub(percent / Decimal::ONE_HUNDRED))
}

/// `part / whole × 100`, or zero when `whole` is not positive.
pub fn margin_percent(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    div_or_zero(part, whole).saturating_mul(Decimal::ONE_HUNDRED)
}

/// Sum that pins at the `Decimal` bounds instead of overflowing.
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Compounds a yearly percentage rate over `periods` years:
/// `(1 + rate/100)^periods`.
///
/// Saturates at [`Decimal::MAX`] rather than overflowing.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cider_core::calculations::common::compound_factor;
///
/// assert_eq!(compound_factor(dec!(50), 0), dec!(1));
/// assert_eq!(compound_factor(dec!(50), 2), dec!(2.25));
/// ```
pub fn compound_factor(
    rate_percent: Decimal,
    periods: u32,
) -> Decimal {
    growth_factor(
        Decimal::ONE.saturating_add(rate_percent / Decimal::ONE_HUNDRED),
        periods,
    )
}

/// Raises a per-year factor to `periods` by repeated multiplication.
pub fn growth_factor(
    factor: Decimal,
    periods: u32,
) -> Decimal {
    (0..periods).fold(Decimal::ONE, |acc, _| acc.saturating_mul(factor))
}
