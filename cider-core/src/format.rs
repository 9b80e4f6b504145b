//! Display formatting for money and percentages.
//!
//! Values are rounded half away from zero, never truncated. The default
//! [`NumberFormat`] follows Norwegian conventions: a space between thousand
//! groups, a decimal comma and a trailing `kr`.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cider_core::format::{format_currency, format_percent};
//!
//! assert_eq!(format_currency(dec!(124623.2), 0), "124 623 kr");
//! assert_eq!(format_percent(dec!(73.1103), 1), "73,1 %");
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::round_dp_half_up;

/// Decimals used by [`format_currency`] when callers have no preference.
pub const DEFAULT_CURRENCY_DECIMALS: u32 = 0;
/// Decimals used by [`format_percent`] when callers have no preference.
pub const DEFAULT_PERCENT_DECIMALS: u32 = 1;

/// Separators and currency placement for rendering numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub currency_symbol: String,
    /// `true` renders `1 000 kr`, `false` renders `kr 1 000`.
    pub symbol_after: bool,
    pub group_separator: char,
    pub decimal_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            currency_symbol: "kr".to_string(),
            symbol_after: true,
            group_separator: ' ',
            decimal_separator: ',',
        }
    }
}

impl NumberFormat {
    /// Plain `1,234.56` style with a leading `$`.
    pub fn en_us() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            symbol_after: false,
            group_separator: ',',
            decimal_separator: '.',
        }
    }

    pub fn currency(
        &self,
        value: Decimal,
        decimals: u32,
    ) -> String {
        let number = self.number(value, decimals);
        if self.symbol_after {
            format!("{number} {}", self.currency_symbol)
        } else if let Some(unsigned) = number.strip_prefix('-') {
            format!("-{}{unsigned}", self.currency_symbol)
        } else {
            format!("{}{number}", self.currency_symbol)
        }
    }

    pub fn percent(
        &self,
        value: Decimal,
        decimals: u32,
    ) -> String {
        let number = self.number(value, decimals);
        if self.decimal_separator == ',' {
            format!("{number} %")
        } else {
            format!("{number}%")
        }
    }

    /// Rounds and groups `value` with exactly `decimals` fraction digits.
    pub fn number(
        &self,
        value: Decimal,
        decimals: u32,
    ) -> String {
        let rounded = round_dp_half_up(value, decimals);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = format!("{:.*}", decimals as usize, rounded.abs());

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut out = String::with_capacity(digits.len() + whole.len() / 3 + 1);
        if negative {
            out.push('-');
        }
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(c);
        }
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

/// Formats `value` as currency with the default [`NumberFormat`].
pub fn format_currency(
    value: Decimal,
    decimals: u32,
) -> String {
    NumberFormat::default().currency(value, decimals)
}

/// Formats `value` (already in percent, `37.5` for 37.5 %) with the default
/// [`NumberFormat`].
pub fn format_percent(
    value: Decimal,
    decimals: u32,
) -> String {
    NumberFormat::default().percent(value, decimals)
}
