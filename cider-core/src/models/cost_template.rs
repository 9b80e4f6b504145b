use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{
    InputValidationError, ensure_non_negative, ensure_percent_range,
};

/// Per-unit cost and pricing assumptions for one production setup.
///
/// Monetary fields are in currency major units. Percentages are plain
/// numbers (`15` means 15 %). Field names double as export column headers
/// and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostTemplate {
    // Ingredients
    pub juice_per_liter: Decimal,
    pub yeast_per_1000l: Decimal,
    pub sugar_per_kg: Decimal,
    pub other_per_bottle: Decimal,

    // Packaging (per bottle)
    pub bottle_75cl: Decimal,
    pub bottle_150cl: Decimal,
    pub label: Decimal,
    pub cap: Decimal,
    pub box_cost: Decimal,

    // Labor
    pub hourly_rate: Decimal,
    pub hours_per_batch: Decimal,
    pub monthly_fixed_labor: Decimal,

    // Overhead
    pub monthly_fixed_overhead: Decimal,
    pub overhead_per_liter: Decimal,
    pub overhead_percent_of_cogs: Decimal,

    // Production
    /// Recorded for reference; the projection models losses through
    /// `yield_efficiency` only.
    pub wastage_percent: Decimal,
    pub yield_efficiency: Decimal,

    // Pricing
    pub bottle_75cl_price: Decimal,
    pub bottle_150cl_price: Decimal,
    pub price_inflation_yearly: Decimal,

    // Below EBITDA
    pub depreciation_yearly: Decimal,
    pub interest_expense_yearly: Decimal,
    pub tax_rate: Decimal,
}

impl CostTemplate {
    /// Checks that the template describes a physically meaningful setup.
    ///
    /// The projection engine accepts any template; this is meant for the
    /// input layer, before a template is stored or simulated.
    ///
    /// # Errors
    ///
    /// Returns the first [`InputValidationError`] found, checking cost fields
    /// for negativity first and then the percentage ranges.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use cider_core::{CostTemplate, InputValidationError};
    ///
    /// let mut template = cider_core::models::reference_template();
    /// template.yield_efficiency = dec!(120);
    ///
    /// assert_eq!(
    ///     template.validate(),
    ///     Err(InputValidationError::OutOfRange {
    ///         field: "yield_efficiency",
    ///         value: dec!(120),
    ///     })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), InputValidationError> {
        let non_negative = [
            ("juice_per_liter", self.juice_per_liter),
            ("yeast_per_1000l", self.yeast_per_1000l),
            ("sugar_per_kg", self.sugar_per_kg),
            ("other_per_bottle", self.other_per_bottle),
            ("bottle_75cl", self.bottle_75cl),
            ("bottle_150cl", self.bottle_150cl),
            ("label", self.label),
            ("cap", self.cap),
            ("box_cost", self.box_cost),
            ("hourly_rate", self.hourly_rate),
            ("hours_per_batch", self.hours_per_batch),
            ("monthly_fixed_labor", self.monthly_fixed_labor),
            ("monthly_fixed_overhead", self.monthly_fixed_overhead),
            ("overhead_per_liter", self.overhead_per_liter),
            ("overhead_percent_of_cogs", self.overhead_percent_of_cogs),
            ("bottle_75cl_price", self.bottle_75cl_price),
            ("bottle_150cl_price", self.bottle_150cl_price),
            ("depreciation_yearly", self.depreciation_yearly),
            ("interest_expense_yearly", self.interest_expense_yearly),
        ];
        for (field, value) in non_negative {
            ensure_non_negative(field, value)?;
        }

        ensure_percent_range("wastage_percent", self.wastage_percent)?;
        ensure_percent_range("yield_efficiency", self.yield_efficiency)?;
        ensure_percent_range("tax_rate", self.tax_rate)?;
        Ok(())
    }
}

/// The reference template used by the seed data and the golden tests.
pub fn reference_template() -> CostTemplate {
    CostTemplate {
        juice_per_liter: Decimal::from(8),
        yeast_per_1000l: Decimal::from(741),
        sugar_per_kg: Decimal::new(1, 1),
        other_per_bottle: Decimal::new(1096, 2),
        bottle_75cl: Decimal::from(3),
        bottle_150cl: Decimal::from(5),
        label: Decimal::from(4),
        cap: Decimal::new(1, 1),
        box_cost: Decimal::from(2),
        hourly_rate: Decimal::from(350),
        hours_per_batch: Decimal::from(8),
        monthly_fixed_labor: Decimal::ZERO,
        monthly_fixed_overhead: Decimal::from(10_000),
        overhead_per_liter: Decimal::new(5, 1),
        overhead_percent_of_cogs: Decimal::from(15),
        wastage_percent: Decimal::from(5),
        yield_efficiency: Decimal::from(95),
        bottle_75cl_price: Decimal::from(110),
        bottle_150cl_price: Decimal::from(200),
        price_inflation_yearly: Decimal::from(3),
        depreciation_yearly: Decimal::from(50_000),
        interest_expense_yearly: Decimal::ZERO,
        tax_rate: Decimal::from(22),
    }
}
