use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{
    InputValidationError, ensure_non_negative, ensure_percent_range, ensure_positive,
};

/// Growth, multiplier, channel-mix and capacity assumptions layered on top of
/// a [`CostTemplate`](super::CostTemplate).
///
/// Multipliers use `1` as the baseline. Percentages are plain numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostScenario {
    pub volume_multiplier: Decimal,
    pub price_multiplier: Decimal,
    pub cost_multiplier: Decimal,
    pub labor_multiplier: Decimal,

    /// Yearly demand growth in percent, compounding.
    pub demand_growth_yearly: Decimal,

    // Channel mix; the three shares are expected to add up to 100.
    pub direct_sales_percent: Decimal,
    pub wholesale_percent: Decimal,
    pub retail_percent: Decimal,
    pub wholesale_discount_percent: Decimal,
    pub retail_discount_percent: Decimal,

    /// Hard cap on liters produced in any one year.
    #[serde(default)]
    pub max_production_liters_yearly: Option<Decimal>,

    /// Hard cap on bottles on hand; both sizes are scaled down together.
    #[serde(default)]
    pub max_storage_bottles: Option<i64>,

    pub holding_cost_per_bottle_monthly: Decimal,
}

impl Default for CostScenario {
    /// Baseline scenario: no multipliers, no growth, everything sold direct.
    fn default() -> Self {
        Self {
            volume_multiplier: Decimal::ONE,
            price_multiplier: Decimal::ONE,
            cost_multiplier: Decimal::ONE,
            labor_multiplier: Decimal::ONE,
            demand_growth_yearly: Decimal::ZERO,
            direct_sales_percent: Decimal::ONE_HUNDRED,
            wholesale_percent: Decimal::ZERO,
            retail_percent: Decimal::ZERO,
            wholesale_discount_percent: Decimal::ZERO,
            retail_discount_percent: Decimal::ZERO,
            max_production_liters_yearly: None,
            max_storage_bottles: None,
            holding_cost_per_bottle_monthly: Decimal::ZERO,
        }
    }
}

impl CostScenario {
    /// Sum of the direct, wholesale and retail shares.
    pub fn channel_mix_total(&self) -> Decimal {
        self.direct_sales_percent + self.wholesale_percent + self.retail_percent
    }

    /// Checks multipliers, channel shares, discounts and caps.
    ///
    /// # Errors
    ///
    /// Returns the first [`InputValidationError`] found:
    /// - a multiplier that is zero or negative
    /// - a channel share or discount outside 0..=100
    /// - channel shares that do not sum to exactly 100
    /// - a negative cap or holding cost
    pub fn validate(&self) -> Result<(), InputValidationError> {
        ensure_positive("volume_multiplier", self.volume_multiplier)?;
        ensure_positive("price_multiplier", self.price_multiplier)?;
        ensure_positive("cost_multiplier", self.cost_multiplier)?;
        ensure_positive("labor_multiplier", self.labor_multiplier)?;

        ensure_percent_range("direct_sales_percent", self.direct_sales_percent)?;
        ensure_percent_range("wholesale_percent", self.wholesale_percent)?;
        ensure_percent_range("retail_percent", self.retail_percent)?;
        ensure_percent_range("wholesale_discount_percent", self.wholesale_discount_percent)?;
        ensure_percent_range("retail_discount_percent", self.retail_discount_percent)?;

        let total = self.channel_mix_total();
        if total != Decimal::ONE_HUNDRED {
            return Err(InputValidationError::ChannelMix(total));
        }

        if let Some(cap) = self.max_production_liters_yearly {
            ensure_non_negative("max_production_liters_yearly", cap)?;
        }
        if let Some(cap) = self.max_storage_bottles {
            ensure_non_negative("max_storage_bottles", Decimal::from(cap))?;
        }
        ensure_non_negative(
            "holding_cost_per_bottle_monthly",
            self.holding_cost_per_bottle_monthly,
        )
    }
}

/// The reference scenario used by the seed data and the golden tests.
pub fn reference_scenario() -> CostScenario {
    CostScenario {
        demand_growth_yearly: Decimal::from(50),
        direct_sales_percent: Decimal::from(40),
        wholesale_percent: Decimal::from(40),
        retail_percent: Decimal::from(20),
        wholesale_discount_percent: Decimal::from(15),
        retail_discount_percent: Decimal::from(10),
        holding_cost_per_bottle_monthly: Decimal::new(5, 1),
        ..CostScenario::default()
    }
}
