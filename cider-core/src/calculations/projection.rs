//! Single-year projection of production, P&L and cash flow.
//!
//! [`YearProjector`] turns a [`CostTemplate`] and a [`CostScenario`] into one
//! [`YearlyProjection`]. It is pure and total: every division is guarded and
//! every product or sum saturates at the `Decimal` bounds, so any input
//! produces a fully populated projection. Bottle and batch counts are floored
//! or ceiled `Decimal`s and are never narrowed to a machine integer.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Volume: base × (1 + growth)^year × volume multiplier, capped by production limit |
//! | 2    | Effective volume: volume × yield efficiency |
//! | 3    | Bottles: 70 % of effective volume in 0.75 L, 30 % in 1.5 L (floored) |
//! | 4    | Storage clamp: both counts scaled down by the same ratio (re-floored) |
//! | 5    | Prices: base price × (1 + inflation)^year × price multiplier |
//! | 6    | Revenue per channel, wholesale and retail discounted |
//! | 7    | Cost inflation: 2.5 % per year × cost multiplier |
//! | 8    | Ingredients: juice, yeast, sugar (0.05 kg/L), other per bottle |
//! | 9    | Packaging: bottle, label, cap and box per bottle |
//! | 10   | Labor: ceil(volume / 1000 L) batches plus fixed monthly labor |
//! | 11   | Total COGS |
//! | 12   | Overhead: fixed, per liter and percent of COGS |
//! | 13   | Holding cost on half the bottles for twelve months |
//! | 14   | Gross profit → EBITDA → EBIT → EBT → tax → net income |
//! | 15   | Cash generated (net income + depreciation) and running balance |
//! | 16   | Unit costs (COGS split 70/30 across the bottle sizes) |
//! | 17   | Breakeven on the 0.75 L line |
//!
//! Nothing is rounded here. Presentation code rounds with
//! [`round_half_up`](crate::calculations::common::round_half_up).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cider_core::calculations::YearProjector;
//! use cider_core::models::{reference_scenario, reference_template};
//!
//! let template = reference_template();
//! let scenario = reference_scenario();
//!
//! let projector = YearProjector::new(&template, &scenario);
//! let year_one = projector.project(0, dec!(1000), dec!(-50000));
//!
//! assert_eq!(year_one.effective_volume_liters, dec!(950));
//! assert_eq!(year_one.bottles_75cl, dec!(886));
//! assert_eq!(year_one.bottles_150cl, dec!(190));
//! assert_eq!(year_one.total_revenue, dec!(124623.2));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{
    compound_factor, discounted, div_or_zero, margin_percent, percent_of, saturating_sum,
};
use crate::models::{CostScenario, CostTemplate, YearlyProjection};

/// Share of effective volume bottled in 0.75 L bottles.
pub const BOTTLE_75CL_SHARE: Decimal = Decimal::from_parts(7, 0, 0, false, 1);
/// Share of effective volume bottled in 1.5 L bottles.
pub const BOTTLE_150CL_SHARE: Decimal = Decimal::from_parts(3, 0, 0, false, 1);
/// Liters per small bottle.
pub const BOTTLE_75CL_LITERS: Decimal = Decimal::from_parts(75, 0, 0, false, 2);
/// Liters per large bottle.
pub const BOTTLE_150CL_LITERS: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
/// Liters per production batch.
pub const LITERS_PER_BATCH: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
/// Kilograms of sugar added per liter of juice.
pub const SUGAR_KG_PER_LITER: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
/// Flat yearly inflation applied to all variable costs, in percent.
pub const COST_INFLATION_YEARLY_PERCENT: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Bottle counts after the storage clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BottleCounts {
    small: Decimal,
    large: Decimal,
}

impl BottleCounts {
    fn total(self) -> Decimal {
        self.small.saturating_add(self.large)
    }
}

/// Revenue split by sales channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChannelRevenue {
    direct: Decimal,
    wholesale: Decimal,
    retail: Decimal,
}

impl ChannelRevenue {
    fn total(self) -> Decimal {
        saturating_sum([self.direct, self.wholesale, self.retail])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ingredients {
    juice: Decimal,
    yeast: Decimal,
    sugar: Decimal,
    other: Decimal,
}

impl Ingredients {
    fn total(self) -> Decimal {
        saturating_sum([self.juice, self.yeast, self.sugar, self.other])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Labor {
    batches: Decimal,
    variable: Decimal,
    fixed: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Overhead {
    fixed: Decimal,
    variable: Decimal,
    cogs_share: Decimal,
}

impl Overhead {
    fn total(self) -> Decimal {
        saturating_sum([self.fixed, self.variable, self.cogs_share])
    }
}

/// Projects a single year for a fixed template and scenario.
///
/// The projector borrows its inputs; build one per run and call
/// [`project`](Self::project) once per year.
#[derive(Debug, Clone, Copy)]
pub struct YearProjector<'a> {
    template: &'a CostTemplate,
    scenario: &'a CostScenario,
}

impl<'a> YearProjector<'a> {
    pub fn new(
        template: &'a CostTemplate,
        scenario: &'a CostScenario,
    ) -> Self {
        Self { template, scenario }
    }

    /// Projects the year at zero-based `year_index`.
    ///
    /// `previous_cumulative_cash` is the running cash balance at the end of
    /// the prior year; the returned projection carries the new balance.
    pub fn project(
        &self,
        year_index: u32,
        base_volume: Decimal,
        previous_cumulative_cash: Decimal,
    ) -> YearlyProjection {
        let t = self.template;

        let volume = self.production_volume(year_index, base_volume);
        let effective_volume = self.effective_volume(volume);
        let bottles = self.constrain_to_storage(self.bottle_split(effective_volume));

        let (price_75cl, price_150cl) = self.prices(year_index);
        let revenue = self.channel_revenue(bottles, price_75cl, price_150cl);
        let total_revenue = revenue.total();

        let cost_factor = self.cost_factor(year_index);
        let ingredients = self.ingredients(volume, bottles, cost_factor);
        let cogs_ingredients = ingredients.total();
        let cogs_packaging = self.packaging(bottles, cost_factor);
        let labor = self.labor(volume);
        let cogs_labor = labor.variable.saturating_add(labor.fixed);
        let total_cogs = saturating_sum([cogs_ingredients, cogs_packaging, cogs_labor]);

        let overhead = self.overhead(volume, total_cogs);
        let total_overhead = overhead.total();
        let holding_cost = self.holding_cost(bottles);

        let gross_profit = total_revenue.saturating_sub(total_cogs);
        let ebitda = gross_profit
            .saturating_sub(total_overhead)
            .saturating_sub(holding_cost);
        let ebit = ebitda.saturating_sub(t.depreciation_yearly);
        let ebt = ebit.saturating_sub(t.interest_expense_yearly);
        let tax = self.tax(ebt);
        let net_income = ebt.saturating_sub(tax);

        let cash_generated = net_income.saturating_add(t.depreciation_yearly);
        let cumulative_cash_flow = previous_cumulative_cash.saturating_add(cash_generated);

        let cost_per_liter = div_or_zero(total_cogs, effective_volume);
        let (cost_per_bottle_75cl, cost_per_bottle_150cl) =
            self.cost_per_bottle(total_cogs, bottles);
        let breakeven_bottles =
            self.breakeven_bottles(labor.fixed, overhead.fixed, price_75cl, cost_per_bottle_75cl);

        let projection = YearlyProjection {
            year: year_index.saturating_add(1),
            volume_liters: volume,
            effective_volume_liters: effective_volume,
            bottles_75cl: bottles.small,
            bottles_150cl: bottles.large,
            batch_count: labor.batches,
            price_75cl,
            price_150cl,
            revenue_direct: revenue.direct,
            revenue_wholesale: revenue.wholesale,
            revenue_retail: revenue.retail,
            total_revenue,
            ingredients_juice: ingredients.juice,
            ingredients_yeast: ingredients.yeast,
            ingredients_sugar: ingredients.sugar,
            ingredients_other: ingredients.other,
            cogs_ingredients,
            cogs_packaging,
            labor_variable: labor.variable,
            labor_fixed: labor.fixed,
            cogs_labor,
            total_cogs,
            overhead_fixed: overhead.fixed,
            overhead_variable: overhead.variable,
            overhead_cogs_share: overhead.cogs_share,
            total_overhead,
            holding_cost,
            gross_profit,
            gross_margin_percent: margin_percent(gross_profit, total_revenue),
            ebitda,
            ebitda_margin_percent: margin_percent(ebitda, total_revenue),
            depreciation: t.depreciation_yearly,
            ebit,
            interest_expense: t.interest_expense_yearly,
            ebt,
            tax,
            net_income,
            net_margin_percent: margin_percent(net_income, total_revenue),
            cash_generated,
            cumulative_cash_flow,
            cost_per_liter,
            cost_per_bottle_75cl,
            cost_per_bottle_150cl,
            breakeven_bottles,
            breakeven_revenue: breakeven_bottles.saturating_mul(price_75cl),
        };

        debug!(
            year = projection.year,
            volume = %projection.volume_liters,
            bottles = %projection.total_bottles(),
            revenue = %projection.total_revenue,
            ebitda = %projection.ebitda,
            cumulative_cash = %projection.cumulative_cash_flow,
            "projected year"
        );

        projection
    }

    /// Step 1: demand growth and the production cap.
    fn production_volume(
        &self,
        year_index: u32,
        base_volume: Decimal,
    ) -> Decimal {
        let growth = compound_factor(self.scenario.demand_growth_yearly, year_index);
        let volume = base_volume
            .saturating_mul(growth)
            .saturating_mul(self.scenario.volume_multiplier);

        match self.scenario.max_production_liters_yearly {
            Some(cap) if volume > cap => {
                debug!(year_index, demand = %volume, cap = %cap, "production cap engaged");
                cap
            }
            _ => volume,
        }
    }

    /// Step 2
    fn effective_volume(
        &self,
        volume: Decimal,
    ) -> Decimal {
        percent_of(volume, self.template.yield_efficiency)
    }

    /// Step 3: fixed 70/30 split across the two bottle sizes.
    fn bottle_split(
        &self,
        effective_volume: Decimal,
    ) -> BottleCounts {
        let liters = |share: Decimal| effective_volume.saturating_mul(share);
        BottleCounts {
            small: div_or_zero(liters(BOTTLE_75CL_SHARE), BOTTLE_75CL_LITERS).floor(),
            large: div_or_zero(liters(BOTTLE_150CL_SHARE), BOTTLE_150CL_LITERS).floor(),
        }
    }

    /// Step 4: proportional scale-down when bottles exceed storage.
    fn constrain_to_storage(
        &self,
        bottles: BottleCounts,
    ) -> BottleCounts {
        let Some(max_bottles) = self.scenario.max_storage_bottles else {
            return bottles;
        };
        let max_bottles = Decimal::from(max_bottles);
        let total = bottles.total();
        if total <= max_bottles {
            return bottles;
        }

        let ratio = div_or_zero(max_bottles, total);
        let scaled = BottleCounts {
            small: bottles.small.saturating_mul(ratio).floor(),
            large: bottles.large.saturating_mul(ratio).floor(),
        };
        debug!(
            produced = %total,
            max_bottles = %max_bottles,
            stored = %scaled.total(),
            "storage cap engaged"
        );
        scaled
    }

    /// Step 5: returns `(price_75cl, price_150cl)`.
    fn prices(
        &self,
        year_index: u32,
    ) -> (Decimal, Decimal) {
        let inflation = compound_factor(self.template.price_inflation_yearly, year_index);
        let factor = inflation.saturating_mul(self.scenario.price_multiplier);
        (
            self.template.bottle_75cl_price.saturating_mul(factor),
            self.template.bottle_150cl_price.saturating_mul(factor),
        )
    }

    /// Step 6
    fn channel_revenue(
        &self,
        bottles: BottleCounts,
        price_75cl: Decimal,
        price_150cl: Decimal,
    ) -> ChannelRevenue {
        let gross_75cl = bottles.small.saturating_mul(price_75cl);
        let gross_150cl = bottles.large.saturating_mul(price_150cl);

        let split = |gross: Decimal| {
            let s = self.scenario;
            ChannelRevenue {
                direct: percent_of(gross, s.direct_sales_percent),
                wholesale: discounted(
                    percent_of(gross, s.wholesale_percent),
                    s.wholesale_discount_percent,
                ),
                retail: discounted(
                    percent_of(gross, s.retail_percent),
                    s.retail_discount_percent,
                ),
            }
        };

        let small = split(gross_75cl);
        let large = split(gross_150cl);
        ChannelRevenue {
            direct: small.direct.saturating_add(large.direct),
            wholesale: small.wholesale.saturating_add(large.wholesale),
            retail: small.retail.saturating_add(large.retail),
        }
    }

    /// Step 7: compounded cost inflation times the scenario cost multiplier.
    fn cost_factor(
        &self,
        year_index: u32,
    ) -> Decimal {
        compound_factor(COST_INFLATION_YEARLY_PERCENT, year_index)
            .saturating_mul(self.scenario.cost_multiplier)
    }

    /// Step 8
    fn ingredients(
        &self,
        volume: Decimal,
        bottles: BottleCounts,
        cost_factor: Decimal,
    ) -> Ingredients {
        let t = self.template;
        let inflated = |quantity: Decimal, unit_cost: Decimal| {
            quantity.saturating_mul(unit_cost).saturating_mul(cost_factor)
        };
        Ingredients {
            juice: inflated(volume, t.juice_per_liter),
            yeast: inflated(div_or_zero(volume, LITERS_PER_BATCH), t.yeast_per_1000l),
            sugar: inflated(volume.saturating_mul(SUGAR_KG_PER_LITER), t.sugar_per_kg),
            other: inflated(bottles.total(), t.other_per_bottle),
        }
    }

    /// Step 9
    fn packaging(
        &self,
        bottles: BottleCounts,
        cost_factor: Decimal,
    ) -> Decimal {
        let t = self.template;
        let glass = bottles
            .small
            .saturating_mul(t.bottle_75cl)
            .saturating_add(bottles.large.saturating_mul(t.bottle_150cl));
        let dressing = bottles
            .total()
            .saturating_mul(saturating_sum([t.label, t.cap, t.box_cost]));
        glass.saturating_add(dressing).saturating_mul(cost_factor)
    }

    /// Step 10: labor is not subject to cost inflation.
    fn labor(
        &self,
        volume: Decimal,
    ) -> Labor {
        let t = self.template;
        let multiplier = self.scenario.labor_multiplier;
        let batches = div_or_zero(volume, LITERS_PER_BATCH).ceil();
        Labor {
            batches,
            variable: batches
                .saturating_mul(t.hours_per_batch)
                .saturating_mul(t.hourly_rate)
                .saturating_mul(multiplier),
            fixed: t
                .monthly_fixed_labor
                .saturating_mul(MONTHS_PER_YEAR)
                .saturating_mul(multiplier),
        }
    }

    /// Step 12
    fn overhead(
        &self,
        volume: Decimal,
        total_cogs: Decimal,
    ) -> Overhead {
        let t = self.template;
        Overhead {
            fixed: t.monthly_fixed_overhead.saturating_mul(MONTHS_PER_YEAR),
            variable: volume.saturating_mul(t.overhead_per_liter),
            cogs_share: percent_of(total_cogs, t.overhead_percent_of_cogs),
        }
    }

    /// Step 13: average inventory is half the year's bottles.
    fn holding_cost(
        &self,
        bottles: BottleCounts,
    ) -> Decimal {
        (bottles.total() / Decimal::TWO)
            .saturating_mul(self.scenario.holding_cost_per_bottle_monthly)
            .saturating_mul(MONTHS_PER_YEAR)
    }

    /// Losses carry no tax benefit.
    fn tax(
        &self,
        ebt: Decimal,
    ) -> Decimal {
        if ebt > Decimal::ZERO {
            percent_of(ebt, self.template.tax_rate)
        } else {
            Decimal::ZERO
        }
    }

    /// Step 16: returns `(cost_per_bottle_75cl, cost_per_bottle_150cl)`.
    fn cost_per_bottle(
        &self,
        total_cogs: Decimal,
        bottles: BottleCounts,
    ) -> (Decimal, Decimal) {
        (
            div_or_zero(total_cogs.saturating_mul(BOTTLE_75CL_SHARE), bottles.small),
            div_or_zero(total_cogs.saturating_mul(BOTTLE_150CL_SHARE), bottles.large),
        )
    }

    /// Step 17: fixed costs over the 0.75 L contribution margin.
    ///
    /// Zero when the margin is not positive. With no 0.75 L bottles the unit
    /// cost is zero, so the full price counts as margin.
    fn breakeven_bottles(
        &self,
        fixed_labor: Decimal,
        fixed_overhead: Decimal,
        price_75cl: Decimal,
        cost_per_bottle_75cl: Decimal,
    ) -> Decimal {
        let t = self.template;
        let fixed_costs = saturating_sum([
            fixed_labor,
            fixed_overhead,
            t.depreciation_yearly,
            t.interest_expense_yearly,
        ]);
        div_or_zero(fixed_costs, price_75cl.saturating_sub(cost_per_bottle_75cl))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;
    use crate::models::{reference_scenario, reference_template};

    fn year_one() -> YearlyProjection {
        let template = reference_template();
        let scenario = reference_scenario();
        YearProjector::new(&template, &scenario).project(0, dec!(1000), dec!(-50000))
    }

    fn projector_parts() -> (CostTemplate, CostScenario) {
        (reference_template(), reference_scenario())
    }

    // =========================================================================
    // Reference year tests
    // =========================================================================

    #[test]
    fn reference_year_volume_and_bottles() {
        let y = year_one();

        assert_eq!(y.year, 1);
        assert_eq!(y.volume_liters, dec!(1000));
        assert_eq!(y.effective_volume_liters, dec!(950));
        assert_eq!(y.bottles_75cl, dec!(886));
        assert_eq!(y.bottles_150cl, dec!(190));
        assert_eq!(y.batch_count, dec!(1));
        assert_eq!(y.price_75cl, dec!(110));
        assert_eq!(y.price_150cl, dec!(200));
    }

    #[test]
    fn reference_year_revenue_by_channel() {
        let y = year_one();

        assert_eq!(y.revenue_direct, dec!(54184));
        assert_eq!(y.revenue_wholesale, dec!(46056.4));
        assert_eq!(y.revenue_retail, dec!(24382.8));
        assert_eq!(y.total_revenue, dec!(124623.2));
    }

    #[test]
    fn reference_year_cogs() {
        let y = year_one();

        assert_eq!(y.ingredients_juice, dec!(8000));
        assert_eq!(y.ingredients_yeast, dec!(741));
        assert_eq!(y.ingredients_sugar, dec!(5));
        assert_eq!(y.ingredients_other, dec!(11792.96));
        assert_eq!(y.cogs_ingredients, dec!(20538.96));
        assert_eq!(y.cogs_packaging, dec!(10171.6));
        assert_eq!(y.labor_variable, dec!(2800));
        assert_eq!(y.labor_fixed, dec!(0));
        assert_eq!(y.cogs_labor, dec!(2800));
        assert_eq!(y.total_cogs, dec!(33510.56));
    }

    #[test]
    fn reference_year_overhead_and_holding() {
        let y = year_one();

        assert_eq!(y.overhead_fixed, dec!(120000));
        assert_eq!(y.overhead_variable, dec!(500));
        assert_eq!(y.overhead_cogs_share, dec!(5026.584));
        assert_eq!(y.total_overhead, dec!(125526.584));
        assert_eq!(y.holding_cost, dec!(3228));
    }

    #[test]
    fn reference_year_profitability_cascade() {
        let y = year_one();

        assert_eq!(y.gross_profit, dec!(91112.64));
        assert_eq!(round_half_up(y.gross_margin_percent), dec!(73.11));
        assert_eq!(y.ebitda, dec!(-37641.944));
        assert_eq!(round_half_up(y.ebitda_margin_percent), dec!(-30.20));
        assert_eq!(y.depreciation, dec!(50000));
        assert_eq!(y.ebit, dec!(-87641.944));
        assert_eq!(y.interest_expense, dec!(0));
        assert_eq!(y.ebt, dec!(-87641.944));
        assert_eq!(y.tax, dec!(0));
        assert_eq!(y.net_income, dec!(-87641.944));
        assert_eq!(round_half_up(y.net_margin_percent), dec!(-70.33));
    }

    #[test]
    fn reference_year_cash_flow() {
        let y = year_one();

        assert_eq!(y.cash_generated, dec!(-37641.944));
        assert_eq!(y.cumulative_cash_flow, dec!(-87641.944));
    }

    #[test]
    fn reference_year_unit_economics() {
        let y = year_one();

        assert_eq!(round_half_up(y.cost_per_liter), dec!(35.27));
        assert_eq!(round_half_up(y.cost_per_bottle_75cl), dec!(26.48));
        assert_eq!(round_half_up(y.cost_per_bottle_150cl), dec!(52.91));
        assert_eq!(round_half_up(y.breakeven_bottles), dec!(2035.33));
        assert_eq!(round_half_up(y.breakeven_revenue), dec!(223886.70));
    }

    #[test]
    fn third_year_compounds_growth_and_inflation() {
        let (template, scenario) = projector_parts();
        let y = YearProjector::new(&template, &scenario).project(2, dec!(1000), dec!(-81353.62));

        assert_eq!(y.year, 3);
        assert_eq!(y.volume_liters, dec!(2250));
        assert_eq!(y.bottles_75cl, dec!(1995));
        assert_eq!(y.bottles_150cl, dec!(427));
        assert_eq!(y.batch_count, dec!(3));
        assert_eq!(round_half_up(y.price_75cl), dec!(116.70));
        assert_eq!(round_half_up(y.total_revenue), dec!(297542.14));
        assert_eq!(round_half_up(y.total_cogs), dec!(81016.91));
        assert_eq!(round_half_up(y.tax), dec!(5715.97));
    }

    // =========================================================================
    // Capacity constraint tests
    // =========================================================================

    #[test]
    fn production_cap_is_a_hard_limit() {
        let (template, mut scenario) = projector_parts();
        scenario.max_production_liters_yearly = Some(dec!(2000));

        let y = YearProjector::new(&template, &scenario).project(2, dec!(1000), dec!(0));

        assert_eq!(y.volume_liters, dec!(2000));
        assert_eq!(y.effective_volume_liters, dec!(1900));
        assert_eq!(y.batch_count, dec!(2));
    }

    #[test]
    fn production_cap_above_demand_has_no_effect() {
        let (template, mut scenario) = projector_parts();
        scenario.max_production_liters_yearly = Some(dec!(5000));

        let y = YearProjector::new(&template, &scenario).project(0, dec!(1000), dec!(0));

        assert_eq!(y.volume_liters, dec!(1000));
    }

    #[test]
    fn storage_cap_scales_both_sizes_proportionally() {
        let (template, mut scenario) = projector_parts();
        scenario.max_storage_bottles = Some(1500);

        // Uncapped year 2 would produce 1330 + 285 = 1615 bottles.
        let y = YearProjector::new(&template, &scenario).project(1, dec!(1000), dec!(0));

        assert_eq!(y.bottles_75cl, dec!(1235));
        assert_eq!(y.bottles_150cl, dec!(264));
        assert_eq!(y.total_bottles() <= dec!(1500), true);
        assert_eq!(y.holding_cost, dec!(4497));
        assert_eq!(round_half_up(y.total_revenue), dec!(178764.74));
    }

    #[test]
    fn storage_cap_below_production_keeps_volume_costs() {
        let (template, mut scenario) = projector_parts();
        scenario.max_storage_bottles = Some(1500);

        let capped = YearProjector::new(&template, &scenario).project(1, dec!(1000), dec!(0));

        // Juice is bought for the full volume even when bottles are clamped.
        assert_eq!(capped.volume_liters, dec!(1500));
        assert_eq!(capped.ingredients_juice, dec!(12000) * dec!(1.025));
    }

    #[test]
    fn storage_cap_of_zero_empties_the_cellar() {
        let (template, mut scenario) = projector_parts();
        scenario.max_storage_bottles = Some(0);

        let y = YearProjector::new(&template, &scenario).project(0, dec!(1000), dec!(0));

        assert_eq!(y.total_bottles(), dec!(0));
        assert_eq!(y.total_revenue, dec!(0));
        assert_eq!(y.cost_per_bottle_75cl, dec!(0));
        assert_eq!(y.breakeven_bottles, dec!(170000) / dec!(110));
    }

    // =========================================================================
    // Edge case tests
    // =========================================================================

    #[test]
    fn zero_volume_leaves_only_fixed_costs() {
        let (mut template, scenario) = projector_parts();
        template.monthly_fixed_labor = dec!(2000);
        template.interest_expense_yearly = dec!(1500);

        let y = YearProjector::new(&template, &scenario).project(0, dec!(0), dec!(-50000));

        assert_eq!(y.bottles_75cl, dec!(0));
        assert_eq!(y.bottles_150cl, dec!(0));
        assert_eq!(y.total_revenue, dec!(0));
        assert_eq!(y.cogs_ingredients, dec!(0));
        assert_eq!(y.cogs_packaging, dec!(0));
        assert_eq!(y.labor_variable, dec!(0));
        assert_eq!(y.cost_per_liter, dec!(0));
        assert_eq!(y.cost_per_bottle_75cl, dec!(0));
        assert_eq!(y.cost_per_bottle_150cl, dec!(0));
        assert_eq!(y.gross_margin_percent, dec!(0));
        assert_eq!(y.net_margin_percent, dec!(0));

        assert_eq!(y.labor_fixed, dec!(24000));
        assert_eq!(y.overhead_fixed, dec!(120000));
        assert_eq!(y.depreciation, dec!(50000));
        assert_eq!(y.interest_expense, dec!(1500));
    }

    #[test]
    fn zero_volume_multiplier_matches_zero_base_volume() {
        let (template, mut scenario) = projector_parts();
        scenario.volume_multiplier = dec!(0);

        let projector = YearProjector::new(&template, &scenario);
        let y = projector.project(4, dec!(1000), dec!(0));

        assert_eq!(y.volume_liters, dec!(0));
        assert_eq!(y.total_bottles(), dec!(0));
        assert_eq!(y.total_revenue, dec!(0));
    }

    #[test]
    fn zero_yield_keeps_purchases_but_no_bottles() {
        let (mut template, scenario) = projector_parts();
        template.yield_efficiency = dec!(0);

        let y = YearProjector::new(&template, &scenario).project(0, dec!(1000), dec!(0));

        assert_eq!(y.effective_volume_liters, dec!(0));
        assert_eq!(y.total_bottles(), dec!(0));
        assert_eq!(y.ingredients_juice, dec!(8000));
        assert_eq!(y.cost_per_liter, dec!(0));
    }

    #[test]
    fn tax_applies_only_to_positive_ebt() {
        let (mut template, scenario) = projector_parts();
        template.depreciation_yearly = dec!(0);
        template.monthly_fixed_overhead = dec!(0);

        let y = YearProjector::new(&template, &scenario).project(0, dec!(1000), dec!(0));

        assert_eq!(y.ebt > dec!(0), true);
        assert_eq!(y.tax, y.ebt * dec!(0.22));
        assert_eq!(y.net_income, y.ebt - y.tax);
    }

    #[test]
    fn direct_only_channel_mix_is_undiscounted() {
        let (template, mut scenario) = projector_parts();
        scenario.direct_sales_percent = dec!(100);
        scenario.wholesale_percent = dec!(0);
        scenario.retail_percent = dec!(0);

        let y = YearProjector::new(&template, &scenario).project(0, dec!(1000), dec!(0));

        assert_eq!(y.revenue_wholesale, dec!(0));
        assert_eq!(y.revenue_retail, dec!(0));
        assert_eq!(y.total_revenue, dec!(886) * dec!(110) + dec!(190) * dec!(200));
    }

    #[test]
    fn unprofitable_bottle_has_no_breakeven() {
        let (mut template, scenario) = projector_parts();
        template.bottle_75cl_price = dec!(1);

        let y = YearProjector::new(&template, &scenario).project(0, dec!(1000), dec!(0));

        assert_eq!(y.breakeven_bottles, dec!(0));
        assert_eq!(y.breakeven_revenue, dec!(0));
    }

    #[test]
    fn labor_multiplier_scales_fixed_and_variable_labor() {
        let (mut template, mut scenario) = projector_parts();
        template.monthly_fixed_labor = dec!(1000);
        scenario.labor_multiplier = dec!(1.5);

        let y = YearProjector::new(&template, &scenario).project(0, dec!(1000), dec!(0));

        assert_eq!(y.labor_variable, dec!(4200));
        assert_eq!(y.labor_fixed, dec!(18000));
    }

    #[test]
    fn partial_batch_rounds_up() {
        let (template, scenario) = projector_parts();

        let y = YearProjector::new(&template, &scenario).project(0, dec!(1001), dec!(0));

        assert_eq!(y.batch_count, dec!(2));
        assert_eq!(y.labor_variable, dec!(5600));
    }

    // =========================================================================
    // Extreme input tests
    // =========================================================================

    #[test]
    fn bottle_counts_beyond_i64_are_exact() {
        let (template, scenario) = projector_parts();

        let y = YearProjector::new(&template, &scenario).project(
            0,
            dec!(100000000000000000000),
            dec!(0),
        );

        assert_eq!(y.effective_volume_liters, dec!(95000000000000000000));
        assert_eq!(y.bottles_75cl, dec!(88666666666666666666));
        assert_eq!(y.bottles_150cl, dec!(19000000000000000000));
        assert_eq!(y.bottles_75cl > Decimal::from(i64::MAX), true);
        assert_eq!(y.total_bottles(), dec!(107666666666666666666));
        assert_eq!(y.batch_count, dec!(100000000000000000));
    }

    #[test]
    fn saturated_volume_still_projects() {
        let (template, scenario) = projector_parts();

        let y = YearProjector::new(&template, &scenario).project(0, Decimal::MAX, dec!(0));

        assert_eq!(y.volume_liters, Decimal::MAX);
        assert_eq!(y.effective_volume_liters > dec!(0), true);
        assert_eq!(y.bottles_75cl > dec!(0), true);
        assert_eq!(y.total_cogs > dec!(0), true);
        assert_eq!(y.tax >= dec!(0), true);
    }

    #[test]
    fn saturated_losses_still_project() {
        let (template, mut scenario) = projector_parts();
        scenario.cost_multiplier = Decimal::MAX;
        scenario.price_multiplier = dec!(0);

        let y = YearProjector::new(&template, &scenario).project(0, Decimal::MAX, Decimal::MIN);

        assert_eq!(y.total_revenue, dec!(0));
        assert_eq!(y.total_cogs, Decimal::MAX);
        assert_eq!(y.tax, dec!(0));
        assert_eq!(y.cumulative_cash_flow, Decimal::MIN);
        assert_eq!(y.breakeven_bottles, dec!(0));
    }
}
