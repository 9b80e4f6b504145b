//! Multi-year simulation driver.
//!
//! [`SimulationRunner`] calls [`YearProjector`] once per year, threading the
//! cumulative cash balance forward, and then aggregates the projections into
//! a [`SimulationResult`].
//!
//! # Summary Metrics
//!
//! | Metric | Definition |
//! |--------|------------|
//! | Totals | Sum of each P&L line over all years |
//! | Average margins | Total gross profit (or EBITDA) ÷ total revenue × 100 |
//! | Breakeven year | First 0-based index with cumulative cash > 0 |
//! | Payback period | Interpolated crossing point, only when breakeven index > 0 |
//! | ROI | Total net income ÷ \|depreciation\| × 100, 0 when depreciation is 0 |
//!
//! The cash balance starts at `-depreciation_yearly`, standing in for the
//! up-front investment. Totals and the running balance saturate at the
//! `Decimal` bounds like the yearly figures do.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cider_core::calculations::{SimulationRunner, DEFAULT_PROJECTION_YEARS};
//! use cider_core::models::{reference_scenario, reference_template};
//!
//! let template = reference_template();
//! let scenario = reference_scenario();
//!
//! let result = SimulationRunner::new(&template, &scenario)
//!     .run(DEFAULT_PROJECTION_YEARS, dec!(1000));
//!
//! assert_eq!(result.years(), 11);
//! assert_eq!(result.breakeven_year, Some(3));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{div_or_zero, margin_percent, saturating_sum};
use crate::calculations::projection::YearProjector;
use crate::models::{CostScenario, CostTemplate, SimulationResult, YearlyProjection};

/// Horizon used when the caller does not pick one.
pub const DEFAULT_PROJECTION_YEARS: u32 = 11;

/// Liters produced in year one when the caller does not pick a volume.
pub const DEFAULT_BASE_VOLUME_LITERS: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Runs a template and scenario over a number of years.
#[derive(Debug, Clone, Copy)]
pub struct SimulationRunner<'a> {
    template: &'a CostTemplate,
    scenario: &'a CostScenario,
}

impl<'a> SimulationRunner<'a> {
    pub fn new(
        template: &'a CostTemplate,
        scenario: &'a CostScenario,
    ) -> Self {
        Self { template, scenario }
    }

    /// Projects `years` consecutive years starting from `base_volume` liters.
    ///
    /// Inputs are not validated. Suspicious values (a channel mix that does
    /// not add up to 100, a yield outside 0..=100) are logged once and used
    /// as given.
    pub fn run(
        &self,
        years: u32,
        base_volume: Decimal,
    ) -> SimulationResult {
        self.warn_on_suspicious_inputs();

        let projector = YearProjector::new(self.template, self.scenario);
        let mut cumulative_cash = -self.template.depreciation_yearly;
        let mut yearly_projections = Vec::with_capacity(years as usize);

        for year_index in 0..years {
            let projection = projector.project(year_index, base_volume, cumulative_cash);
            cumulative_cash = projection.cumulative_cash_flow;
            yearly_projections.push(projection);
        }

        let result = self.summarize(yearly_projections);

        debug!(
            years,
            total_revenue = %result.total_revenue,
            total_net_income = %result.total_net_income,
            breakeven_year = ?result.breakeven_year,
            payback_period_years = ?result.payback_period_years,
            roi_percent = %result.roi_percent,
            "simulation complete"
        );

        result
    }

    fn warn_on_suspicious_inputs(&self) {
        let channel_mix = self.scenario.channel_mix_total();
        if channel_mix != Decimal::ONE_HUNDRED {
            warn!(
                channel_mix = %channel_mix,
                "channel mix does not add up to 100 percent"
            );
        }

        let yield_efficiency = self.template.yield_efficiency;
        if yield_efficiency < Decimal::ZERO || yield_efficiency > Decimal::ONE_HUNDRED {
            warn!(
                yield_efficiency = %yield_efficiency,
                "yield efficiency outside 0..=100 percent"
            );
        }
    }

    /// Aggregates totals and derived metrics.
    fn summarize(
        &self,
        yearly_projections: Vec<YearlyProjection>,
    ) -> SimulationResult {
        let total = |field: fn(&YearlyProjection) -> Decimal| -> Decimal {
            saturating_sum(yearly_projections.iter().map(field))
        };

        let total_revenue = total(|y| y.total_revenue);
        let total_cogs = total(|y| y.total_cogs);
        let total_gross_profit = total(|y| y.gross_profit);
        let total_ebitda = total(|y| y.ebitda);
        let total_ebit = total(|y| y.ebit);
        let total_net_income = total(|y| y.net_income);

        let breakeven_year = breakeven_year(&yearly_projections);
        let payback_period_years = breakeven_year
            .and_then(|index| payback_period(&yearly_projections, index));

        SimulationResult {
            avg_gross_margin_percent: margin_percent(total_gross_profit, total_revenue),
            avg_ebitda_margin_percent: margin_percent(total_ebitda, total_revenue),
            roi_percent: self.roi_percent(total_net_income),
            yearly_projections,
            total_revenue,
            total_cogs,
            total_gross_profit,
            total_ebitda,
            total_ebit,
            total_net_income,
            breakeven_year,
            payback_period_years,
        }
    }

    /// Net income over the magnitude of yearly depreciation.
    fn roi_percent(
        &self,
        total_net_income: Decimal,
    ) -> Decimal {
        div_or_zero(total_net_income, self.template.depreciation_yearly.abs())
            .saturating_mul(Decimal::ONE_HUNDRED)
    }
}

/// Runs a simulation without keeping a [`SimulationRunner`] around.
pub fn run_simulation(
    template: &CostTemplate,
    scenario: &CostScenario,
    years: u32,
    base_volume: Decimal,
) -> SimulationResult {
    SimulationRunner::new(template, scenario).run(years, base_volume)
}

/// First index whose cumulative cash flow is strictly positive.
fn breakeven_year(projections: &[YearlyProjection]) -> Option<usize> {
    projections
        .iter()
        .position(|y| y.cumulative_cash_flow > Decimal::ZERO)
}

/// Linear interpolation between the last negative and the first positive
/// cumulative balance. `None` when breakeven happens in the first year.
fn payback_period(
    projections: &[YearlyProjection],
    breakeven_index: usize,
) -> Option<Decimal> {
    if breakeven_index == 0 {
        return None;
    }
    let before = projections.get(breakeven_index - 1)?.cumulative_cash_flow;
    let after = projections.get(breakeven_index)?.cumulative_cash_flow;
    let ratio = div_or_zero(before.abs(), after.saturating_sub(before));
    Some(Decimal::from(breakeven_index - 1).saturating_add(ratio))
}
