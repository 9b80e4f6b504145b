use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One projected year of production, P&L, cash flow and unit economics.
///
/// Field names are reused verbatim as CSV/JSON export headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// 1-based year number.
    pub year: u32,

    // Production
    pub volume_liters: Decimal,
    pub effective_volume_liters: Decimal,
    /// Whole bottles, floored.
    pub bottles_75cl: Decimal,
    pub bottles_150cl: Decimal,
    /// Whole 1000 L batches, ceiled.
    pub batch_count: Decimal,

    // Pricing
    pub price_75cl: Decimal,
    pub price_150cl: Decimal,

    // Revenue
    pub revenue_direct: Decimal,
    pub revenue_wholesale: Decimal,
    pub revenue_retail: Decimal,
    pub total_revenue: Decimal,

    // COGS
    pub ingredients_juice: Decimal,
    pub ingredients_yeast: Decimal,
    pub ingredients_sugar: Decimal,
    pub ingredients_other: Decimal,
    pub cogs_ingredients: Decimal,
    pub cogs_packaging: Decimal,
    pub labor_variable: Decimal,
    pub labor_fixed: Decimal,
    pub cogs_labor: Decimal,
    pub total_cogs: Decimal,

    // Operating costs
    pub overhead_fixed: Decimal,
    pub overhead_variable: Decimal,
    pub overhead_cogs_share: Decimal,
    pub total_overhead: Decimal,
    pub holding_cost: Decimal,

    // Profitability
    pub gross_profit: Decimal,
    pub gross_margin_percent: Decimal,
    pub ebitda: Decimal,
    pub ebitda_margin_percent: Decimal,
    pub depreciation: Decimal,
    pub ebit: Decimal,
    pub interest_expense: Decimal,
    pub ebt: Decimal,
    pub tax: Decimal,
    pub net_income: Decimal,
    pub net_margin_percent: Decimal,

    // Cash flow
    pub cash_generated: Decimal,
    pub cumulative_cash_flow: Decimal,

    // Unit economics
    pub cost_per_liter: Decimal,
    pub cost_per_bottle_75cl: Decimal,
    pub cost_per_bottle_150cl: Decimal,
    pub breakeven_bottles: Decimal,
    pub breakeven_revenue: Decimal,
}

impl YearlyProjection {
    pub fn total_bottles(&self) -> Decimal {
        self.bottles_75cl.saturating_add(self.bottles_150cl)
    }
}

/// Outcome of a multi-year run: the yearly projections plus summary metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Chronological; index 0 is year 1.
    pub yearly_projections: Vec<YearlyProjection>,

    pub total_revenue: Decimal,
    pub total_cogs: Decimal,
    pub total_gross_profit: Decimal,
    pub total_ebitda: Decimal,
    pub total_ebit: Decimal,
    pub total_net_income: Decimal,

    /// Revenue-weighted, not a mean of the yearly percentages.
    pub avg_gross_margin_percent: Decimal,
    pub avg_ebitda_margin_percent: Decimal,

    /// 0-based index of the first year with positive cumulative cash flow.
    pub breakeven_year: Option<usize>,
    pub payback_period_years: Option<Decimal>,
    pub roi_percent: Decimal,
}

impl SimulationResult {
    pub fn years(&self) -> usize {
        self.yearly_projections.len()
    }

    pub fn final_year(&self) -> Option<&YearlyProjection> {
        self.yearly_projections.last()
    }
}
