//! Writers for handing a [`SimulationResult`] to spreadsheets and other
//! tools.
//!
//! Column and key names are the [`YearlyProjection`] field names, so they
//! stay stable across releases. Decimals are written unrounded.
//!
//! [`YearlyProjection`]: cider_core::YearlyProjection

use std::io::Write;

use cider_core::SimulationResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(String),

    #[error("JSON write error: {0}")]
    Json(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Json(err.to_string())
    }
}

/// Writes one CSV row per projected year, with a header row.
///
/// An empty result still produces the header.
pub fn write_projections_csv<W: Write>(
    result: &SimulationResult,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if result.yearly_projections.is_empty() {
        csv_writer.write_record(PROJECTION_COLUMNS)?;
    }
    for projection in &result.yearly_projections {
        csv_writer.serialize(projection)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes the whole result, summary metrics included, as pretty JSON.
pub fn write_result_json<W: Write>(
    result: &SimulationResult,
    writer: W,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}

/// Header written by [`write_projections_csv`], in column order.
pub const PROJECTION_COLUMNS: [&str; 45] = [
    "year",
    "volume_liters",
    "effective_volume_liters",
    "bottles_75cl",
    "bottles_150cl",
    "batch_count",
    "price_75cl",
    "price_150cl",
    "revenue_direct",
    "revenue_wholesale",
    "revenue_retail",
    "total_revenue",
    "ingredients_juice",
    "ingredients_yeast",
    "ingredients_sugar",
    "ingredients_other",
    "cogs_ingredients",
    "cogs_packaging",
    "labor_variable",
    "labor_fixed",
    "cogs_labor",
    "total_cogs",
    "overhead_fixed",
    "overhead_variable",
    "overhead_cogs_share",
    "total_overhead",
    "holding_cost",
    "gross_profit",
    "gross_margin_percent",
    "ebitda",
    "ebitda_margin_percent",
    "depreciation",
    "ebit",
    "interest_expense",
    "ebt",
    "tax",
    "net_income",
    "net_margin_percent",
    "cash_generated",
    "cumulative_cash_flow",
    "cost_per_liter",
    "cost_per_bottle_75cl",
    "cost_per_bottle_150cl",
    "breakeven_bottles",
    "breakeven_revenue",
];
