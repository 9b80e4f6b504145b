//! Plain-text rendering of simulation results for the terminal.

use cider_core::format::{DEFAULT_CURRENCY_DECIMALS, DEFAULT_PERCENT_DECIMALS, NumberFormat};
use cider_core::{RecommendationKind, SimulationRecord, SimulationResult, recommend};
use rust_decimal::Decimal;

const YEAR_COLUMNS: [(&str, usize); 7] = [
    ("Year", 4),
    ("Liters", 10),
    ("Bottles", 9),
    ("Revenue", 15),
    ("EBITDA", 15),
    ("Net income", 15),
    ("Cumulative cash", 16),
];

fn row(
    cells: &[String],
    widths: impl Iterator<Item = usize>,
) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn breakeven_label(breakeven_year: Option<usize>) -> String {
    match breakeven_year {
        Some(index) => format!("year {}", index + 1),
        None => "not reached".to_string(),
    }
}

fn payback_label(
    fmt: &NumberFormat,
    payback: Option<Decimal>,
) -> String {
    match payback {
        Some(years) => format!("{} years", fmt.number(years, 1)),
        None => "n/a".to_string(),
    }
}

/// Year-by-year table, summary metrics and recommendations.
pub fn render_report(
    result: &SimulationResult,
    base_volume: Decimal,
    fmt: &NumberFormat,
) -> String {
    let money = |v: Decimal| fmt.currency(v, DEFAULT_CURRENCY_DECIMALS);
    let percent = |v: Decimal| fmt.percent(v, DEFAULT_PERCENT_DECIMALS);

    let mut lines = vec![
        format!(
            "Projection: {} years from {} L",
            result.years(),
            fmt.number(base_volume, 0)
        ),
        String::new(),
        row(
            &YEAR_COLUMNS.map(|(title, _)| title.to_string()),
            YEAR_COLUMNS.iter().map(|(_, w)| *w),
        ),
    ];

    for year in &result.yearly_projections {
        lines.push(row(
            &[
                year.year.to_string(),
                fmt.number(year.volume_liters, 0),
                fmt.number(year.total_bottles(), 0),
                money(year.total_revenue),
                money(year.ebitda),
                money(year.net_income),
                money(year.cumulative_cash_flow),
            ],
            YEAR_COLUMNS.iter().map(|(_, w)| *w),
        ));
    }

    let summary = [
        ("Total revenue", money(result.total_revenue)),
        ("Total COGS", money(result.total_cogs)),
        ("Total EBITDA", money(result.total_ebitda)),
        ("Total net income", money(result.total_net_income)),
        ("Avg gross margin", percent(result.avg_gross_margin_percent)),
        ("Avg EBITDA margin", percent(result.avg_ebitda_margin_percent)),
        ("Breakeven", breakeven_label(result.breakeven_year)),
        ("Payback period", payback_label(fmt, result.payback_period_years)),
        ("ROI", percent(result.roi_percent)),
    ];

    lines.push(String::new());
    lines.push("Summary".to_string());
    for (label, value) in summary {
        lines.push(format!("  {label:<20} {value}"));
    }

    lines.push(String::new());
    lines.push("Recommendations".to_string());
    let recommendations = recommend(result);
    if recommendations.is_empty() {
        lines.push("  (none)".to_string());
    }
    for recommendation in recommendations {
        let marker = match recommendation.kind() {
            RecommendationKind::Warning => '!',
            RecommendationKind::Positive => '+',
        };
        lines.push(format!("  {marker} {recommendation}"));
    }

    lines.join("\n")
}

/// One line per scenario, for side-by-side comparison.
pub fn render_comparison(
    rows: &[(String, &SimulationResult)],
    fmt: &NumberFormat,
) -> String {
    let widths = [24, 16, 16, 12, 10, 14];
    let mut lines = vec![row(
        &[
            "Scenario",
            "Total revenue",
            "Net income",
            "Breakeven",
            "Payback",
            "ROI",
        ]
        .map(String::from),
        widths.into_iter(),
    )];

    for (name, result) in rows {
        lines.push(row(
            &[
                name.clone(),
                fmt.currency(result.total_revenue, DEFAULT_CURRENCY_DECIMALS),
                fmt.currency(result.total_net_income, DEFAULT_CURRENCY_DECIMALS),
                breakeven_label(result.breakeven_year),
                payback_label(fmt, result.payback_period_years),
                fmt.percent(result.roi_percent, DEFAULT_PERCENT_DECIMALS),
            ],
            widths.into_iter(),
        ));
    }

    lines.join("\n")
}

/// Table of saved results, in the order given.
pub fn render_saved_results(
    records: &[SimulationRecord],
    fmt: &NumberFormat,
) -> String {
    if records.is_empty() {
        return "No saved results.".to_string();
    }

    let widths = [5, 24, 9, 9, 6, 16, 12, 20];
    let mut lines = vec![row(
        &[
            "Id",
            "Name",
            "Template",
            "Scenario",
            "Years",
            "Net income",
            "Breakeven",
            "Saved",
        ]
        .map(String::from),
        widths.into_iter(),
    )];

    for record in records {
        lines.push(row(
            &[
                record.id.to_string(),
                record.name.clone(),
                record.template_id.to_string(),
                record.scenario_id.to_string(),
                record.years.to_string(),
                fmt.currency(record.result.total_net_income, DEFAULT_CURRENCY_DECIMALS),
                breakeven_label(record.result.breakeven_year),
                record.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ],
            widths.into_iter(),
        ));
    }

    lines.join("\n")
}
