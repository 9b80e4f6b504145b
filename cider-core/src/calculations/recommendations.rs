//! Rule-based insights derived from a [`SimulationResult`].
//!
//! Each rule is an independent threshold check. Rules never short-circuit,
//! so one result can trigger several warnings and a positive signal at the
//! same time. Output order is fixed:
//!
//! | Order | Rule | Kind |
//! |-------|------|------|
//! | 1 | No breakeven, or breakeven after year index 5 | Warning |
//! | 2 | Average gross margin below 40 % | Warning |
//! | 3 | Average EBITDA margin below 20 % | Warning |
//! | 4 | Revenue growth from mid-horizon to final year below 20 % | Warning |
//! | 5 | ROI below 50 % | Warning |
//! | 6 | Average EBITDA margin above 30 % | Positive |
//! | 7 | Breakeven at year index 2 or earlier | Positive |

use std::fmt;

use rust_decimal::Decimal;

use crate::calculations::common::{margin_percent, round_dp_half_up};
use crate::models::SimulationResult;

/// Breakeven later than this 0-based year index is considered slow.
pub const SLOW_BREAKEVEN_AFTER_YEAR: usize = 5;
/// Breakeven at or before this 0-based year index is considered fast.
pub const FAST_BREAKEVEN_BY_YEAR: usize = 2;
/// Minimum healthy average gross margin, in percent.
pub const MIN_GROSS_MARGIN_PERCENT: Decimal = Decimal::from_parts(40, 0, 0, false, 0);
/// Minimum healthy average EBITDA margin, in percent.
pub const MIN_EBITDA_MARGIN_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
/// Average EBITDA margin above which the business is considered strong.
pub const STRONG_EBITDA_MARGIN_PERCENT: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
/// Minimum revenue growth between the mid-horizon and final year, in percent.
pub const MIN_LATE_GROWTH_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
/// Minimum acceptable ROI, in percent.
pub const MIN_ROI_PERCENT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Whether an insight flags a risk or a strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationKind {
    Warning,
    Positive,
}

/// A single insight with the figure that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    /// Carries the breakeven index, `None` when the run never turns cash positive.
    SlowBreakeven(Option<usize>),
    ThinGrossMargin(Decimal),
    OverheadInefficiency(Decimal),
    StallingGrowth(Decimal),
    LowRoi(Decimal),
    StrongEbitdaMargin(Decimal),
    FastBreakeven(usize),
}

impl Recommendation {
    pub fn kind(&self) -> RecommendationKind {
        match self {
            Self::StrongEbitdaMargin(_) | Self::FastBreakeven(_) => RecommendationKind::Positive,
            _ => RecommendationKind::Warning,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::SlowBreakeven(None) => write!(
                f,
                "Cash flow never turns positive within the projection. \
                 Revisit pricing, volume or the initial investment."
            ),
            Self::SlowBreakeven(Some(year)) => write!(
                f,
                "Breakeven is not reached until year {}. Consider lowering fixed costs \
                 or growing volume faster.",
                year + 1
            ),
            Self::ThinGrossMargin(margin) => write!(
                f,
                "Average gross margin is only {}%. Look at raw material and packaging \
                 costs or raise prices.",
                round_dp_half_up(*margin, 1)
            ),
            Self::OverheadInefficiency(margin) => write!(
                f,
                "Average EBITDA margin is {}%. Overhead is eating most of the gross profit.",
                round_dp_half_up(*margin, 1)
            ),
            Self::StallingGrowth(growth) => write!(
                f,
                "Revenue grows only {}% over the second half of the horizon. \
                 Growth is flattening out.",
                round_dp_half_up(*growth, 1)
            ),
            Self::LowRoi(roi) => write!(
                f,
                "Return on investment is {}%, which is low for the capital tied up.",
                round_dp_half_up(*roi, 1)
            ),
            Self::StrongEbitdaMargin(margin) => write!(
                f,
                "Strong average EBITDA margin of {}%. The operation scales well.",
                round_dp_half_up(*margin, 1)
            ),
            Self::FastBreakeven(year) => write!(
                f,
                "Fast breakeven in year {}. The investment pays back early.",
                year + 1
            ),
        }
    }
}

/// Evaluates every rule against `result`, in table order.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use cider_core::calculations::{Recommendation, recommend, run_simulation};
/// use cider_core::models::{reference_scenario, reference_template};
///
/// let result = run_simulation(&reference_template(), &reference_scenario(), 11, dec!(1000));
/// let insights = recommend(&result);
///
/// assert_eq!(insights.len(), 1);
/// assert!(matches!(insights[0], Recommendation::StrongEbitdaMargin(_)));
/// ```
pub fn recommend(result: &SimulationResult) -> Vec<Recommendation> {
    let mut out = Vec::new();

    match result.breakeven_year {
        Some(year) if year <= SLOW_BREAKEVEN_AFTER_YEAR => {}
        other => out.push(Recommendation::SlowBreakeven(other)),
    }

    if result.avg_gross_margin_percent < MIN_GROSS_MARGIN_PERCENT {
        out.push(Recommendation::ThinGrossMargin(result.avg_gross_margin_percent));
    }

    if result.avg_ebitda_margin_percent < MIN_EBITDA_MARGIN_PERCENT {
        out.push(Recommendation::OverheadInefficiency(
            result.avg_ebitda_margin_percent,
        ));
    }

    if let Some(growth) = late_revenue_growth_percent(result) {
        if growth < MIN_LATE_GROWTH_PERCENT {
            out.push(Recommendation::StallingGrowth(growth));
        }
    }

    if result.roi_percent < MIN_ROI_PERCENT {
        out.push(Recommendation::LowRoi(result.roi_percent));
    }

    if result.avg_ebitda_margin_percent > STRONG_EBITDA_MARGIN_PERCENT {
        out.push(Recommendation::StrongEbitdaMargin(
            result.avg_ebitda_margin_percent,
        ));
    }

    if let Some(year) = result.breakeven_year {
        if year <= FAST_BREAKEVEN_BY_YEAR {
            out.push(Recommendation::FastBreakeven(year));
        }
    }

    out
}

/// Rendered messages for [`recommend`].
pub fn recommendation_messages(result: &SimulationResult) -> Vec<String> {
    recommend(result).iter().map(ToString::to_string).collect()
}

/// Revenue growth from the year at index `len / 2` to the final year.
///
/// `None` with fewer than two years or when the mid-horizon revenue is not
/// positive.
fn late_revenue_growth_percent(result: &SimulationResult) -> Option<Decimal> {
    let years = &result.yearly_projections;
    if years.len() < 2 {
        return None;
    }
    let mid = years.get(years.len() / 2)?.total_revenue;
    let last = years.last()?.total_revenue;
    if mid <= Decimal::ZERO {
        return None;
    }
    Some(margin_percent(last.saturating_sub(mid), mid))
}
