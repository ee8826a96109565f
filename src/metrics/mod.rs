//! Derived metrics: period deltas, smoothed change, per-capita values and
//! weekly totals.
//!
//! Empty series yield `None` ("no result") rather than an error so that one
//! bad entity does not stop its siblings from being processed.

pub mod rolling;
pub mod smoothing;

use clap::ValueEnum;
use serde::Serialize;

use crate::series::{EntitySeries, TimePoint};

pub use rolling::{trailing_average, RollingWindow};
pub use smoothing::symmetric_rate_of_change;

pub const TRAILING_WINDOW: usize = 7;
const WEEK: usize = 7;

/// How the `c` field of each point is computed.
///
/// The two strategies are not interchangeable: each dataset pins one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Smoothing {
    /// Average of the deltas over a trailing 7-period window.
    #[default]
    Trailing7,
    /// Percentage change of the 3-point symmetric average of `y`.
    Symmetric3,
}

impl Smoothing {
    /// Computes `c` for each point, or `None` for an empty series.
    pub fn apply(self, series: &[TimePoint]) -> Option<Vec<f64>> {
        match self {
            Smoothing::Trailing7 => {
                let deltas: Vec<f64> = series.iter().map(|p| p.d.unwrap_or(0.0)).collect();
                trailing_average(&deltas, TRAILING_WINDOW)
            }
            Smoothing::Symmetric3 => {
                let values: Vec<f64> = series.iter().map(|p| p.y).collect();
                symmetric_rate_of_change(&values)
            }
        }
    }
}

/// `d[0] = 0` and `d[i] = y[i] - y[i-1]`, so the deltas sum to `last - first`.
pub fn deltas(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if !values.is_empty() {
        out.push(0.0);
    }
    out.extend(values.windows(2).map(|w| w[1] - w[0]));
    out
}

/// Fills `d` on every point from consecutive `y` values.
pub fn apply_deltas(series: &mut [TimePoint]) {
    let values: Vec<f64> = series.iter().map(|p| p.y).collect();
    for (point, d) in series.iter_mut().zip(deltas(&values)) {
        point.d = Some(d);
    }
}

/// Truncates towards zero at one decimal.
pub fn truncate1(x: f64) -> f64 {
    (10.0 * x).trunc() / 10.0
}

/// `value` per million inhabitants, truncated to one decimal.
///
/// An absent, zero or non-finite population gives `None`; no division is
/// attempted.
pub fn per_capita(value: f64, population_millions: Option<f64>) -> Option<f64> {
    let population = population_millions.filter(|p| p.is_finite() && *p > 0.0)?;
    Some((10.0 * value / population).trunc() / 10.0)
}

/// Fills `ypm` and `dpm` on every point.
pub fn apply_per_capita(series: &mut [TimePoint], population_millions: Option<f64>) {
    for point in series {
        point.ypm = per_capita(point.y, population_millions);
        point.dpm = point.d.and_then(|d| per_capita(d, population_millions));
    }
}

/// Chart conveniences derived from the end of a cumulative series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeeklyTotals {
    pub total: Option<f64>,
    pub this_week: Option<f64>,
    pub prev_week: Option<f64>,
}

pub fn weekly_totals(series: &[TimePoint]) -> WeeklyTotals {
    let n = series.len();
    let back = |k: usize| n.checked_sub(k + 1).map(|i| series[i].y);

    let total = back(0);
    let week_ago = back(WEEK);
    let two_weeks_ago = back(2 * WEEK);

    WeeklyTotals {
        total,
        this_week: total.zip(week_ago).map(|(a, b)| a - b),
        prev_week: week_ago.zip(two_weeks_ago).map(|(a, b)| a - b),
    }
}

/// Derives every metric for one entity in place.
///
/// Deltas already present (for example summed by region aggregation) are
/// kept. Returns `None` and leaves the entity untouched when its series is
/// empty.
pub fn derive(entity: &mut EntitySeries, smoothing: Smoothing) -> Option<()> {
    if entity.series.is_empty() {
        return None;
    }
    debug_assert!(entity.is_ordered(), "{} is not in time order", entity.name);

    if entity.series.iter().any(|p| p.d.is_none()) {
        apply_deltas(&mut entity.series);
    }

    let smoothed = smoothing.apply(&entity.series)?;
    for (point, c) in entity.series.iter_mut().zip(smoothed) {
        point.c = Some(c);
    }

    apply_per_capita(&mut entity.series, entity.population);

    let totals = weekly_totals(&entity.series);
    entity.total = totals.total;
    entity.this_week = totals.this_week;
    entity.prev_week = totals.prev_week;

    Some(())
}

// -- Tests -------------------------------------------------------------------
