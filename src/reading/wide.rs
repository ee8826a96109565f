//! Row-oriented tables: one row per period, one column per entity.
//!
//! ```text
//! Year, Total, Coal, Oil, Gas, Cement, Flaring, Per Capita,,,
//! 1959, 2417, 1352, 794, 207, 40, 25, 0.81,,,
//! ```

use std::collections::HashSet;

use tracing::debug;

use super::{number_or_zero, Cell, Normalized, RowStats, SeriesBuilder, YearWindow};
use crate::series::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WideOptions {
    pub years: YearWindow,
    /// Unit conversion applied to every value, rounded down to two decimals.
    pub multiplier: Option<f64>,
}

impl Default for WideOptions {
    fn default() -> Self {
        WideOptions {
            years: YearWindow::new(1900, 2100),
            multiplier: None,
        }
    }
}

/// Entity names from a header row: every cell after the time column, up to
/// the first empty one.
pub fn entity_columns(header: &[Cell]) -> Vec<String> {
    header
        .iter()
        .skip(1)
        .map_while(|cell| cell.as_str().map(str::to_string))
        .collect()
}

/// Transposes period rows into one series per entity column.
pub fn transpose(header: &[Cell], rows: &[Vec<Cell>], options: &WideOptions) -> Normalized {
    let names = entity_columns(header);
    let mut builder = SeriesBuilder::new();
    let mut stats = RowStats::default();

    for name in &names {
        builder.declare(name, None, None);
    }

    let mut seen = HashSet::new();

    for (idx, row) in rows.iter().enumerate() {
        if row.len() < names.len() + 1 {
            debug!(row = idx, fields = row.len(), "dropping short row");
            stats.dropped();
            continue;
        }
        let Some(year) = options.years.parse_year(&row[0]) else {
            debug!(row = idx, "dropping row without a valid year");
            stats.dropped();
            continue;
        };

        stats.used();
        if !seen.insert(year) {
            stats.superseded();
        }

        for (name, cell) in names.iter().zip(&row[1..]) {
            let value = convert(number_or_zero(cell), options.multiplier);
            builder.insert(name, None, Timestamp::Year(year), value);
        }
    }

    Normalized {
        entities: builder.build(),
        stats,
    }
}

fn convert(value: f64, multiplier: Option<f64>) -> f64 {
    match multiplier {
        Some(k) => (100.0 * value * k).floor() / 100.0,
        None => value,
    }
}

// -- Tests -------------------------------------------------------------------
