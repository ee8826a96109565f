//! Row normalization: turns raw tabular rows into per-entity time series.
//!
//! Every layout produces a [`Normalized`] value. Malformed rows are dropped and
//! counted in [`RowStats`], never treated as fatal, and unparseable numeric
//! cells (including the literal `NaN`) become `0`.

pub mod daily;
pub mod jhu;
pub mod long;
pub mod wide;

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::series::{EntitySeries, TimePoint, Timestamp};

pub use daily::DailyReading;
pub use long::LongRecord;
pub use wide::WideOptions;

// Define a trait for deserializing a line into a reading
pub trait Reading: Sized {
    /// Parses one line, returning `None` when the line is rejected.
    fn from_line(line: &str) -> Option<Self>;

    fn into_point(self) -> TimePoint;
}

/// Parses every line as an `R` into a single named series. Rejected lines are
/// dropped and counted; a repeated timestamp keeps the later reading.
pub fn collect_lines<'a, R, I>(lines: I, name: &str) -> Normalized
where
    R: Reading,
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = SeriesBuilder::new();
    let mut stats = RowStats::default();
    builder.declare(name, None, None);

    for (idx, line) in lines.into_iter().enumerate() {
        let Some(reading) = R::from_line(line) else {
            debug!(line = idx + 1, "rejected line");
            stats.dropped();
            continue;
        };

        let point = reading.into_point();
        stats.used();
        if !builder.insert(name, None, point.t, point.y) {
            stats.superseded();
        }
    }

    Normalized {
        entities: builder.build(),
        stats,
    }
}

/// A single cell as handed over by the tabular parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

/// Parses a numeric cell. `NaN`, infinities and non-numeric text give `None`.
pub fn parse_number(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(v) => *v,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        Cell::Empty => return None,
    };

    Some(value).filter(|v| v.is_finite())
}

/// Lossy numeric conversion: anything unparseable counts as zero.
///
/// The sources cannot distinguish "no emissions" from "no measurement".
pub fn number_or_zero(cell: &Cell) -> f64 {
    parse_number(cell).unwrap_or(0.0)
}

/// Inclusive range of plausible years for a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub min: i32,
    pub max: i32,
}

impl YearWindow {
    pub const fn new(min: i32, max: i32) -> Self {
        YearWindow { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Parses a whole-number year cell that falls inside the window.
    pub fn parse_year(&self, cell: &Cell) -> Option<i32> {
        let value = parse_number(cell)?;
        if value.fract() != 0.0 {
            return None;
        }
        let year = value as i32;
        self.contains(year).then_some(year)
    }
}

/// Row accounting for one normalization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowStats {
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_dropped: usize,
}

impl RowStats {
    pub fn used(&mut self) {
        self.rows_read += 1;
        self.rows_used += 1;
    }

    pub fn dropped(&mut self) {
        self.rows_read += 1;
        self.rows_dropped += 1;
    }

    /// A later row replaced an earlier one for the same timestamp.
    pub fn superseded(&mut self) {
        self.rows_used = self.rows_used.saturating_sub(1);
        self.rows_dropped += 1;
    }

    pub fn log(&self, source: &str) {
        info!(
            source,
            read = self.rows_read,
            used = self.rows_used,
            dropped = self.rows_dropped,
            "rows normalized"
        );
    }
}

/// Output of the row normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub entities: Vec<EntitySeries>,
    pub stats: RowStats,
}

impl Normalized {
    pub fn entity(&self, name: &str) -> Option<&EntitySeries> {
        self.entities.iter().find(|e| e.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntityKey {
    name: String,
    region: Option<String>,
}

#[derive(Debug, Default)]
struct PendingEntity {
    population: Option<f64>,
    points: BTreeMap<Timestamp, f64>,
}

/// Accumulates points per entity; a `BTreeMap` per entity keeps every series
/// ordered with unique timestamps.
#[derive(Debug, Default)]
pub struct SeriesBuilder {
    order: Vec<EntityKey>,
    entities: HashMap<EntityKey, PendingEntity>,
}

impl SeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity so it appears in the output even without points.
    pub fn declare(&mut self, name: &str, region: Option<&str>, population: Option<f64>) {
        let key = EntityKey {
            name: name.to_string(),
            region: region.map(str::to_string),
        };
        if !self.entities.contains_key(&key) {
            self.order.push(key.clone());
        }
        let entry = self.entities.entry(key).or_default();
        if population.is_some() {
            entry.population = population;
        }
    }

    /// Sets the value at `t`, returning `false` when it replaced an earlier one.
    pub fn insert(&mut self, name: &str, region: Option<&str>, t: Timestamp, y: f64) -> bool {
        self.pending(name, region).points.insert(t, y).is_none()
    }

    /// Adds `y` onto whatever is already stored at `t`.
    pub fn add(&mut self, name: &str, region: Option<&str>, t: Timestamp, y: f64) {
        *self.pending(name, region).points.entry(t).or_insert(0.0) += y;
    }

    pub fn build(mut self) -> Vec<EntitySeries> {
        self.order
            .into_iter()
            .filter_map(|key| {
                let pending = self.entities.remove(&key)?;
                let series = pending
                    .points
                    .into_iter()
                    .map(|(t, y)| TimePoint::new(t, y))
                    .collect();
                Some(EntitySeries {
                    region: key.region,
                    population: pending.population,
                    ..EntitySeries::with_series(key.name, series)
                })
            })
            .collect()
    }

    fn pending(&mut self, name: &str, region: Option<&str>) -> &mut PendingEntity {
        self.declare(name, region, None);
        let key = EntityKey {
            name: name.to_string(),
            region: region.map(str::to_string),
        };
        self.entities.entry(key).or_default()
    }
}

// -- Tests -------------------------------------------------------------------
