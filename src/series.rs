//! Time-series data model shared by every connector.

use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Position on a series' time axis.
///
/// All points of one series use the same variant, so the derived ordering is
/// the chronological one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Timestamp {
    Year(i32),
    Date(NaiveDate),
    Week { year: i32, week: u32 },
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Year(year) => write!(f, "{}", year),
            Timestamp::Date(date) => write!(f, "{}", date.format("%Y%m%d")),
            Timestamp::Week { year, week } => write!(f, "{}{:02}", year, week),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timestamp::Year(year) => serializer.serialize_i32(*year),
            _ => serializer.collect_str(self),
        }
    }
}

/// One observation plus the metrics derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    pub t: Timestamp,
    /// Absolute or cumulative value.
    pub y: f64,
    /// Change since the previous point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<f64>,
    /// Smoothed change, see [`crate::metrics::Smoothing`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    /// `y` per million inhabitants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ypm: Option<f64>,
    /// `d` per million inhabitants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpm: Option<f64>,
}

impl TimePoint {
    pub fn new(t: Timestamp, y: f64) -> Self {
        TimePoint {
            t,
            y,
            d: None,
            c: None,
            ypm: None,
            dpm: None,
        }
    }

    pub fn with_delta(mut self, d: f64) -> Self {
        self.d = Some(d);
        self
    }
}

/// A named subject (country, fuel type, sub-national region) and its series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySeries {
    #[serde(rename = "country")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Population in millions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub this_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_week: Option<f64>,
    #[serde(rename = "data")]
    pub series: Vec<TimePoint>,
}

impl EntitySeries {
    pub fn new(name: impl Into<String>) -> Self {
        EntitySeries {
            name: name.into(),
            region: None,
            population: None,
            total: None,
            this_week: None,
            prev_week: None,
            series: Vec::new(),
        }
    }

    pub fn with_series(name: impl Into<String>, series: Vec<TimePoint>) -> Self {
        EntitySeries {
            series,
            ..EntitySeries::new(name)
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_population(mut self, millions: f64) -> Self {
        self.population = Some(millions);
        self
    }

    pub fn last(&self) -> Option<&TimePoint> {
        self.series.last()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = &Timestamp> + '_ {
        self.series.iter().map(|p| &p.t)
    }

    /// True when timestamps are strictly increasing.
    pub fn is_ordered(&self) -> bool {
        self.series.windows(2).all(|w| w[0].t < w[1].t)
    }
}

// -- Tests -------------------------------------------------------------------
