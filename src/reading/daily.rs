//! Daily measurement lines such as the Mauna Loa CO2 record:
//! `YYYY M D value uncertainty`, separated by any amount of whitespace.

use chrono::{Datelike, Local, NaiveDate};

use super::{Reading, YearWindow};
use crate::series::{TimePoint, Timestamp};

const FIELDS_PER_LINE: usize = 5;
const FIRST_YEAR: i32 = 1900;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyReading {
    pub date: NaiveDate,
    pub value: f64,
}

impl DailyReading {
    /// Parses a line, rejecting years outside `years`.
    pub fn parse_within(line: &str, years: YearWindow) -> Option<Self> {
        let fields: Vec<f64> = line
            .split_whitespace()
            .filter_map(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect();

        if fields.len() != FIELDS_PER_LINE {
            return None;
        }

        let year = whole(fields[0])?;
        let month = whole(fields[1])?;
        let day = whole(fields[2])?;

        if !years.contains(year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }

        let date = NaiveDate::from_ymd_opt(year, month as u32, day as u32)?;

        Some(DailyReading {
            date,
            value: fields[3],
        })
    }
}

impl Reading for DailyReading {
    fn from_line(line: &str) -> Option<Self> {
        DailyReading::parse_within(line, default_years())
    }

    fn into_point(self) -> TimePoint {
        TimePoint::new(Timestamp::Date(self.date), self.value)
    }
}

/// Years from 1900 up to and including the current one.
pub fn default_years() -> YearWindow {
    YearWindow::new(FIRST_YEAR, Local::now().year())
}

fn whole(v: f64) -> Option<i32> {
    (v.fract() == 0.0).then_some(v as i32)
}

// -- Tests -------------------------------------------------------------------
