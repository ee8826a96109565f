//! ECDC sub-national 14-day notification rates.
//!
//! ```text
//! country,region_name,nuts_code,year_week,rate_14_day_per_100k,source
//! Austria,Burgenland,AT11,2020-14,57.7375049246695,Epidemic intelligence subnational data
//! ```

use serde::Serialize;
use tracing::trace;

use crate::{
    document::Provenance,
    reading::{long, parse_number, Cell, LongRecord},
    series::{TimePoint, Timestamp},
};

const COUNTRY_COLUMN: usize = 0;
const REGION_COLUMN: usize = 1;
const WEEK_COLUMN: usize = 3;
const RATE_COLUMN: usize = 4;
const HEADER_REGION: &str = "region_name";
const MAX_WEEK: u32 = 53;

pub fn provenance() -> Provenance {
    Provenance::new(
        "European Centre for Disease Prevention and Control",
        "https://www.ecdc.europa.eu/en/publications-data/subnational-14-day-notification-rate-covid-19",
        "",
        "14-day notification rate of new cases per 100 000 inhabitants, per sub-national region and week",
    )
}

/// Rates under 10 keep one truncated decimal, larger ones are truncated to
/// whole numbers.
pub fn round_rate(rate: f64) -> f64 {
    if rate < 10.0 {
        (10.0 * rate).trunc() / 10.0
    } else {
        rate.trunc()
    }
}

/// Parses `2020-13` into a week timestamp.
pub fn parse_week(cell: &Cell) -> Option<Timestamp> {
    let (year, week) = cell.as_str()?.split_once('-')?;
    let year = year.trim().parse().ok()?;
    let week: u32 = week.trim().parse().ok()?;
    (1..=MAX_WEEK)
        .contains(&week)
        .then_some(Timestamp::Week { year, week })
}

fn record(row: &[Cell]) -> Option<LongRecord> {
    let region = row.get(REGION_COLUMN)?.as_str()?;
    let country = row.get(COUNTRY_COLUMN)?.as_str()?;
    let t = parse_week(row.get(WEEK_COLUMN)?)?;
    // An empty rate is a week without reports
    let rate = row.get(RATE_COLUMN).and_then(parse_number).unwrap_or(0.0);

    Some(LongRecord {
        entity: region.to_string(),
        region: Some(country.to_string()),
        t,
        y: round_rate(rate),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRates {
    pub name: String,
    pub data: Vec<TimePoint>,
}

/// A country and its sub-national regions, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRates {
    pub country: String,
    pub region: Vec<RegionRates>,
}

/// One series per sub-national region, grouped under its country.
pub fn build(rows: &[Vec<Cell>]) -> Vec<CountryRates> {
    let records = rows
        .iter()
        .filter(|row| row.get(REGION_COLUMN).and_then(Cell::as_str) != Some(HEADER_REGION))
        .map(|row| {
            let record = record(row);
            if record.is_none() {
                trace!(?row, "unreadable ECDC row");
            }
            record
        });

    let normalized = long::collect(records);
    normalized.stats.log("ecdc");

    let mut countries: Vec<CountryRates> = Vec::new();
    for entity in normalized.entities {
        let country = entity.region.unwrap_or_default();
        let region = RegionRates {
            name: entity.name,
            data: entity.series,
        };
        match countries.iter_mut().find(|c| c.country == country) {
            Some(existing) => existing.region.push(region),
            None => countries.push(CountryRates {
                country,
                region: vec![region],
            }),
        }
    }
    countries
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;
    use crate::deserialise::read_rows_from;

    const CSV: &str = "\
country,region_name,nuts_code,year_week,rate_14_day_per_100k,source
Austria,Burgenland,AT11,2020-13,,Epidemic intelligence subnational data
Austria,Burgenland,AT11,2020-14,57.7375049246695,Epidemic intelligence subnational data
Austria,Kärnten,AT21,2020-14,3.456,Epidemic intelligence subnational data
Austria,Kärnten,AT21,2020-xx,3.456,Epidemic intelligence subnational data
Belgium,Antwerpen,BE21,2020-14,12.9,Epidemic intelligence subnational data
Austria,Wien,AT13,2020-14,40.1,Epidemic intelligence subnational data
";

    #[test]
    fn should_round_rates() {
        assert_eq!(round_rate(57.7375049246695), 57.0);
        assert_eq!(round_rate(3.456), 3.4);
        assert_eq!(round_rate(0.0), 0.0);
    }

    #[test]
    fn should_parse_year_week() {
        assert_eq!(
            parse_week(&Cell::from("2020-13")),
            Some(Timestamp::Week { year: 2020, week: 13 })
        );
        assert_eq!(parse_week(&Cell::from("2020-54")), None);
        assert_eq!(parse_week(&Cell::from("2020")), None);
    }

    #[test]
    fn should_group_regions_under_country() {
        let rows = read_rows_from(CSV.as_bytes()).unwrap();

        let countries = build(&rows);

        let names: Vec<&str> = countries.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["Austria", "Belgium"]);
        let austria: Vec<&str> = countries[0].region.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(austria, vec!["Burgenland", "Kärnten", "Wien"]);

        let burgenland = &countries[0].region[0];
        let values: Vec<f64> = burgenland.data.iter().map(|p| p.y).collect();
        assert_eq!(values, vec![0.0, 57.0]);
        assert_eq!(countries[0].region[1].data.len(), 1);
        assert_eq!(countries[0].region[1].data[0].y, 3.4);
        assert_eq!(countries[1].region[0].data[0].y, 12.0);
    }

    #[test]
    fn should_serialise_week_as_compact_string() {
        let rows = read_rows_from(CSV.as_bytes()).unwrap();

        let json = serde_json::to_value(build(&rows)).unwrap();

        assert_eq!(json[0]["country"], "Austria");
        assert_eq!(json[0]["region"][0]["name"], "Burgenland");
        assert_eq!(json[0]["region"][0]["data"][0]["t"], "202013");
        assert_eq!(json[0]["region"][0]["data"][1]["y"], 57.0);
    }
}
