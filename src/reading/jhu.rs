//! JHU CSSE time-series layout: one row per province, one column per date.
//!
//! ```text
//! Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,...
//! ,Norway,60.47,8.47,0,0,...
//! ```
//!
//! Provinces are summed into their country. Country names go through the
//! population table so that aliases and reported territories land on one
//! entity, which also carries the table's population and region.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::{number_or_zero, Cell, Normalized, RowStats, SeriesBuilder};
use crate::{population::PopulationTable, series::Timestamp};

const HEADER_MARKER: &str = "Province/State";
const COUNTRY_COLUMN: usize = 1;
const FIRST_DATE_COLUMN: usize = 4;
const DATE_FORMAT: &str = "%m/%d/%y";

/// Parses a header date such as `1/22/20`.
pub fn parse_date(cell: &Cell) -> Option<Timestamp> {
    let text = cell.as_str()?;
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .map(Timestamp::Date)
}

pub fn collect(rows: &[Vec<Cell>], table: &PopulationTable) -> Normalized {
    let mut builder = SeriesBuilder::new();
    let mut stats = RowStats::default();
    let mut dates: Option<Vec<Option<Timestamp>>> = None;
    let mut unknown = HashSet::new();

    for (idx, row) in rows.iter().enumerate() {
        if row.first().and_then(Cell::as_str) == Some(HEADER_MARKER) {
            dates = Some(row.iter().skip(FIRST_DATE_COLUMN).map(parse_date).collect());
            continue;
        }

        let Some(dates) = dates.as_ref() else {
            debug!(row = idx, "dropping row before header");
            stats.dropped();
            continue;
        };

        if row.len() != FIRST_DATE_COLUMN + dates.len() {
            debug!(row = idx, fields = row.len(), "dropping row with wrong field count");
            stats.dropped();
            continue;
        }

        let Some(reported) = row[COUNTRY_COLUMN].as_str() else {
            stats.dropped();
            continue;
        };
        let name = table.reporting_name(reported);
        let Some(country) = table.get(name) else {
            if unknown.insert(name.to_string()) {
                warn!(country = name, "no population figure, skipping country");
            }
            stats.dropped();
            continue;
        };

        let region = country.region.as_deref();
        builder.declare(&country.name, region, Some(country.millions()));
        for (t, cell) in dates.iter().zip(&row[FIRST_DATE_COLUMN..]) {
            if let Some(t) = t {
                builder.add(&country.name, region, *t, number_or_zero(cell));
            }
        }
        stats.used();
    }

    Normalized {
        entities: builder.build(),
        stats,
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|s| Cell::from(*s)).collect()
    }

    fn fixture() -> Vec<Vec<Cell>> {
        vec![
            row(&["Province/State", "Country/Region", "Lat", "Long", "1/22/20", "1/23/20"]),
            row(&["", "Norway", "60.4", "8.4", "1", "3"]),
            row(&["", "Italy", "41.8", "12.5", "10", "20"]),
            row(&["", "San Marino", "43.9", "12.4", "1", "2"]),
            row(&["", "Atlantis", "0", "0", "5", "5"]),
            row(&["", "Sweden", "60.1", "18.6", "1"]),
        ]
    }

    #[test]
    fn should_parse_header_dates() {
        let t = parse_date(&Cell::from("1/22/20")).unwrap();
        assert_eq!(t.to_string(), "20200122");
        assert_eq!(parse_date(&Cell::from("Lat")), None);
    }

    #[test]
    fn should_sum_territories_into_country() {
        let table = PopulationTable::embedded().unwrap();
        let normalized = collect(&fixture(), &table);

        let italy = normalized.entity("Italy").unwrap();
        assert_eq!(italy.series[0].y, 11.0);
        assert_eq!(italy.series[1].y, 22.0);
        assert_eq!(italy.region.as_deref(), Some("Europe"));
        assert_eq!(italy.population, Some(60.55));
    }

    #[test]
    fn should_skip_unknown_countries_and_short_rows() {
        let table = PopulationTable::embedded().unwrap();
        let normalized = collect(&fixture(), &table);

        assert!(normalized.entity("Atlantis").is_none());
        assert!(normalized.entity("Sweden").is_none());
        assert_eq!(normalized.entities.len(), 2);
        assert_eq!(normalized.stats.rows_used, 3);
        assert_eq!(normalized.stats.rows_dropped, 2);
    }

    #[test]
    fn should_apply_aliases() {
        let table = PopulationTable::embedded().unwrap();
        let rows = vec![
            row(&["Province/State", "Country/Region", "Lat", "Long", "3/1/20"]),
            row(&["", "Korea, South", "0", "0", "7"]),
        ];

        let normalized = collect(&rows, &table);
        assert_eq!(normalized.entities[0].name, "South Korea");
    }
}
