//! COVID-19 vaccination progress from the JHU GovEx global time series.
//!
//! ```text
//! Country_Region,Date,Doses_admin,People_partially_vaccinated,People_fully_vaccinated,Report_Date_String,UID,Province_State
//! Norway,2021-01-10,10000,10000,0,2021-01-10,578,
//! ```
//!
//! Only national rows are used. Provinces are already part of their country
//! row and the `US (Aggregate)` row repeats `US`.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::split_list;
use crate::{
    document::Provenance,
    error::{SelectionError, SourceError},
    population::PopulationTable,
    reading::{number_or_zero, Cell, RowStats, SeriesBuilder},
    series::{EntitySeries, TimePoint, Timestamp},
};

const HEADER_MARKER: &str = "Country_Region";
const AGGREGATE_ROW: &str = "US (Aggregate)";
const ALL: &str = "All";
const DATE_FORMAT: &str = "%Y-%m-%d";

const COUNTRY_COLUMN: usize = 0;
const DATE_COLUMN: usize = 1;
const DOSES_COLUMN: usize = 2;
const PARTIAL_COLUMN: usize = 3;
const FULL_COLUMN: usize = 4;
const PROVINCE_COLUMN: usize = 7;

/// One dataset per country in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Share of the population with at least one dose, in percent.
    Partial,
    /// Share of the population fully vaccinated, in percent.
    Full,
    /// Doses administered.
    Doses,
}

impl Measure {
    pub const ALL: [Measure; 3] = [Measure::Partial, Measure::Full, Measure::Doses];

    pub fn label(self) -> &'static str {
        match self {
            Measure::Partial => "Partial",
            Measure::Full => "Full",
            Measure::Doses => "Doses",
        }
    }

    /// Shares are truncated to one decimal, doses to whole numbers.
    fn value(self, row: &[Cell], population: u64) -> f64 {
        let cell = |column: usize| row.get(column).map_or(0.0, number_or_zero);
        match self {
            Measure::Partial => share(cell(PARTIAL_COLUMN), population),
            Measure::Full => share(cell(FULL_COLUMN), population),
            Measure::Doses => cell(DOSES_COLUMN).trunc(),
        }
    }
}

fn share(people: f64, population: u64) -> f64 {
    (1000.0 * people / population as f64).trunc() / 10.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct VaccineOptions<'a> {
    /// `None` keeps every country in the population table.
    pub countries: Option<&'a [String]>,
    /// Datasets in output order. Empty means all of them.
    pub measures: Vec<Measure>,
    /// Emit `{x, y}` points instead of shared labels.
    pub xy: bool,
}

/// Parses a `--countries` value into canonical country names. `All` or no
/// value keeps every country.
pub fn parse_countries(
    list: Option<&str>,
    table: &PopulationTable,
) -> Result<Option<Vec<String>>, SelectionError> {
    let Some(list) = list else {
        return Ok(None);
    };

    let names = split_list(list);
    match names.first().map(String::as_str) {
        None => Err(SelectionError::Empty),
        Some(ALL) => Ok(None),
        Some(_) => names
            .iter()
            .map(|name| {
                table
                    .get(name)
                    .map(|country| country.name.clone())
                    .ok_or_else(|| SelectionError::Unknown { name: name.clone() })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XyPoint {
    pub x: Timestamp,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DatasetValues {
    Values(Vec<f64>),
    Points(Vec<XyPoint>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: &'static str,
    pub data: DatasetValues,
}

impl Dataset {
    fn new(measure: Measure, series: &[TimePoint], xy: bool) -> Self {
        let data = if xy {
            DatasetValues::Points(series.iter().map(|p| XyPoint { x: p.t, y: p.y }).collect())
        } else {
            DatasetValues::Values(series.iter().map(|p| p.y).collect())
        };
        Dataset {
            label: measure.label(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaccineData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Timestamp>>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryVaccines {
    pub country: String,
    pub region: Option<String>,
    pub data: VaccineData,
}

pub fn provenance(measures: &[Measure]) -> Provenance {
    let datasets: Vec<String> = measures
        .iter()
        .enumerate()
        .map(|(i, measure)| format!("[{}] {}", i, measure_info(*measure)))
        .collect();

    Provenance::new(
        "Johns Hopkins University, https://github.com/govex/COVID-19",
        "https://github.com/govex/COVID-19/blob/master/data_tables/vaccine_data/global_data/time_series_covid19_vaccine_global.csv",
        "",
        &format!("Datasets per country: {}", datasets.join(", ")),
    )
}

fn measure_info(measure: Measure) -> &'static str {
    match measure {
        Measure::Partial => "Partially vaccinated, percent of population",
        Measure::Full => "Fully vaccinated, percent of population",
        Measure::Doses => "Total number of doses administered",
    }
}

pub fn parse_date(cell: &Cell) -> Option<Timestamp> {
    NaiveDate::parse_from_str(cell.as_str()?, DATE_FORMAT)
        .ok()
        .map(Timestamp::Date)
}

/// One entry per country, in the order countries first appear in the file.
pub fn build(
    rows: &[Vec<Cell>],
    table: &PopulationTable,
    options: &VaccineOptions<'_>,
) -> Result<Vec<CountryVaccines>, SourceError> {
    let measures: &[Measure] = if options.measures.is_empty() {
        &Measure::ALL
    } else {
        &options.measures
    };

    let mut builders: Vec<SeriesBuilder> = measures.iter().map(|_| SeriesBuilder::new()).collect();
    let mut stats = RowStats::default();
    let mut header_found = false;
    let mut unknown = HashSet::new();

    for (idx, row) in rows.iter().enumerate() {
        let reported = row.get(COUNTRY_COLUMN).and_then(Cell::as_str);
        if reported == Some(HEADER_MARKER) {
            header_found = true;
            continue;
        }
        if reported == Some(AGGREGATE_ROW) || row.get(PROVINCE_COLUMN).is_some_and(|c| !c.is_empty()) {
            continue;
        }

        let Some(reported) = reported else {
            debug!(row = idx, "dropping row without a country");
            stats.dropped();
            continue;
        };
        let Some(country) = table.get(reported).filter(|c| c.population > 0) else {
            if unknown.insert(reported.to_string()) {
                warn!(country = reported, "no population figure, skipping country");
            }
            stats.dropped();
            continue;
        };
        if options
            .countries
            .is_some_and(|names| !names.contains(&country.name))
        {
            continue;
        }
        let Some(t) = row.get(DATE_COLUMN).and_then(parse_date) else {
            debug!(row = idx, "dropping row without a valid date");
            stats.dropped();
            continue;
        };

        stats.used();
        let region = country.region.as_deref();
        let mut replaced = false;
        for (measure, builder) in measures.iter().zip(&mut builders) {
            let value = measure.value(row, country.population);
            replaced |= !builder.insert(&country.name, region, t, value);
        }
        if replaced {
            stats.superseded();
        }
    }

    if !header_found {
        return Err(SourceError::MissingHeader {
            dataset: "vaccine",
            marker: HEADER_MARKER,
        });
    }
    stats.log("vaccines");

    let built: Vec<Vec<EntitySeries>> = builders.into_iter().map(SeriesBuilder::build).collect();
    let Some(first) = built.first() else {
        return Ok(Vec::new());
    };

    let countries: Vec<CountryVaccines> = first
        .iter()
        .enumerate()
        .map(|(i, entity)| {
            // Every builder saw the same countries and dates
            let datasets = measures
                .iter()
                .zip(&built)
                .filter_map(|(measure, entities)| {
                    entities.get(i).map(|e| Dataset::new(*measure, &e.series, options.xy))
                })
                .collect();
            let labels = (!options.xy).then(|| entity.series.iter().map(|p| p.t).collect());

            CountryVaccines {
                country: entity.name.clone(),
                region: entity.region.clone(),
                data: VaccineData { labels, datasets },
            }
        })
        .collect();

    info!(countries = countries.len(), "vaccine series built");
    Ok(countries)
}

// -- Tests -------------------------------------------------------------------
