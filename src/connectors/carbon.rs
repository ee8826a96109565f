//! Global Carbon Budget tables, converted from tonnes of carbon to CO2.
//!
//! Two sheet layouts are supported, both exported to CSV:
//!
//! - national: a header row `,Afghanistan,Albania,...` then one row per year
//! - fuel: a header row `Year,Total,Coal,Oil,...` then one row per year
//!
//! Note rows above the header ("Source of ...", "Cite as: ...") are collected
//! into the document's `source`.

use clap::ValueEnum;
use tracing::debug;

use super::split_list;
use crate::{
    document::Provenance,
    reading::{
        wide::{self, WideOptions},
        Cell, YearWindow,
    },
    series::EntitySeries,
};

/// Molar mass ratio of CO2 to C.
pub const CO2_PER_CARBON: f64 = 3.664;
/// Years strictly between 1900 and 2100.
pub const YEARS: YearWindow = YearWindow::new(1901, 2099);

const SOURCE_MARKER: &str = "Source of";
const CITE_MARKER: &str = "Cite as: ";
const NATIONAL_FIRST_COLUMN: &str = "Afghanistan";
const FUEL_FIRST_COLUMN: &str = "Year";

const G20: &[&str] = &[
    "Argentina",
    "Australia",
    "Brazil",
    "Canada",
    "China",
    "France",
    "Germany",
    "India",
    "Indonesia",
    "Italy",
    "Japan",
    "South Korea",
    "United Kingdom",
    "Mexico",
    "Russian Federation",
    "Saudi Arabia",
    "South Africa",
    "Turkey",
    "USA",
    "EU28",
];

const REGIONS: &[&str] = &[
    "Africa",
    "Asia",
    "Bunkers",
    "Central America",
    "North America",
    "South America",
    "Europe",
    "EU28",
    "Middle East",
    "Oceania",
    "World",
];

const FUEL_LABELS: &[(&str, &str)] = &[
    ("Cement emission", "Cement"),
    ("fossil emissions excluding carbonation", "Total"),
    ("fossil.emissions.excluding.carbonation", "Total"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// One column per country.
    #[default]
    National,
    /// One column per fuel type.
    Fuel,
}

impl Layout {
    fn is_header(self, row: &[Cell]) -> bool {
        match self {
            Layout::National => row.get(1).and_then(Cell::as_str) == Some(NATIONAL_FIRST_COLUMN),
            Layout::Fuel => row.first().and_then(Cell::as_str) == Some(FUEL_FIRST_COLUMN),
        }
    }
}

/// Restricts the output to a set of entity columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EntityFilter {
    #[default]
    All,
    Only(Vec<String>),
}

impl EntityFilter {
    /// `G20` and `Regions` expand to preset lists when given alone.
    pub fn parse(list: &str) -> Self {
        let names = split_list(list);
        let preset = match names.as_slice() {
            [only] if only == "G20" => Some(G20),
            [only] if only == "Regions" => Some(REGIONS),
            _ => None,
        };

        match preset {
            Some(preset) => EntityFilter::Only(preset.iter().map(|s| s.to_string()).collect()),
            None if names.is_empty() => EntityFilter::All,
            None => EntityFilter::Only(names),
        }
    }

    pub fn accepts(&self, name: &str) -> bool {
        match self {
            EntityFilter::All => true,
            EntityFilter::Only(names) => names.iter().any(|n| n == name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarbonTable {
    /// Text gathered from note rows, in file order.
    pub source: String,
    pub entities: Vec<EntitySeries>,
}

pub fn provenance(layout: Layout) -> Provenance {
    let info = match layout {
        Layout::National => {
            "Fossil fuels and cement production emissions by country, in million tons of CO2 per country per year"
        }
        Layout::Fuel => {
            "Fossil fuel and cement production emissions by fuel type, in million tons of CO2 per year"
        }
    };
    Provenance::new("", "https://www.icos-cp.eu/GCP/2019", "", info)
}

/// Finds the header row, transposes the year rows below it and converts every
/// value to CO2.
pub fn build(rows: &[Vec<Cell>], layout: Layout, filter: &EntityFilter) -> CarbonTable {
    let source = source_notes(rows);

    let Some(header_index) = rows.iter().position(|row| layout.is_header(row)) else {
        debug!(?layout, "no header row found");
        return CarbonTable {
            source,
            entities: Vec::new(),
        };
    };

    let header = relabel(&rows[header_index], layout);
    let options = WideOptions {
        years: YEARS,
        multiplier: Some(CO2_PER_CARBON),
    };
    let normalized = wide::transpose(&header, &rows[header_index + 1..], &options);
    normalized.stats.log("carbon");

    CarbonTable {
        source,
        entities: normalized
            .entities
            .into_iter()
            .filter(|entity| filter.accepts(&entity.name))
            .collect(),
    }
}

/// Note texts joined by single spaces; each citation is followed by `/`.
fn source_notes(rows: &[Vec<Cell>]) -> String {
    let mut notes = Vec::new();
    for text in rows.iter().filter_map(|row| row.get(1).and_then(Cell::as_str)) {
        if text.contains(SOURCE_MARKER) {
            notes.push(text.to_string());
        } else if let Some(citation) = text.strip_prefix(CITE_MARKER) {
            notes.push(format!("{} /", citation));
        }
    }
    notes.join(" ")
}

fn relabel(header: &[Cell], layout: Layout) -> Vec<Cell> {
    if layout != Layout::Fuel {
        return header.to_vec();
    }
    header
        .iter()
        .map(|cell| match cell.as_str() {
            Some(label) => {
                let renamed = FUEL_LABELS
                    .iter()
                    .fold(label.to_string(), |acc, (from, to)| acc.replace(from, to));
                Cell::Text(renamed)
            }
            None => cell.clone(),
        })
        .collect()
}

// -- Tests -------------------------------------------------------------------
