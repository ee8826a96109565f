//! COVID-19 cumulative counts from the JHU CSSE time series.

use serde::Serialize;
use tracing::{debug, info};

use super::split_list;
use crate::{
    document::Provenance,
    error::{RegionError, SelectionError},
    metrics::{self, Smoothing},
    population::PopulationTable,
    reading::{jhu, Cell},
    region::{aggregate_region, group_by_region, top_n},
    series::EntitySeries,
};

pub const WORLD: &str = "World";
const ALL: &str = "All";
const TOP: &str = "top20";
const REGIONS: &str = "regions";
const TOP_COUNT: usize = 20;
/// Countries below this population (millions) are left out of the ranking.
const MIN_RANKED_POPULATION: f64 = 0.05;

/// Which entities end up in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All { summary_only: bool },
    Top(usize),
    Named(Vec<String>),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::All {
            summary_only: false,
        }
    }
}

impl Selection {
    /// Parses a `--countries` value. The first item decides between the
    /// keywords `All`, `top20` and `regions`; anything else is a list of
    /// countries, regions or `World`, each resolved through the table.
    pub fn parse(
        list: Option<&str>,
        summary_only: bool,
        table: &PopulationTable,
    ) -> Result<Self, SelectionError> {
        let Some(list) = list else {
            return Ok(Selection::All { summary_only });
        };

        let names = split_list(list);
        match names.first().map(String::as_str) {
            None => Err(SelectionError::Empty),
            Some(ALL) => Ok(Selection::All { summary_only }),
            Some(TOP) => Ok(Selection::Top(TOP_COUNT)),
            Some(REGIONS) => Ok(Selection::Named(table.regions().to_vec())),
            Some(_) => names
                .iter()
                .map(|name| resolve(name, table))
                .collect::<Result<Vec<_>, _>>()
                .map(Selection::Named),
        }
    }
}

/// Maps a requested name onto the entity that carries its data: aliases and
/// reported territories resolve to their country.
fn resolve(name: &str, table: &PopulationTable) -> Result<String, SelectionError> {
    if name == WORLD || table.is_region(name) {
        return Ok(name.to_string());
    }
    match table.get(table.reporting_name(name)) {
        Some(country) => Ok(country.name.clone()),
        None => Err(SelectionError::Unknown {
            name: name.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CovidOptions<'a> {
    pub selection: &'a Selection,
    pub smoothing: Smoothing,
}

/// Per-entity headline figures for `--summary-only`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub country: String,
    pub population: Option<f64>,
    pub total: Option<f64>,
    pub this_week: Option<f64>,
    pub prev_week: Option<f64>,
}

impl From<&EntitySeries> for Summary {
    fn from(entity: &EntitySeries) -> Self {
        Summary {
            country: entity.name.clone(),
            population: entity.population,
            total: entity.total,
            this_week: entity.this_week,
            prev_week: entity.prev_week,
        }
    }
}

/// Countries ranked by their latest per-capita count, as parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    pub countries: Vec<String>,
    pub percapita: Vec<f64>,
    pub dailypercapita: Vec<Option<f64>>,
    pub total: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CovidData {
    Series(Vec<EntitySeries>),
    Summaries(Vec<Summary>),
    Ranking(Ranking),
}

pub fn provenance() -> Provenance {
    Provenance::new(
        "2019 Novel Coronavirus COVID-19 (2019-nCoV) Data Repository by Johns Hopkins CSSE, https://systems.jhu.edu. Population figures from Wikipedia/UN",
        "https://github.com/CSSEGISandData/COVID-19",
        "Copyright 2020 Johns Hopkins University, all rights reserved, provided to the public strictly for educational and academic research purposes",
        "Data format: [{country, population, total, thisWeek, prevWeek, data: [{t, y, d, c, ypm, dpm}]}]. y is cumulative, d daily, c the smoothed daily change, ypm and dpm per million inhabitants",
    )
}

/// Runs the full pipeline over the rows of one JHU time-series file.
pub fn build(
    rows: &[Vec<Cell>],
    table: &PopulationTable,
    options: CovidOptions<'_>,
) -> Result<CovidData, RegionError> {
    let normalized = jhu::collect(rows, table);
    normalized.stats.log("covid");

    let mut entities = normalized.entities;
    for entity in &mut entities {
        metrics::apply_deltas(&mut entity.series);
    }
    let countries = entities.len();

    let aggregates = aggregate_all(&entities, table)?;
    entities.extend(aggregates);

    for entity in &mut entities {
        if metrics::derive(entity, options.smoothing).is_none() {
            debug!(entity = %entity.name, "no data points, metrics skipped");
        }
    }
    info!(countries, entities = entities.len(), "covid series derived");

    Ok(select(entities, countries, options.selection))
}

/// `World` over every country, then each region over its members.
fn aggregate_all(
    entities: &[EntitySeries],
    table: &PopulationTable,
) -> Result<Vec<EntitySeries>, RegionError> {
    let mut aggregates = Vec::new();

    let everyone: Vec<&EntitySeries> = entities.iter().collect();
    if let Some(world) = aggregate_region(WORLD, &everyone)? {
        aggregates.push(world.into_entity(None));
    }

    for region in table.regions() {
        let members = group_by_region(entities, region);
        if let Some(aggregate) = aggregate_region(region, &members)? {
            aggregates.push(aggregate.into_entity(Some(WORLD)));
        }
    }

    Ok(aggregates)
}

/// `entities[..countries]` are countries, the rest are aggregates.
fn select(entities: Vec<EntitySeries>, countries: usize, selection: &Selection) -> CovidData {
    match selection {
        Selection::All { summary_only: true } => {
            CovidData::Summaries(entities.iter().map(Summary::from).collect())
        }
        Selection::All { summary_only: false } => CovidData::Series(entities),
        Selection::Top(n) => CovidData::Ranking(rank(&entities[..countries], *n)),
        Selection::Named(names) => CovidData::Series(
            entities
                .into_iter()
                .filter(|entity| names.contains(&entity.name))
                .collect(),
        ),
    }
}

fn rank(countries: &[EntitySeries], n: usize) -> Ranking {
    let ranked = top_n(countries, n, |entity| {
        entity.population.filter(|p| *p > MIN_RANKED_POPULATION)?;
        entity.last()?.ypm
    });

    let mut ranking = Ranking::default();
    for entry in ranked {
        let Some(last) = entry.entity.last() else {
            continue;
        };
        ranking.countries.push(entry.entity.name.clone());
        ranking.percapita.push(entry.score);
        ranking.dailypercapita.push(last.dpm);
        ranking.total.push(last.y);
    }
    ranking
}

// -- Tests -------------------------------------------------------------------
