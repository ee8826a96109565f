use anyhow::Result;
use clap::Args;

use super::{publish, InputArgs, OutputArgs};
use crate::{
    config::Settings,
    connectors::vaccines::{self, Measure, VaccineOptions},
    deserialise::read_rows,
    document::{accessed_now, Document},
};

#[derive(Args, Debug, Clone)]
pub struct VaccineArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// `All` or a comma separated list of countries
    #[arg(long)]
    pub countries: Option<String>,

    /// Share of the population partially vaccinated
    #[arg(long)]
    pub partial: bool,

    /// Share of the population fully vaccinated
    #[arg(long)]
    pub full: bool,

    /// Number of doses administered
    #[arg(long)]
    pub doses: bool,

    /// Emit `{x, y}` points instead of labels plus value arrays
    #[arg(long)]
    pub xy: bool,
}

impl VaccineArgs {
    /// The flagged measures, or all of them when none is flagged.
    pub fn measures(&self) -> Vec<Measure> {
        let flagged: Vec<Measure> = [
            (self.partial, Measure::Partial),
            (self.full, Measure::Full),
            (self.doses, Measure::Doses),
        ]
        .into_iter()
        .filter_map(|(on, measure)| on.then_some(measure))
        .collect();

        if flagged.is_empty() {
            Measure::ALL.to_vec()
        } else {
            flagged
        }
    }
}

pub async fn vaccines(args: &VaccineArgs, settings: &Settings) -> Result<String> {
    let table = settings.population_table()?;
    let countries = vaccines::parse_countries(args.countries.as_deref(), &table)?;
    let measures = args.measures();

    let input = args.input.fetch().await?;
    let rows = read_rows(input.path())?;
    let data = vaccines::build(
        &rows,
        &table,
        &VaccineOptions {
            countries: countries.as_deref(),
            measures: measures.clone(),
            xy: args.xy,
        },
    )?;

    let provenance = vaccines::provenance(&measures).with_overrides(&args.output.overrides());
    publish(
        &Document::new(provenance, accessed_now(), data),
        &args.output,
        settings,
    )
}

// -- Tests -------------------------------------------------------------------
