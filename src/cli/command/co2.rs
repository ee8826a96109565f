use anyhow::Result;
use clap::Args;

use super::{publish, InputArgs, OutputArgs};
use crate::{
    config::Settings,
    connectors::co2,
    deserialise::read_lines,
    document::{accessed_now, Document},
};

#[derive(Args, Debug, Clone)]
pub struct Co2Args {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn co2_daily(args: &Co2Args, settings: &Settings) -> Result<String> {
    let input = args.input.fetch().await?;
    let lines = read_lines(input.path())?;
    let points = co2::build(lines.iter().map(String::as_str));

    let provenance = co2::provenance().with_overrides(&args.output.overrides());
    publish(
        &Document::new(provenance, accessed_now(), points),
        &args.output,
        settings,
    )
}

// -- Tests -------------------------------------------------------------------
