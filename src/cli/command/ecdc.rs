use anyhow::Result;
use clap::Args;

use super::{publish, InputArgs, OutputArgs};
use crate::{
    config::Settings,
    connectors::ecdc,
    deserialise::read_rows,
    document::{accessed_now, Document},
};

#[derive(Args, Debug, Clone)]
pub struct EcdcArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn ecdc(args: &EcdcArgs, settings: &Settings) -> Result<String> {
    let input = args.input.fetch().await?;
    let rows = read_rows(input.path())?;
    let countries = ecdc::build(&rows);

    let provenance = ecdc::provenance().with_overrides(&args.output.overrides());
    publish(
        &Document::new(provenance, accessed_now(), countries),
        &args.output,
        settings,
    )
}
